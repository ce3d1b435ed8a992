use serde_json::json;
use uuid::Uuid;

use crate::portal::StudentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    /// Selector options in display order; the first one is the default.
    pub const OPTIONS: [AttendanceStatus; 3] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Late,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Late => "Late",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::OPTIONS.into_iter().find(|s| s.as_str() == raw.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub id: String,
    pub registration_number: String,
    name: String,
    pub status: AttendanceStatus,
}

impl RosterRow {
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            registration_number: String::new(),
            name: String::new(),
            status: AttendanceStatus::default(),
        }
    }

    pub fn from_record(record: &StudentRecord) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            registration_number: record.registration_number.clone().unwrap_or_default(),
            name: record.name.clone().unwrap_or_default(),
            status: AttendanceStatus::default(),
        }
    }

    /// The name is filled in from the enrolled-student record and has no setter.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "rowId": self.id,
            "registrationNumber": self.registration_number,
            "name": self.name,
            "nameReadOnly": true,
            "status": self.status.as_str(),
        })
    }
}

/// The document region that holds roster rows.
pub trait RosterRegion {
    fn clear(&mut self);
    fn append(&mut self, row: RosterRow);
    /// Removes exactly the row with `id`. Returns false when no such row exists.
    fn remove(&mut self, id: &str) -> bool;
    fn rows(&self) -> &[RosterRow];
    fn row_mut(&mut self, id: &str) -> Option<&mut RosterRow>;
}

#[derive(Debug, Default)]
pub struct RowList {
    rows: Vec<RosterRow>,
}

impl RowList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RosterRegion for RowList {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn append(&mut self, row: RosterRow) {
        self.rows.push(row);
    }

    fn remove(&mut self, id: &str) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        self.rows.len() != before
    }

    fn rows(&self) -> &[RosterRow] {
        &self.rows
    }

    fn row_mut(&mut self, id: &str) -> Option<&mut RosterRow> {
        self.rows.iter_mut().find(|r| r.id == id)
    }
}

pub fn rows_json(rows: &[RosterRow]) -> serde_json::Value {
    serde_json::Value::Array(rows.iter().map(RosterRow::to_json).collect())
}
