use serde_json::json;
use uuid::Uuid;

use crate::forms::{self, FormError, FormFields};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRow {
    pub id: String,
    pub subject_name: String,
    pub subject_code: String,
    pub subject_dept: String,
}

impl SubjectRow {
    fn empty() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            subject_name: String::new(),
            subject_code: String::new(),
            subject_dept: String::new(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "rowId": self.id,
            "subjectName": self.subject_name,
            "subjectCode": self.subject_code,
            "subjectDept": self.subject_dept,
        })
    }
}

/// Partial edit of a subject row; `None` leaves the field as it is.
#[derive(Debug, Default)]
pub struct SubjectEdit {
    pub subject_name: Option<String>,
    pub subject_code: Option<String>,
    pub subject_dept: Option<String>,
}

/// Subject rows of the semester registration form.
#[derive(Debug, Default)]
pub struct SubjectRows {
    rows: Vec<SubjectRow>,
}

impl SubjectRows {
    pub fn add(&mut self) -> &SubjectRow {
        self.rows.push(SubjectRow::empty());
        &self.rows[self.rows.len() - 1]
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        self.rows.len() != before
    }

    pub fn update(&mut self, id: &str, edit: SubjectEdit) -> Option<&SubjectRow> {
        let row = self.rows.iter_mut().find(|r| r.id == id)?;
        if let Some(v) = edit.subject_name {
            row.subject_name = v;
        }
        if let Some(v) = edit.subject_code {
            row.subject_code = v;
        }
        if let Some(v) = edit.subject_dept {
            row.subject_dept = v;
        }
        Some(row)
    }

    pub fn rows(&self) -> &[SubjectRow] {
        &self.rows
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.rows().iter().map(SubjectRow::to_json).collect())
    }

    /// Registration form body: `semester`, then the three subject arrays row by row.
    pub fn encode(&self, semester: &str) -> Result<FormFields, FormError> {
        let semester = semester.trim();
        if semester.is_empty() {
            return Err(FormError::Missing("semester"));
        }
        if self.rows.is_empty() {
            return Err(FormError::NoRows);
        }
        let mut fields = FormFields::new();
        forms::push(&mut fields, "semester", semester);
        for (i, row) in self.rows.iter().enumerate() {
            let name = row.subject_name.trim();
            if name.is_empty() {
                return Err(FormError::MissingInRow {
                    row: i + 1,
                    field: "subject name",
                });
            }
            forms::push(&mut fields, "subject_name[]", name);
            forms::push(&mut fields, "subject_code[]", row.subject_code.trim());
            forms::push(&mut fields, "subject_dept[]", row.subject_dept.trim());
        }
        Ok(fields)
    }
}
