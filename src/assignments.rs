use serde_json::json;

use crate::forms::{self, is_valid_registration, FormError, FormFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    Submitted,
    #[default]
    NotSubmitted,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => "Submitted",
            SubmissionStatus::NotSubmitted => "Not Submitted",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, FormError> {
        match raw.trim() {
            "Submitted" => Ok(SubmissionStatus::Submitted),
            "Not Submitted" => Ok(SubmissionStatus::NotSubmitted),
            other => Err(FormError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRow {
    pub registration_number: String,
    pub status: SubmissionStatus,
}

/// Per-student submission statuses for one assignment review page.
#[derive(Debug)]
pub struct SubmissionSheet {
    assignment_id: String,
    rows: Vec<SubmissionRow>,
}

impl SubmissionSheet {
    pub fn open(assignment_id: &str, students: &[String]) -> Result<Self, FormError> {
        let assignment_id = assignment_id.trim();
        if assignment_id.is_empty() {
            return Err(FormError::Missing("assignment id"));
        }
        // The id becomes a path segment of the mark URL.
        if !assignment_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(FormError::BadAssignmentId(assignment_id.to_string()));
        }
        let mut rows = Vec::with_capacity(students.len());
        for (i, reg) in students.iter().enumerate() {
            if !is_valid_registration(reg) {
                return Err(FormError::BadRegistration {
                    row: i + 1,
                    value: reg.clone(),
                });
            }
            rows.push(SubmissionRow {
                registration_number: reg.trim().to_string(),
                status: SubmissionStatus::default(),
            });
        }
        Ok(Self {
            assignment_id: assignment_id.to_string(),
            rows,
        })
    }

    /// Returns false when the student is not on the sheet.
    pub fn set_status(&mut self, registration_number: &str, status: SubmissionStatus) -> bool {
        let reg = registration_number.trim();
        match self.rows.iter_mut().find(|r| r.registration_number == reg) {
            Some(row) => {
                row.status = status;
                true
            }
            None => false,
        }
    }

    pub fn set_all(&mut self, status: SubmissionStatus) {
        for row in &mut self.rows {
            row.status = status;
        }
    }

    pub fn rows(&self) -> &[SubmissionRow] {
        &self.rows
    }

    pub fn mark_path(&self) -> String {
        format!("/faculty/assignments/{}/mark", self.assignment_id)
    }

    pub fn encode(&self) -> Result<FormFields, FormError> {
        if self.rows.is_empty() {
            return Err(FormError::NoRows);
        }
        let mut fields = FormFields::new();
        for row in &self.rows {
            forms::push(&mut fields, "student_reg_no[]", row.registration_number.as_str());
            forms::push(&mut fields, "status[]", row.status.as_str());
        }
        Ok(fields)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .rows
            .iter()
            .map(|r| {
                json!({
                    "registrationNumber": r.registration_number,
                    "status": r.status.as_str(),
                })
            })
            .collect();
        json!({
            "assignmentId": self.assignment_id,
            "rows": rows,
        })
    }
}
