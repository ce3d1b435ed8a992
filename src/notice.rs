use serde::Serialize;

use crate::fetcher::FetchOutcome;

pub const MISSING_SUBJECT: &str = "Enter subject name to fetch enrolled students.";
pub const FETCH_REFUSED_FALLBACK: &str = "Could not fetch students";
pub const NO_STUDENTS_FOUND: &str = "No enrolled students found for this subject/semester/batch.";
pub const FETCH_TRANSPORT_FAILED: &str = "Error fetching students. See the sidecar log.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message the UI shows as a blocking alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub fn for_fetch(outcome: &FetchOutcome) -> Option<Notice> {
    match outcome {
        FetchOutcome::Replaced { .. } | FetchOutcome::Stale { .. } => None,
        FetchOutcome::Empty => Some(Notice::info(NO_STUDENTS_FOUND)),
        FetchOutcome::Invalid(_) => Some(Notice::error(MISSING_SUBJECT)),
        FetchOutcome::Rejected { error } => Some(Notice::error(
            error
                .as_deref()
                .filter(|e| !e.is_empty())
                .unwrap_or(FETCH_REFUSED_FALLBACK),
        )),
        FetchOutcome::HttpStatus { body, .. } => {
            Some(Notice::error(format!("Error fetching students: {}", body)))
        }
        FetchOutcome::Transport { .. } => Some(Notice::error(FETCH_TRANSPORT_FAILED)),
    }
}
