/// Ordered `name=value` pairs, array fields repeated once per row.
pub type FormFields = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("no rows to submit")]
    NoRows,
    #[error("row {row}: {field} is required")]
    MissingInRow { row: usize, field: &'static str },
    #[error("row {row}: invalid registration number {value:?}")]
    BadRegistration { row: usize, value: String },
    #[error("date must be YYYY-MM-DD, got {0:?}")]
    BadDate(String),
    #[error("unknown status {0:?}")]
    UnknownStatus(String),
    #[error("invalid assignment id {0:?}")]
    BadAssignmentId(String),
}

/// Registration numbers are letters, digits and dashes, e.g. `UAP25001`.
pub fn is_valid_registration(reg: &str) -> bool {
    let reg = reg.trim();
    !reg.is_empty() && reg.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

pub fn push(fields: &mut FormFields, name: &str, value: impl Into<String>) {
    fields.push((name.to_string(), value.into()));
}
