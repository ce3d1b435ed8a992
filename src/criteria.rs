use serde::Deserialize;

pub const ENROLLED_STUDENTS_PATH: &str = "/faculty/api/enrolled-students";

/// Raw field values as the form holds them at the moment of a fetch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCriteria {
    #[serde(default)]
    pub subject_name: String,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriteriaError {
    #[error("subject name is required")]
    MissingSubject,
}

/// Criteria that passed validation: every value is trimmed and the optional
/// ones are `None` when blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCriteria {
    subject_name: String,
    semester: Option<String>,
    batch: Option<String>,
    department: Option<String>,
}

fn non_blank(v: Option<&str>) -> Option<String> {
    v.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

impl QueryCriteria {
    pub fn validate(&self) -> Result<ValidCriteria, CriteriaError> {
        let subject = self.subject_name.trim();
        if subject.is_empty() {
            return Err(CriteriaError::MissingSubject);
        }
        Ok(ValidCriteria {
            subject_name: subject.to_string(),
            semester: non_blank(self.semester.as_deref()),
            batch: non_blank(self.batch.as_deref()),
            department: non_blank(self.department.as_deref()),
        })
    }
}

impl ValidCriteria {
    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    /// Query parameters in wire order. `subject_name` always comes first.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![("subject_name", self.subject_name.as_str())];
        if let Some(v) = &self.semester {
            pairs.push(("semester", v));
        }
        if let Some(v) = &self.batch {
            pairs.push(("batch", v));
        }
        if let Some(v) = &self.department {
            pairs.push(("department", v));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(subject: &str, semester: &str, batch: &str, department: &str) -> QueryCriteria {
        QueryCriteria {
            subject_name: subject.to_string(),
            semester: Some(semester.to_string()),
            batch: Some(batch.to_string()),
            department: Some(department.to_string()),
        }
    }

    #[test]
    fn blank_subject_is_rejected() {
        for subject in ["", "   ", "\t\n"] {
            let err = criteria(subject, "3", "A", "CSE").validate().unwrap_err();
            assert_eq!(err, CriteriaError::MissingSubject);
        }
    }

    #[test]
    fn optional_fields_only_when_non_blank() {
        let valid = criteria(" Algorithms ", "3", "  ", "").validate().unwrap();
        assert_eq!(
            valid.query_pairs(),
            vec![("subject_name", "Algorithms"), ("semester", "3")]
        );

        let valid = criteria("Algorithms", "", " B2 ", " ECE").validate().unwrap();
        assert_eq!(
            valid.query_pairs(),
            vec![
                ("subject_name", "Algorithms"),
                ("batch", "B2"),
                ("department", "ECE")
            ]
        );
    }

    #[test]
    fn missing_optional_fields_are_omitted() {
        let valid = QueryCriteria {
            subject_name: "Networks".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(valid.query_pairs(), vec![("subject_name", "Networks")]);
    }
}
