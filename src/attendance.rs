use chrono::NaiveDate;
use serde::Deserialize;

use crate::forms::{self, is_valid_registration, FormError, FormFields};
use crate::roster::RosterRow;

pub const MARK_ATTENDANCE_PATH: &str = "/faculty/attendance/mark";

/// Header fields of the mark-attendance form; the rows come from the roster.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceForm {
    #[serde(default)]
    pub subject_name: String,
    #[serde(default)]
    pub subject_code: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time_period: Option<String>,
}

fn parse_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, FormError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(today),
        Some(s) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| FormError::BadDate(s.to_string()))
        }
    }
}

impl AttendanceForm {
    pub fn encode(&self, rows: &[RosterRow], today: NaiveDate) -> Result<FormFields, FormError> {
        let subject = self.subject_name.trim();
        if subject.is_empty() {
            return Err(FormError::Missing("subject name"));
        }
        if rows.is_empty() {
            return Err(FormError::NoRows);
        }
        let date = parse_date(self.date.as_deref(), today)?;

        let mut fields = FormFields::new();
        forms::push(&mut fields, "subject_name", subject);
        forms::push(
            &mut fields,
            "subject_code",
            self.subject_code.as_deref().unwrap_or("").trim(),
        );
        forms::push(&mut fields, "date", date.format("%Y-%m-%d").to_string());
        forms::push(
            &mut fields,
            "time_period",
            self.time_period.as_deref().unwrap_or("").trim(),
        );

        for (i, row) in rows.iter().enumerate() {
            let reg = row.registration_number.trim();
            if !is_valid_registration(reg) {
                return Err(FormError::BadRegistration {
                    row: i + 1,
                    value: row.registration_number.clone(),
                });
            }
            forms::push(&mut fields, "student_reg_no[]", reg);
            forms::push(&mut fields, "student_name[]", row.name());
            forms::push(&mut fields, "status[]", row.status.as_str());
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::StudentRecord;
    use crate::roster::AttendanceStatus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn row(reg: &str, name: &str) -> RosterRow {
        RosterRow::from_record(&StudentRecord {
            registration_number: Some(reg.into()),
            name: Some(name.into()),
        })
    }

    fn form(subject: &str, date: Option<&str>) -> AttendanceForm {
        AttendanceForm {
            subject_name: subject.into(),
            subject_code: Some("CS301".into()),
            date: date.map(|d| d.to_string()),
            time_period: Some("09:00-10:00".into()),
        }
    }

    #[test]
    fn encodes_header_then_parallel_row_arrays() {
        let mut late = row("R101", "Bilal");
        late.status = AttendanceStatus::Late;
        let fields = form("Algorithms", Some("2026-10-01"))
            .encode(&[row("R100", "Asha"), late], today())
            .unwrap();
        let flat: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            flat,
            vec![
                ("subject_name", "Algorithms"),
                ("subject_code", "CS301"),
                ("date", "2026-10-01"),
                ("time_period", "09:00-10:00"),
                ("student_reg_no[]", "R100"),
                ("student_name[]", "Asha"),
                ("status[]", "Present"),
                ("student_reg_no[]", "R101"),
                ("student_name[]", "Bilal"),
                ("status[]", "Late"),
            ]
        );
    }

    #[test]
    fn blank_date_defaults_to_today() {
        let fields = form("Algorithms", Some(" ")).encode(&[row("R1", "A")], today()).unwrap();
        assert!(fields.contains(&("date".to_string(), "2026-10-17".to_string())));
    }

    #[test]
    fn rejects_bad_input() {
        let rows = [row("R1", "A")];
        assert_eq!(
            form(" ", None).encode(&rows, today()),
            Err(FormError::Missing("subject name"))
        );
        assert_eq!(form("Algorithms", None).encode(&[], today()), Err(FormError::NoRows));
        assert_eq!(
            form("Algorithms", Some("17/10/2026")).encode(&rows, today()),
            Err(FormError::BadDate("17/10/2026".into()))
        );
        assert!(matches!(
            form("Algorithms", None).encode(&[RosterRow::empty()], today()),
            Err(FormError::BadRegistration { row: 1, .. })
        ));
    }
}
