//! Pre-submission checks for the employee and attendance forms.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::model::{
    AttendanceForm, AttendanceRecord, AttendanceStatus, Employee, EmployeeForm,
};

/// Structural `local@domain.tld` check. Not an RFC 5322 validator.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema, Error)]
#[serde(transparent)]
#[error("{}", self.summary())]
#[schema(example = json!({"email": "Invalid email", "department": "Required"}))]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn summary(&self) -> String {
        self.0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Turns the add-employee form into an `Employee`. Identifier, name and
/// department are trimmed; email is matched as typed.
pub fn validate_employee(form: &EmployeeForm) -> Result<Employee, FieldErrors> {
    let mut errors = FieldErrors::default();

    if is_blank(&form.employee_id) {
        errors.insert("employee_id", "Required");
    }
    if is_blank(&form.full_name) {
        errors.insert("full_name", "Required");
    }
    if is_blank(&form.email) {
        errors.insert("email", "Required");
    } else if !is_valid_email(&form.email) {
        errors.insert("email", "Invalid email");
    }
    if is_blank(&form.department) {
        errors.insert("department", "Required");
    }

    errors.into_result(|| Employee {
        employee_id: form.employee_id.trim().to_string(),
        full_name: form.full_name.trim().to_string(),
        email: form.email.clone(),
        department: form.department.trim().to_string(),
    })
}

pub fn validate_attendance(form: &AttendanceForm) -> Result<AttendanceRecord, FieldErrors> {
    let mut errors = FieldErrors::default();

    if is_blank(&form.employee_id) {
        errors.insert("employee_id", "Select an employee");
    }

    let date = if is_blank(&form.date) {
        errors.insert("date", "Pick a date");
        None
    } else {
        match NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                errors.insert("date", "Invalid date");
                None
            }
        }
    };

    let status = if is_blank(&form.status) {
        errors.insert("status", "Select status");
        None
    } else {
        match form.status.trim().parse::<AttendanceStatus>() {
            Ok(s) => Some(s),
            Err(_) => {
                errors.insert("status", "Invalid status");
                None
            }
        }
    };

    match (date, status) {
        (Some(date), Some(status)) if errors.is_empty() => Ok(AttendanceRecord {
            employee_id: form.employee_id.trim().to_string(),
            date,
            status,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee_form(id: &str, name: &str, email: &str, dept: &str) -> EmployeeForm {
        EmployeeForm {
            employee_id: id.into(),
            full_name: name.into(),
            email: email.into(),
            department: dept.into(),
        }
    }

    #[test]
    fn accepts_a_complete_employee() {
        let employee =
            validate_employee(&employee_form(" EMP-1 ", "Jane Doe", "jane@corp.io", "Eng"))
                .expect("valid");
        assert_eq!(employee.employee_id, "EMP-1");
        assert_eq!(employee.email, "jane@corp.io");
    }

    #[test]
    fn field_errors_display_every_field_in_order() {
        let mut errors = FieldErrors::default();
        errors.insert("email", "Invalid email");
        errors.insert("department", "Required");

        assert_eq!(errors.to_string(), "department: Required, email: Invalid email");
        let boxed: Box<dyn std::error::Error> = Box::new(errors);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn blank_fields_are_required() {
        let errors = validate_employee(&employee_form("  ", "", "", "\t")).expect_err("invalid");
        assert_eq!(errors.len(), 4);
        for field in ["employee_id", "full_name", "email", "department"] {
            assert_eq!(errors.get(field), Some("Required"), "{field}");
        }
    }

    #[test]
    fn email_shape_is_checked() {
        for good in ["a@b.c", "first.last@corp.example.com", "x+y@d.io"] {
            assert!(is_valid_email(good), "{good}");
        }
        for bad in ["plain", "a@b", "@b.c", "a@.c", "a b@c.d", "a@b.", "a@@b.c"] {
            assert!(!is_valid_email(bad), "{bad}");
        }

        let errors =
            validate_employee(&employee_form("E1", "Ann", "ann@corp", "Ops")).expect_err("invalid");
        assert_eq!(errors.get("email"), Some("Invalid email"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn attendance_without_employee_is_rejected() {
        let form = AttendanceForm {
            employee_id: String::new(),
            date: "2024-01-05".into(),
            status: "Present".into(),
        };
        let errors = validate_attendance(&form).expect_err("invalid");
        assert_eq!(errors.get("employee_id"), Some("Select an employee"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn attendance_reports_every_missing_field() {
        let errors = validate_attendance(&AttendanceForm::default()).expect_err("invalid");
        assert_eq!(errors.get("employee_id"), Some("Select an employee"));
        assert_eq!(errors.get("date"), Some("Pick a date"));
        assert_eq!(errors.get("status"), Some("Select status"));
    }

    #[test]
    fn attendance_rejects_unknown_status_and_bad_date() {
        let form = AttendanceForm {
            employee_id: "E1".into(),
            date: "2024-13-40".into(),
            status: "Late".into(),
        };
        let errors = validate_attendance(&form).expect_err("invalid");
        assert_eq!(errors.get("date"), Some("Invalid date"));
        assert_eq!(errors.get("status"), Some("Invalid status"));
    }

    #[test]
    fn attendance_builds_a_typed_record() {
        let form = AttendanceForm {
            employee_id: "E1".into(),
            date: "2024-02-29".into(),
            status: "Absent".into(),
        };
        let record = validate_attendance(&form).expect("valid");
        assert_eq!(record.status, AttendanceStatus::Absent);
        assert_eq!(record.iso_date(), "2024-02-29");
    }

    #[test]
    fn field_errors_serialize_as_flat_object() {
        let mut errors = FieldErrors::default();
        errors.insert("email", "Invalid email");
        let json = serde_json::to_value(&errors).expect("json");
        assert_eq!(json, serde_json::json!({"email": "Invalid email"}));
    }
}
