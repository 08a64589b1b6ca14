use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "employee_id": "EMP-001",
        "date": "2024-01-05",
        "status": "Present"
    })
)]
pub struct AttendanceRecord {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "2024-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// ISO `YYYY-MM-DD` form of the date, as shown to the operator.
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Year-month key (`YYYY-MM`) used for monthly buckets.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    pub fn is_present(&self) -> bool {
        self.status == AttendanceStatus::Present
    }
}

/// Raw operator input for the "Record Attendance" form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct AttendanceForm {
    #[serde(default)]
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[serde(default)]
    #[schema(example = "2024-01-05")]
    pub date: String,
    #[serde(default)]
    #[schema(example = "Present")]
    pub status: String,
}
