use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// Present/absent counts for one `YYYY-MM` month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthlyBucket {
    #[schema(example = "2024-01")]
    pub month: String,
    #[schema(example = 1)]
    pub present: usize,
    #[schema(example = 1)]
    pub absent: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceTotals {
    #[schema(example = 2)]
    pub present: usize,
    #[schema(example = 1)]
    pub absent: usize,
}

impl AttendanceTotals {
    pub fn total(&self) -> usize {
        self.present + self.absent
    }
}

/// Dates to mark on the calendar widget, split by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CalendarMarks {
    #[schema(value_type = Vec<String>, example = json!(["2024-01-05", "2024-02-02"]))]
    pub present_dates: Vec<NaiveDate>,
    #[schema(value_type = Vec<String>, example = json!(["2024-01-09"]))]
    pub absent_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EmployeeSummary {
    pub totals: AttendanceTotals,
    pub monthly: Vec<MonthlyBucket>,
    pub calendar: CalendarMarks,
}

/// Dashboard cards: roster size and attendance across every employee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Overview {
    #[schema(example = 12)]
    pub total_employees: usize,
    #[schema(example = 240)]
    pub total_records: usize,
    #[schema(example = 220)]
    pub present: usize,
    #[schema(example = 20)]
    pub absent: usize,
    /// Whole-number percentage of present records.
    #[schema(example = 92)]
    pub attendance_rate: u32,
}
