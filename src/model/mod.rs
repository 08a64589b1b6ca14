pub mod attendance;
pub mod employee;
pub mod summary;

pub use attendance::{AttendanceForm, AttendanceRecord, AttendanceStatus};
pub use employee::{Employee, EmployeeForm};
pub use summary::{AttendanceTotals, CalendarMarks, EmployeeSummary, MonthlyBucket, Overview};
