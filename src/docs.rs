use crate::api::attendance::{AttendanceView, DateQuery};
use crate::api::dashboard::EmployeeDashboard;
use crate::api::employee::{RosterQuery, RosterView};
use crate::api::{ErrorBody, MessageResponse, ValidationBody};
use crate::model::{
    AttendanceForm, AttendanceRecord, AttendanceStatus, AttendanceTotals, CalendarMarks, Employee,
    EmployeeForm, EmployeeSummary, MonthlyBucket, Overview,
};
use crate::store::StoreErrorKind;
use crate::validation::FieldErrors;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Portal API",
        version = "0.1.0",
        description = r#"
## HRM Portal

View endpoints behind the **HRM Portal** screens: an employee roster, daily attendance
tracking and an attendance dashboard.

### 🔹 Screens
- **Employees**
  - List and search the roster, add and delete employees
- **Attendance**
  - Record Present/Absent per employee and day, browse an employee's history
- **Dashboard**
  - Overview cards, monthly present/absent chart data and calendar marks

### 📦 Response Format
- JSON bodies
- `422` carries per-field validation messages
- `502` means the employee/attendance store could not be reached; an empty list is always `200`

---
Built with **Rust**, **Actix Web**, **reqwest**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::employee_attendance,
        crate::api::attendance::record_attendance,

        crate::api::dashboard::overview,
        crate::api::dashboard::sidebar,
        crate::api::dashboard::employee_details
    ),
    components(
        schemas(
            Employee,
            EmployeeForm,
            AttendanceRecord,
            AttendanceForm,
            AttendanceStatus,
            AttendanceTotals,
            MonthlyBucket,
            CalendarMarks,
            EmployeeSummary,
            Overview,
            RosterQuery,
            RosterView,
            DateQuery,
            AttendanceView,
            EmployeeDashboard,
            MessageResponse,
            ErrorBody,
            ValidationBody,
            FieldErrors,
            StoreErrorKind
        )
    ),
    tags(
        (name = "Employee", description = "Roster screen"),
        (name = "Attendance", description = "Attendance screen"),
        (name = "Dashboard", description = "Dashboard screen"),
    )
)]
pub struct ApiDoc;
