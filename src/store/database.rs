use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::{debug, error};

use super::{RecordStore, StoreError, StoreErrorKind};
use crate::model::{AttendanceRecord, AttendanceStatus, Employee};

/// SQLSTATE class for integrity constraint violations (duplicate key, foreign key).
const INTEGRITY_VIOLATION: &str = "23000";

/// Reads and writes the `employees` and `attendance` tables directly.
#[derive(Clone)]
pub struct DatabaseStore {
    pool: MySqlPool,
}

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    employee_id: String,
    full_name: String,
    email: String,
    department: String,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            employee_id: row.employee_id,
            full_name: row.full_name,
            email: row.email,
            department: row.department,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AttendanceRow {
    employee_id: String,
    date: NaiveDate,
    status: String,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<AttendanceStatus>().map_err(|_| {
            StoreError::invalid_payload(format!(
                "unknown attendance status {:?} for {}",
                row.status, row.employee_id
            ))
        })?;

        Ok(AttendanceRecord {
            employee_id: row.employee_id,
            date: row.date,
            status,
        })
    }
}

pub(crate) fn map_sqlx_error(err: &sqlx::Error, action: &str) -> StoreError {
    let message = format!("{action}: {err}");
    match err {
        sqlx::Error::RowNotFound => StoreError::not_found(message),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(INTEGRITY_VIOLATION) => {
            StoreError::conflict(db_err.message().to_string())
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::transport(message),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::TypeNotFound { .. } => StoreError::invalid_payload(message),
        _ => StoreError::backend(message),
    }
}

/// Attendance has no unique key, so an integrity violation on insert is the
/// employee foreign key: the referenced employee does not exist.
pub(crate) fn map_attendance_insert_error(err: &sqlx::Error) -> StoreError {
    let mut mapped = map_sqlx_error(err, "record attendance");
    if mapped.kind == StoreErrorKind::Conflict {
        mapped.kind = StoreErrorKind::Validation;
    }
    mapped
}

impl DatabaseStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_employee(&self, employee_id: &str) -> Result<Employee, sqlx::Error> {
        sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT employee_id, full_name, email, department
            FROM employees
            WHERE employee_id = ?
            "#,
        )
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await
        .map(Employee::from)
    }
}

#[async_trait]
impl RecordStore for DatabaseStore {
    fn backend_tag(&self) -> &'static str {
        "database"
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError> {
        debug!("Fetching employees");
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT employee_id, full_name, email, department
            FROM employees
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch employees");
            map_sqlx_error(&e, "list employees")
        })?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn create_employee(&self, employee: &Employee) -> Result<Employee, StoreError> {
        debug!(employee_id = %employee.employee_id, "Creating employee");
        sqlx::query(
            r#"
            INSERT INTO employees (employee_id, full_name, email, department)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&employee.employee_id)
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(&employee.department)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = %employee.employee_id, "Failed to create employee");
            map_sqlx_error(&e, "create employee")
        })?;

        self.fetch_employee(&employee.employee_id)
            .await
            .map_err(|e| map_sqlx_error(&e, "read back employee"))
    }

    async fn delete_employee(&self, employee_id: &str) -> Result<(), StoreError> {
        debug!(employee_id, "Deleting employee");
        let result = sqlx::query(r#"DELETE FROM employees WHERE employee_id = ?"#)
            .bind(employee_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, employee_id, "Failed to delete employee");
                map_sqlx_error(&e, "delete employee")
            })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(format!(
                "employee {employee_id} not found"
            )));
        }
        Ok(())
    }

    async fn record_attendance(
        &self,
        record: &AttendanceRecord,
    ) -> Result<AttendanceRecord, StoreError> {
        debug!(employee_id = %record.employee_id, date = %record.date, "Recording attendance");
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, status)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&record.employee_id)
        .bind(record.date)
        .bind(record.status.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = %record.employee_id, "Failed to record attendance");
            map_attendance_insert_error(&e)
        })?;

        let row = sqlx::query_as::<_, AttendanceRow>(
            r#"SELECT employee_id, date, status FROM attendance WHERE id = ?"#,
        )
        .bind(result.last_insert_id())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(&e, "read back attendance"))?;

        AttendanceRecord::try_from(row)
    }

    async fn list_attendance(
        &self,
        employee_id: &str,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        debug!(employee_id, "Fetching attendance");
        let rows = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT employee_id, date, status
            FROM attendance
            WHERE employee_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch attendance");
            map_sqlx_error(&e, "list attendance")
        })?;

        rows.into_iter().map(AttendanceRecord::try_from).collect()
    }
}
