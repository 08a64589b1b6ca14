use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{RecordStore, StoreError};
use crate::model::{AttendanceRecord, Employee};

/// Process-local store with the same ordering and conflict rules as the real
/// backends. Failures can be injected to exercise error paths.
#[derive(Default)]
pub struct InMemoryStore {
    employees: Mutex<Vec<Employee>>,
    attendance: Mutex<Vec<AttendanceRecord>>,
    failure: Mutex<Option<StoreError>>,
    failing_attendance: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the roster; the last employee given counts as the newest.
    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let store = Self::default();
        {
            let mut roster = store.employees.lock().expect("employee store poisoned");
            for employee in employees {
                roster.insert(0, employee);
            }
        }
        store
    }

    pub fn with_attendance(self, records: impl IntoIterator<Item = AttendanceRecord>) -> Self {
        self.attendance
            .lock()
            .expect("attendance store poisoned")
            .extend(records);
        self
    }

    /// Every following call fails with `error` until cleared with `None`.
    pub fn set_failure(&self, error: Option<StoreError>) {
        *self.failure.lock().expect("failure slot poisoned") = error;
    }

    /// `list_attendance` for this employee fails with a transport error.
    pub fn fail_attendance_for(&self, employee_id: &str) {
        self.failing_attendance
            .lock()
            .expect("failure slot poisoned")
            .insert(employee_id.to_string());
    }

    /// Number of store operations issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn employee_ids(&self) -> Vec<String> {
        self.employees
            .lock()
            .expect("employee store poisoned")
            .iter()
            .map(|e| e.employee_id.clone())
            .collect()
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().expect("failure slot poisoned").as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError> {
        self.enter()?;
        Ok(self.employees.lock().expect("employee store poisoned").clone())
    }

    async fn create_employee(&self, employee: &Employee) -> Result<Employee, StoreError> {
        self.enter()?;
        let mut roster = self.employees.lock().expect("employee store poisoned");
        if roster.iter().any(|e| e.employee_id == employee.employee_id) {
            return Err(StoreError::conflict(format!(
                "employee {} already exists",
                employee.employee_id
            )));
        }
        roster.insert(0, employee.clone());
        Ok(employee.clone())
    }

    async fn delete_employee(&self, employee_id: &str) -> Result<(), StoreError> {
        self.enter()?;
        let mut roster = self.employees.lock().expect("employee store poisoned");
        let before = roster.len();
        roster.retain(|e| e.employee_id != employee_id);
        if roster.len() == before {
            return Err(StoreError::not_found(format!("employee {employee_id} not found")));
        }
        Ok(())
    }

    async fn record_attendance(
        &self,
        record: &AttendanceRecord,
    ) -> Result<AttendanceRecord, StoreError> {
        self.enter()?;
        self.attendance
            .lock()
            .expect("attendance store poisoned")
            .push(record.clone());
        Ok(record.clone())
    }

    async fn list_attendance(
        &self,
        employee_id: &str,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.enter()?;
        if self
            .failing_attendance
            .lock()
            .expect("failure slot poisoned")
            .contains(employee_id)
        {
            return Err(StoreError::transport(format!(
                "attendance for {employee_id} unavailable"
            )));
        }

        let mut records: Vec<AttendanceRecord> = self
            .attendance
            .lock()
            .expect("attendance store poisoned")
            .iter()
            .rev()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }
}
