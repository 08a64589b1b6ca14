use std::sync::Arc;

use tracing::{info, warn};

use super::{Generation, LoadState, SubmitError, Ticket, apply};
use crate::analytics;
use crate::model::{Employee, EmployeeForm};
use crate::store::{RecordStore, StoreError};
use crate::validation::{self, FieldErrors};

/// Employees screen: the roster table, its search box and the add form.
pub struct RosterController {
    store: Arc<dyn RecordStore>,
    employees: LoadState<Vec<Employee>>,
    search: String,
    form_errors: FieldErrors,
    loads: Generation,
}

impl RosterController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            employees: LoadState::Idle,
            search: String::new(),
            form_errors: FieldErrors::default(),
            loads: Generation::default(),
        }
    }

    pub fn state(&self) -> &LoadState<Vec<Employee>> {
        &self.employees
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Roster rows matching the search box. Empty unless the roster is loaded.
    pub fn visible(&self) -> Vec<&Employee> {
        match &self.employees {
            LoadState::Ready(all) => analytics::filter_roster(all, &self.search),
            _ => Vec::new(),
        }
    }

    pub fn form_errors(&self) -> &FieldErrors {
        &self.form_errors
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.employees = LoadState::Loading;
        self.loads.next()
    }

    pub fn finish_load(&mut self, ticket: Ticket, result: Result<Vec<Employee>, StoreError>) -> bool {
        apply(&self.loads, &mut self.employees, ticket, result)
    }

    pub async fn load(&mut self) -> Result<(), StoreError> {
        let store = Arc::clone(&self.store);
        let ticket = self.begin_load();
        let result = store.list_employees().await;
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        self.finish_load(ticket, result);
        outcome
    }

    /// Validates and creates the employee. On any failure the roster is left
    /// as it was. The roster itself is not reloaded; see [`Self::add_and_reload`].
    pub async fn add(&mut self, form: &EmployeeForm) -> Result<Employee, SubmitError> {
        let employee = match validation::validate_employee(form) {
            Ok(employee) => employee,
            Err(errors) => {
                self.form_errors = errors.clone();
                return Err(SubmitError::Validation(errors));
            }
        };
        self.form_errors = FieldErrors::default();

        let created = self.store.create_employee(&employee).await.map_err(|e| {
            warn!(error = %e, employee_id = %employee.employee_id, "Failed to add employee");
            e
        })?;
        info!(employee_id = %created.employee_id, "Employee added");
        Ok(created)
    }

    /// [`Self::add`], then refreshes the table the operator is looking at.
    pub async fn add_and_reload(&mut self, form: &EmployeeForm) -> Result<Employee, SubmitError> {
        let created = self.add(form).await?;
        self.reload_after("add").await;
        Ok(created)
    }

    pub async fn delete(&mut self, employee_id: &str) -> Result<(), StoreError> {
        self.store.delete_employee(employee_id).await.map_err(|e| {
            warn!(error = %e, employee_id, "Failed to delete employee");
            e
        })?;
        info!(employee_id, "Employee deleted");
        Ok(())
    }

    pub async fn delete_and_reload(&mut self, employee_id: &str) -> Result<(), StoreError> {
        self.delete(employee_id).await?;
        self.reload_after("delete").await;
        Ok(())
    }

    // The write already succeeded; a failed refresh shows up in `state()`.
    async fn reload_after(&mut self, action: &'static str) {
        if let Err(e) = self.load().await {
            warn!(error = %e, action, "Roster refresh failed");
        }
    }
}
