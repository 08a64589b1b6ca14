use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use super::{Generation, LoadState, Ticket, apply};
use crate::analytics;
use crate::model::{AttendanceRecord, Employee, EmployeeSummary, Overview};
use crate::store::{RecordStore, StoreError};

/// Dashboard: overview cards plus the per-employee attendance drill-down.
pub struct DashboardController {
    store: Arc<dyn RecordStore>,
    employees: LoadState<Vec<Employee>>,
    overview: LoadState<Overview>,
    search: String,
    selected: Option<Employee>,
    records: LoadState<Vec<AttendanceRecord>>,
    date_query: String,
    loads: Generation,
    record_loads: Generation,
}

impl DashboardController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            employees: LoadState::Idle,
            overview: LoadState::Idle,
            search: String::new(),
            selected: None,
            records: LoadState::Idle,
            date_query: String::new(),
            loads: Generation::default(),
            record_loads: Generation::default(),
        }
    }

    pub fn employees(&self) -> &LoadState<Vec<Employee>> {
        &self.employees
    }

    pub fn overview(&self) -> &LoadState<Overview> {
        &self.overview
    }

    pub async fn load_roster(&mut self) -> Result<(), StoreError> {
        let store = Arc::clone(&self.store);
        self.employees = LoadState::Loading;
        let ticket = self.loads.next();
        let result = store.list_employees().await;
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        apply(&self.loads, &mut self.employees, ticket, result);
        outcome
    }

    /// Loads the roster, then every employee's attendance to fill the cards.
    /// Employees whose attendance cannot be fetched are left out of the counts;
    /// only a roster failure fails the overview.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        self.overview = LoadState::Loading;
        if let Err(e) = self.load_roster().await {
            self.overview = LoadState::Failed(e.clone());
            return Err(e);
        }

        let employees = self.employees.ready().cloned().unwrap_or_default();
        let fetches = employees
            .iter()
            .map(|employee| self.store.list_attendance(&employee.employee_id));
        let results = join_all(fetches).await;

        let mut fetched: Vec<Vec<AttendanceRecord>> = Vec::with_capacity(results.len());
        for (employee, result) in employees.iter().zip(results) {
            match result {
                Ok(records) => fetched.push(records),
                Err(e) => {
                    warn!(error = %e, employee_id = %employee.employee_id, "Skipping attendance in overview");
                }
            }
        }

        let cards = analytics::overview(employees.len(), fetched.iter().map(Vec::as_slice));
        debug!(?cards, "Dashboard overview computed");
        self.overview = LoadState::Ready(cards);
        Ok(())
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Sidebar entries matching the search box.
    pub fn filtered_employees(&self) -> Vec<&Employee> {
        match &self.employees {
            LoadState::Ready(all) => analytics::filter_roster(all, &self.search),
            _ => Vec::new(),
        }
    }

    pub fn selected(&self) -> Option<&Employee> {
        self.selected.as_ref()
    }

    /// Selects an employee from the loaded roster. `None` when the id is not in it.
    pub fn select(&mut self, employee_id: &str) -> Option<Ticket> {
        let employee = self
            .employees
            .ready()?
            .iter()
            .find(|e| e.employee_id == employee_id)?
            .clone();

        self.selected = Some(employee);
        self.records = LoadState::Loading;
        Some(self.record_loads.next())
    }

    pub fn finish_records(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<AttendanceRecord>, StoreError>,
    ) -> bool {
        apply(&self.record_loads, &mut self.records, ticket, result)
    }

    /// Returns `Ok(false)` when the employee is not in the loaded roster.
    pub async fn select_employee(&mut self, employee_id: &str) -> Result<bool, StoreError> {
        let store = Arc::clone(&self.store);
        let Some(ticket) = self.select(employee_id) else {
            return Ok(false);
        };
        let result = store.list_attendance(employee_id).await;
        let outcome = result.as_ref().map(|_| true).map_err(|e| e.clone());
        self.finish_records(ticket, result);
        outcome
    }

    pub fn records(&self) -> &LoadState<Vec<AttendanceRecord>> {
        &self.records
    }

    pub fn set_date_query(&mut self, query: impl Into<String>) {
        self.date_query = query.into();
    }

    pub fn date_query(&self) -> &str {
        &self.date_query
    }

    pub fn visible_records(&self) -> Vec<&AttendanceRecord> {
        match &self.records {
            LoadState::Ready(records) => analytics::filter_by_date(records, &self.date_query),
            _ => Vec::new(),
        }
    }

    /// Chart, calendar and totals for the selected employee, over all records.
    pub fn summary(&self) -> Option<EmployeeSummary> {
        self.records.ready().map(|records| analytics::summarize(records))
    }
}
