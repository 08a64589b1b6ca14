use std::sync::Arc;

use tracing::{info, warn};

use super::{Generation, LoadState, SubmitError, Ticket, apply};
use crate::analytics;
use crate::model::{AttendanceForm, AttendanceRecord, AttendanceTotals, Employee};
use crate::store::{RecordStore, StoreError};
use crate::validation::{self, FieldErrors};

/// Attendance screen: the record form plus the per-employee history table.
pub struct AttendanceController {
    store: Arc<dyn RecordStore>,
    roster: LoadState<Vec<Employee>>,
    selected: Option<String>,
    records: LoadState<Vec<AttendanceRecord>>,
    date_query: String,
    form_errors: FieldErrors,
    roster_loads: Generation,
    record_loads: Generation,
}

impl AttendanceController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            roster: LoadState::Idle,
            selected: None,
            records: LoadState::Idle,
            date_query: String::new(),
            form_errors: FieldErrors::default(),
            roster_loads: Generation::default(),
            record_loads: Generation::default(),
        }
    }

    /// Employees offered in the selector.
    pub fn roster(&self) -> &LoadState<Vec<Employee>> {
        &self.roster
    }

    pub async fn load_roster(&mut self) -> Result<(), StoreError> {
        let store = Arc::clone(&self.store);
        self.roster = LoadState::Loading;
        let ticket = self.roster_loads.next();
        let result = store.list_employees().await;
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        apply(&self.roster_loads, &mut self.roster, ticket, result);
        outcome
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn records(&self) -> &LoadState<Vec<AttendanceRecord>> {
        &self.records
    }

    /// Switches the history table to `employee_id`. Any fetch still in flight
    /// for the previous selection becomes stale.
    pub fn select(&mut self, employee_id: impl Into<String>) -> Ticket {
        self.selected = Some(employee_id.into());
        self.records = LoadState::Loading;
        self.record_loads.next()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.records = LoadState::Idle;
        self.record_loads.next();
    }

    pub fn finish_records(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<AttendanceRecord>, StoreError>,
    ) -> bool {
        apply(&self.record_loads, &mut self.records, ticket, result)
    }

    pub async fn select_employee(&mut self, employee_id: &str) -> Result<(), StoreError> {
        let store = Arc::clone(&self.store);
        let ticket = self.select(employee_id);
        let result = store.list_attendance(employee_id).await;
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        self.finish_records(ticket, result);
        outcome
    }

    /// Reloads the history for the current selection, if any.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        match self.selected.clone() {
            Some(employee_id) => self.select_employee(&employee_id).await,
            None => Ok(()),
        }
    }

    pub fn date_query(&self) -> &str {
        &self.date_query
    }

    pub fn set_date_query(&mut self, query: impl Into<String>) {
        self.date_query = query.into();
    }

    pub fn visible_records(&self) -> Vec<&AttendanceRecord> {
        match &self.records {
            LoadState::Ready(records) => analytics::filter_by_date(records, &self.date_query),
            _ => Vec::new(),
        }
    }

    /// Counts over every loaded record, ignoring the date filter.
    pub fn totals(&self) -> AttendanceTotals {
        self.records
            .ready()
            .map(|records| analytics::totals(records))
            .unwrap_or_default()
    }

    pub fn form_errors(&self) -> &FieldErrors {
        &self.form_errors
    }

    /// Validates and appends the record. The history table is refreshed when
    /// it shows the same employee.
    pub async fn submit(&mut self, form: &AttendanceForm) -> Result<AttendanceRecord, SubmitError> {
        let record = match validation::validate_attendance(form) {
            Ok(record) => record,
            Err(errors) => {
                self.form_errors = errors.clone();
                return Err(SubmitError::Validation(errors));
            }
        };
        self.form_errors = FieldErrors::default();

        let saved = self.store.record_attendance(&record).await.map_err(|e| {
            warn!(error = %e, employee_id = %record.employee_id, "Failed to record attendance");
            e
        })?;
        info!(employee_id = %saved.employee_id, date = %saved.date, status = %saved.status, "Attendance recorded");

        if self.selected.as_deref() == Some(saved.employee_id.as_str()) {
            if let Err(e) = self.refresh().await {
                warn!(error = %e, "Attendance refresh after submit failed");
            }
        }
        Ok(saved)
    }
}
