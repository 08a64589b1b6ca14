use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use super::attendance::DateQuery;
use super::employee::{RosterQuery, RosterView};
use super::ApiError;
use crate::controller::DashboardController;
use crate::model::{AttendanceRecord, Employee, EmployeeSummary};
use crate::store::RecordStore;

#[derive(Serialize, ToSchema)]
pub struct EmployeeDashboard {
    pub employee: Employee,
    /// Chart buckets, calendar marks and totals over every record.
    pub summary: EmployeeSummary,
    #[schema(example = "2024-01")]
    pub date: String,
    /// Rows matching `date`, newest first.
    pub records: Vec<AttendanceRecord>,
}

/// Dashboard overview cards
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Totals across all employees", body = Overview),
        (status = 502, description = "Unable to load dashboard data", body = ErrorBody)
    ),
    tag = "Dashboard"
)]
#[instrument(skip(store))]
pub async fn overview(store: web::Data<dyn RecordStore>) -> Result<HttpResponse, ApiError> {
    let mut dashboard = DashboardController::new(store.into_inner());

    dashboard
        .load()
        .await
        .map_err(|e| ApiError::store("Unable to load dashboard data.", e))?;

    let cards = dashboard.overview().ready().copied().unwrap_or_default();
    Ok(HttpResponse::Ok().json(cards))
}

/// Dashboard employee sidebar
#[utoipa::path(
    get,
    path = "/api/dashboard/employees",
    params(
        ("search", Query, description = "Case-insensitive match on name or employee ID")
    ),
    responses(
        (status = 200, description = "Matching employees", body = RosterView),
        (status = 502, description = "Employee store unavailable", body = ErrorBody)
    ),
    tag = "Dashboard"
)]
#[instrument(skip(store, query))]
pub async fn sidebar(
    store: web::Data<dyn RecordStore>,
    query: web::Query<RosterQuery>,
) -> Result<HttpResponse, ApiError> {
    let mut dashboard = DashboardController::new(store.into_inner());
    dashboard.set_search(query.into_inner().search.unwrap_or_default());

    dashboard
        .load_roster()
        .await
        .map_err(|e| ApiError::store("Failed to load employees.", e))?;

    let total = dashboard.employees().ready().map(Vec::len).unwrap_or_default();
    Ok(HttpResponse::Ok().json(RosterView {
        employees: dashboard.filtered_employees().into_iter().cloned().collect(),
        total,
        search: dashboard.search().to_string(),
    }))
}

/// Attendance details for one employee
#[utoipa::path(
    get,
    path = "/api/dashboard/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID"),
        ("date", Query, description = "Keep rows whose ISO date contains this text")
    ),
    responses(
        (status = 200, description = "Chart, calendar and records", body = EmployeeDashboard),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 502, description = "Store unavailable", body = ErrorBody)
    ),
    tag = "Dashboard"
)]
#[instrument(skip(store, query))]
pub async fn employee_details(
    store: web::Data<dyn RecordStore>,
    path: web::Path<String>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let mut dashboard = DashboardController::new(store.into_inner());
    dashboard.set_date_query(query.into_inner().date.unwrap_or_default());

    dashboard
        .load_roster()
        .await
        .map_err(|e| ApiError::store("Failed to load employees.", e))?;

    let found = dashboard
        .select_employee(&employee_id)
        .await
        .map_err(|e| ApiError::store("Failed to load attendance.", e))?;

    let (true, Some(employee), Some(summary)) =
        (found, dashboard.selected().cloned(), dashboard.summary())
    else {
        return Err(ApiError::NotFound("Employee not found".into()));
    };

    Ok(HttpResponse::Ok().json(EmployeeDashboard {
        employee,
        summary,
        date: dashboard.date_query().to_string(),
        records: dashboard.visible_records().into_iter().cloned().collect(),
    }))
}
