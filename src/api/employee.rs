use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use super::{ApiError, MessageResponse};
use crate::controller::RosterController;
use crate::model::{Employee, EmployeeForm};
use crate::store::RecordStore;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RosterQuery {
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RosterView {
    #[schema(
    example = json!([{
        "employee_id": "EMP-001",
        "full_name": "Jane Doe",
        "email": "jane@company.com",
        "department": "Engineering"
    }])
)]
    pub employees: Vec<Employee>,
    /// Roster size before the search filter.
    #[schema(example = 10)]
    pub total: usize,
    #[schema(example = "jane")]
    pub search: String,
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/employees",
    params(
        ("search", Query, description = "Case-insensitive match on name or employee ID")
    ),
    responses(
        (status = 200, description = "Roster, newest first", body = RosterView),
        (status = 502, description = "Employee store unavailable", body = ErrorBody)
    ),
    tag = "Employee"
)]
#[instrument(skip(store, query))]
pub async fn list_employees(
    store: web::Data<dyn RecordStore>,
    query: web::Query<RosterQuery>,
) -> Result<HttpResponse, ApiError> {
    let mut roster = RosterController::new(store.into_inner());
    roster.set_search(query.into_inner().search.unwrap_or_default());

    roster
        .load()
        .await
        .map_err(|e| ApiError::store("Failed to load employees.", e))?;

    let total = roster.state().ready().map(Vec::len).unwrap_or_default();
    Ok(HttpResponse::Ok().json(RosterView {
        employees: roster.visible().into_iter().cloned().collect(),
        total,
        search: roster.search().to_string(),
    }))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeeForm,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 409, description = "Employee ID already exists", body = ErrorBody),
        (status = 422, description = "Invalid form fields", body = ValidationBody),
        (status = 502, description = "Employee store unavailable", body = ErrorBody)
    ),
    tag = "Employee"
)]
#[instrument(skip(store, payload), fields(employee_id = %payload.employee_id))]
pub async fn create_employee(
    store: web::Data<dyn RecordStore>,
    payload: web::Json<EmployeeForm>,
) -> Result<HttpResponse, ApiError> {
    let mut roster = RosterController::new(store.into_inner());

    let created = roster
        .add(&payload)
        .await
        .map_err(|e| ApiError::submit("Failed to add employee.", e))?;

    Ok(HttpResponse::Created().json(created))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = MessageResponse),
        (status = 404, description = "Employee not found", body = ErrorBody),
        (status = 502, description = "Employee store unavailable", body = ErrorBody)
    ),
    tag = "Employee"
)]
#[instrument(skip(store))]
pub async fn delete_employee(
    store: web::Data<dyn RecordStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let mut roster = RosterController::new(store.into_inner());

    roster
        .delete(&employee_id)
        .await
        .map_err(|e| ApiError::store("Failed to delete employee.", e))?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Employee deleted")))
}
