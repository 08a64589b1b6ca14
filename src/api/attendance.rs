use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use super::ApiError;
use crate::controller::AttendanceController;
use crate::model::{AttendanceForm, AttendanceRecord, AttendanceTotals};
use crate::store::RecordStore;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceView {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    /// Partial date the rows were filtered by, e.g. `2024-01`.
    #[schema(example = "2024-01")]
    pub date: String,
    pub records: Vec<AttendanceRecord>,
    /// Counts over every record, regardless of `date`.
    pub totals: AttendanceTotals,
}

/// Attendance history for one employee
#[utoipa::path(
    get,
    path = "/api/attendance/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID"),
        ("date", Query, description = "Keep rows whose ISO date contains this text")
    ),
    responses(
        (status = 200, description = "Records, newest date first", body = AttendanceView),
        (status = 502, description = "Attendance store unavailable", body = ErrorBody)
    ),
    tag = "Attendance"
)]
#[instrument(skip(store, query))]
pub async fn employee_attendance(
    store: web::Data<dyn RecordStore>,
    path: web::Path<String>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let mut screen = AttendanceController::new(store.into_inner());
    screen.set_date_query(query.into_inner().date.unwrap_or_default());

    screen
        .select_employee(&employee_id)
        .await
        .map_err(|e| ApiError::store("Failed to load attendance.", e))?;

    Ok(HttpResponse::Ok().json(AttendanceView {
        employee_id,
        date: screen.date_query().to_string(),
        records: screen.visible_records().into_iter().cloned().collect(),
        totals: screen.totals(),
    }))
}

/// Record attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendanceForm,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceRecord),
        (status = 422, description = "Invalid form fields", body = ValidationBody),
        (status = 502, description = "Attendance store unavailable", body = ErrorBody)
    ),
    tag = "Attendance"
)]
#[instrument(skip(store, payload), fields(employee_id = %payload.employee_id))]
pub async fn record_attendance(
    store: web::Data<dyn RecordStore>,
    payload: web::Json<AttendanceForm>,
) -> Result<HttpResponse, ApiError> {
    let mut screen = AttendanceController::new(store.into_inner());

    let saved = screen
        .submit(&payload)
        .await
        .map_err(|e| ApiError::submit("Failed to record attendance.", e))?;

    Ok(HttpResponse::Created().json(saved))
}
