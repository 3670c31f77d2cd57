use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    model::attendance::{AttendanceFilter, MarkAttendance, UpsertOutcome},
    store::Store,
    utils::input::{NumberOrText, parse_date, parse_id, parse_status, present, present_str},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Only this worker's records
    #[param(example = "1")]
    pub worker_id: Option<String>,

    /// Inclusive lower date bound
    #[param(example = "2026-01-01")]
    pub start_date: Option<String>,

    /// Inclusive upper date bound
    #[param(example = "2026-01-31")]
    pub end_date: Option<String>,
}

impl AttendanceQuery {
    fn filter(&self) -> AppResult<AttendanceFilter> {
        Ok(AttendanceFilter {
            worker_id: present_str(&self.worker_id)
                .map(|id| parse_id("workerId", &NumberOrText::Text(id.to_string())))
                .transpose()?,
            start_date: present_str(&self.start_date)
                .map(|d| parse_date("startDate", d))
                .transpose()?,
            end_date: present_str(&self.end_date)
                .map(|d| parse_date("endDate", d))
                .transpose()?,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordAttendance {
    #[schema(example = 1, value_type = u64)]
    pub worker_id: Option<NumberOrText>,

    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: Option<String>,

    #[schema(example = "FULL_DAY", value_type = crate::model::attendance::AttendanceStatus)]
    pub status: Option<String>,
}

impl RecordAttendance {
    fn validate(&self) -> AppResult<MarkAttendance> {
        let (Some(worker_id), Some(date), Some(status)) = (
            present(&self.worker_id),
            present_str(&self.date),
            present_str(&self.status),
        ) else {
            return Err(AppError::validation("Missing required fields"));
        };

        Ok(MarkAttendance {
            worker_id: parse_id("workerId", worker_id)?,
            date: parse_date("date", date)?,
            status: parse_status(status)?,
        })
    }
}

/// List Attendance
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Matching attendance, newest date first", body = [crate::model::attendance::AttendanceEntry]),
        (status = 400, description = "Malformed filter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance<S: Store>(
    store: web::Data<S>,
    query: web::Query<AttendanceQuery>,
) -> AppResult<HttpResponse> {
    let filter = query.filter()?;

    let entries = store.list_attendance(&filter).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// Record Attendance
///
/// Creates the record for the worker and date, or overwrites its status.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = RecordAttendance,
    responses(
        (status = 201, description = "Attendance created", body = crate::model::attendance::Attendance),
        (status = 200, description = "Existing attendance updated", body = crate::model::attendance::Attendance),
        (status = 400, description = "Missing or invalid field", body = Object, example = json!({
            "error": "Missing required fields"
        })),
        (status = 404, description = "Worker not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn record_attendance<S: Store>(
    store: web::Data<S>,
    payload: web::Json<RecordAttendance>,
) -> AppResult<HttpResponse> {
    let mark = payload.validate()?;

    if store.find_worker(mark.worker_id).await?.is_none() {
        return Err(AppError::worker_not_found(mark.worker_id));
    }

    let (attendance, outcome) = store.upsert_attendance(&mark).await?;
    info!(
        worker_id = mark.worker_id,
        date = %mark.date,
        status = %mark.status,
        ?outcome,
        "Attendance recorded"
    );

    Ok(match outcome {
        UpsertOutcome::Created => HttpResponse::Created().json(attendance),
        UpsertOutcome::Updated => HttpResponse::Ok().json(attendance),
    })
}
