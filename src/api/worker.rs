use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    model::worker::WorkerInput,
    store::Store,
    utils::input::{NumberOrText, parse_rate, present, present_str},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerPayload {
    #[schema(example = "Aminah Binti Yusof", value_type = String)]
    pub full_name: Option<String>,

    /// Number or numeric string
    #[schema(example = 12.5, value_type = f64)]
    pub hourly_rate: Option<NumberOrText>,
}

impl WorkerPayload {
    fn validate(&self) -> AppResult<WorkerInput> {
        let (Some(full_name), Some(rate)) =
            (present_str(&self.full_name), present(&self.hourly_rate))
        else {
            return Err(AppError::validation("Missing required fields"));
        };

        Ok(WorkerInput {
            full_name: full_name.to_string(),
            hourly_rate: parse_rate(rate)?,
        })
    }
}

/// List Workers
#[utoipa::path(
    get,
    path = "/api/workers",
    responses(
        (status = 200, description = "All workers", body = [crate::model::worker::Worker]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Worker"
)]
pub async fn list_workers<S: Store>(store: web::Data<S>) -> AppResult<HttpResponse> {
    let workers = store.list_workers().await?;
    Ok(HttpResponse::Ok().json(workers))
}

/// Get Worker by ID
#[utoipa::path(
    get,
    path = "/api/workers/{worker_id}",
    params(
        ("worker_id", Path, description = "Worker ID")
    ),
    responses(
        (status = 200, description = "Worker found", body = crate::model::worker::Worker),
        (status = 404, description = "Worker not found", body = Object, example = json!({
            "error": "Worker not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Worker"
)]
pub async fn get_worker<S: Store>(
    store: web::Data<S>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    let worker_id = path.into_inner();

    let worker = store
        .find_worker(worker_id)
        .await?
        .ok_or_else(|| AppError::worker_not_found(worker_id))?;

    Ok(HttpResponse::Ok().json(worker))
}

/// Create Worker
#[utoipa::path(
    post,
    path = "/api/workers",
    request_body = WorkerPayload,
    responses(
        (status = 201, description = "Worker created", body = crate::model::worker::Worker),
        (status = 400, description = "Missing or invalid field", body = Object, example = json!({
            "error": "Missing required fields"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Worker"
)]
pub async fn create_worker<S: Store>(
    store: web::Data<S>,
    payload: web::Json<WorkerPayload>,
) -> AppResult<HttpResponse> {
    let input = payload.validate()?;

    let worker = store.create_worker(&input).await?;
    info!(worker_id = worker.id, hourly_rate = worker.hourly_rate, "Worker created");

    Ok(HttpResponse::Created().json(worker))
}

/// Update Worker
///
/// Both fields are required and overwritten.
#[utoipa::path(
    put,
    path = "/api/workers/{worker_id}",
    params(
        ("worker_id", Path, description = "Worker ID")
    ),
    request_body = WorkerPayload,
    responses(
        (status = 200, description = "Worker updated", body = crate::model::worker::Worker),
        (status = 400, description = "Missing or invalid field"),
        (status = 404, description = "Worker not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Worker"
)]
pub async fn update_worker<S: Store>(
    store: web::Data<S>,
    path: web::Path<u64>,
    payload: web::Json<WorkerPayload>,
) -> AppResult<HttpResponse> {
    let worker_id = path.into_inner();
    let input = payload.validate()?;

    let worker = store
        .update_worker(worker_id, &input)
        .await?
        .ok_or_else(|| AppError::worker_not_found(worker_id))?;
    info!(worker_id, "Worker updated");

    Ok(HttpResponse::Ok().json(worker))
}

/// Delete Worker
///
/// Attendance and saved payslips of the worker are deleted with it.
#[utoipa::path(
    delete,
    path = "/api/workers/{worker_id}",
    params(
        ("worker_id", Path, description = "Worker ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "success": true
        })),
        (status = 404, description = "Worker not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Worker"
)]
pub async fn delete_worker<S: Store>(
    store: web::Data<S>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    let worker_id = path.into_inner();

    if !store.delete_worker(worker_id).await? {
        return Err(AppError::worker_not_found(worker_id));
    }
    info!(worker_id, "Worker deleted");

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
