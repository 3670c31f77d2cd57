use actix_web::{HttpResponse, http::header::ContentType, web};
use serde::Deserialize;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    model::payslip::{NewPayslipSummary, PayPeriod, Payslip},
    store::Store,
    utils::input::{NumberOrText, parse_date, parse_id, present, present_str},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PayslipQuery {
    #[param(example = "1")]
    pub worker_id: Option<String>,

    /// Inclusive first day
    #[param(example = "2026-01-01")]
    pub start_date: Option<String>,

    /// Inclusive last day
    #[param(example = "2026-01-31")]
    pub end_date: Option<String>,
}

impl PayslipQuery {
    fn period(&self) -> AppResult<PayPeriod> {
        let (Some(worker_id), Some(start), Some(end)) = (
            present_str(&self.worker_id),
            present_str(&self.start_date),
            present_str(&self.end_date),
        ) else {
            return Err(AppError::validation("Missing required parameters"));
        };

        let worker_id = parse_id("workerId", &NumberOrText::Text(worker_id.to_string()))?;
        pay_period(worker_id, start, end)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavePayslip {
    #[schema(example = 1, value_type = u64)]
    pub worker_id: Option<NumberOrText>,

    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: Option<String>,

    #[schema(example = "2026-01-31", format = "date", value_type = String)]
    pub end_date: Option<String>,
}

impl SavePayslip {
    fn period(&self) -> AppResult<PayPeriod> {
        let (Some(worker_id), Some(start), Some(end)) = (
            present(&self.worker_id),
            present_str(&self.start_date),
            present_str(&self.end_date),
        ) else {
            return Err(AppError::validation("Missing required fields"));
        };

        pay_period(parse_id("workerId", worker_id)?, start, end)
    }
}

fn pay_period(worker_id: u64, start: &str, end: &str) -> AppResult<PayPeriod> {
    let start_date = parse_date("startDate", start)?;
    let end_date = parse_date("endDate", end)?;

    if start_date > end_date {
        return Err(AppError::validation("startDate must not be after endDate"));
    }

    Ok(PayPeriod {
        worker_id,
        start_date,
        end_date,
    })
}

/// Recomputes the payslip for `period` from stored attendance.
pub async fn build_payslip<S: Store>(store: &S, period: PayPeriod) -> AppResult<Payslip> {
    let worker = store
        .find_worker(period.worker_id)
        .await?
        .ok_or_else(|| AppError::worker_not_found(period.worker_id))?;

    let attendances = store.attendance_in_period(&period).await?;
    debug!(
        worker_id = worker.id,
        start = %period.start_date,
        end = %period.end_date,
        records = attendances.len(),
        "Aggregating attendance"
    );

    let payslip = Payslip::new(&worker, period, attendances);
    if !payslip.total_amount.is_finite() {
        return Err(AppError::validation(format!(
            "totalAmount for worker {} overflows at hourly rate {}",
            worker.id, worker.hourly_rate
        )));
    }

    Ok(payslip)
}

/// Generate Payslip
#[utoipa::path(
    get,
    path = "/api/payslip",
    params(PayslipQuery),
    responses(
        (status = 200, description = "Payslip computed from attendance", body = Payslip),
        (status = 400, description = "Missing or invalid parameter", body = Object, example = json!({
            "error": "Missing required parameters"
        })),
        (status = 404, description = "Worker not found", body = Object, example = json!({
            "error": "Worker not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payslip"
)]
pub async fn generate_payslip<S: Store>(
    store: web::Data<S>,
    query: web::Query<PayslipQuery>,
) -> AppResult<HttpResponse> {
    let period = query.period()?;

    let payslip = build_payslip(store.get_ref(), period).await?;
    Ok(HttpResponse::Ok().json(payslip))
}

/// Payslip as Plain Text
#[utoipa::path(
    get,
    path = "/api/payslip/text",
    params(PayslipQuery),
    responses(
        (status = 200, description = "Printable payslip", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing or invalid parameter"),
        (status = 404, description = "Worker not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payslip"
)]
pub async fn payslip_text<S: Store>(
    store: web::Data<S>,
    config: web::Data<Config>,
    query: web::Query<PayslipQuery>,
) -> AppResult<HttpResponse> {
    let period = query.period()?;

    let payslip = build_payslip(store.get_ref(), period).await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(payslip.render_text(&config.currency_label)))
}

/// Save Payslip
///
/// Recomputes the totals and stores them as a summary row.
#[utoipa::path(
    post,
    path = "/api/payslip",
    request_body = SavePayslip,
    responses(
        (status = 201, description = "Payslip summary stored", body = crate::model::payslip::PayslipSummary),
        (status = 400, description = "Missing or invalid field"),
        (status = 404, description = "Worker not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payslip"
)]
pub async fn save_payslip<S: Store>(
    store: web::Data<S>,
    payload: web::Json<SavePayslip>,
) -> AppResult<HttpResponse> {
    let period = payload.period()?;

    let payslip = build_payslip(store.get_ref(), period).await?;
    let summary = store
        .insert_payslip_summary(&NewPayslipSummary::from_payslip(&payslip))
        .await?;
    info!(
        payslip_id = summary.id,
        worker_id = summary.worker_id,
        total_amount = summary.total_amount,
        "Payslip saved"
    );

    Ok(HttpResponse::Created().json(summary))
}

#[cfg(test)]
mod tests {
    use crate::model::attendance::{AttendanceStatus, MarkAttendance};
    use crate::model::worker::WorkerInput;
    use crate::store::{MemoryStore, Store};
    use actix_web::{http::StatusCode, test, web};
    use chrono::NaiveDate;
    use serde_json::json;

    async fn seed(store: &MemoryStore, rate: f64, marks: &[(u32, AttendanceStatus)]) -> u64 {
        let worker = store
            .create_worker(&WorkerInput {
                full_name: "Aminah".to_string(),
                hourly_rate: rate,
            })
            .await
            .unwrap();

        for (day, status) in marks {
            store
                .upsert_attendance(&MarkAttendance {
                    worker_id: worker.id,
                    date: NaiveDate::from_ymd_opt(2026, 1, *day).unwrap(),
                    status: *status,
                })
                .await
                .unwrap();
        }
        worker.id
    }

    #[actix_web::test]
    async fn payslip_for_mixed_attendance() {
        let store = web::Data::new(MemoryStore::new());
        let worker_id = seed(
            &store,
            10.0,
            &[
                (1, AttendanceStatus::FullDay),
                (2, AttendanceStatus::HalfDay),
                (3, AttendanceStatus::DayOff),
                // outside the requested range
                (20, AttendanceStatus::FullDay),
            ],
        )
        .await;
        let app = init_app!(store);

        let uri = format!("/api/payslip?workerId={worker_id}&startDate=2026-01-01&endDate=2026-01-03");
        let (status, payslip) = call_json!(app, test::TestRequest::get().uri(&uri));

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payslip["workerName"], "Aminah");
        assert_eq!(payslip["hourlyRate"], 10.0);
        assert_eq!(payslip["startDate"], "2026-01-01");
        assert_eq!(payslip["endDate"], "2026-01-03");
        assert_eq!(payslip["totalDays"], 1.5);
        assert_eq!(payslip["totalHours"], 12.0);
        assert_eq!(payslip["totalAmount"], 120.0);
        assert_eq!(payslip["totalWorkDays"], 2);
        assert_eq!(payslip["dayOffCount"], 1);
        assert_eq!(payslip["attendances"].as_array().map(Vec::len), Some(3));
    }

    #[actix_web::test]
    async fn payslip_with_no_attendance_is_zero_not_an_error() {
        let store = web::Data::new(MemoryStore::new());
        let worker_id = seed(&store, 15.0, &[]).await;
        let app = init_app!(store);

        let uri = format!("/api/payslip?workerId={worker_id}&startDate=2026-02-01&endDate=2026-02-28");
        let (status, payslip) = call_json!(app, test::TestRequest::get().uri(&uri));

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payslip["totalDays"], 0.0);
        assert_eq!(payslip["totalHours"], 0.0);
        assert_eq!(payslip["totalAmount"], 0.0);
        assert_eq!(payslip["attendances"], json!([]));
    }

    #[actix_web::test]
    async fn overflowing_amount_is_rejected_and_not_saved() {
        // stored directly, the HTTP layer caps the rate
        let store = web::Data::new(MemoryStore::new());
        let worker_id = seed(
            &store,
            1e308,
            &[(1, AttendanceStatus::FullDay), (2, AttendanceStatus::FullDay)],
        )
        .await;
        let app = init_app!(store);

        let uri = format!("/api/payslip?workerId={worker_id}&startDate=2026-01-01&endDate=2026-01-31");
        let (status, body) = call_json!(app, test::TestRequest::get().uri(&uri));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("overflows"));

        let (status, _) = call_json!(
            app,
            test::TestRequest::post().uri("/api/payslip").set_json(json!({
                "workerId": worker_id,
                "startDate": "2026-01-01",
                "endDate": "2026-01-31"
            }))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(store.payslip_count(), 0);
    }

    #[actix_web::test]
    async fn payslip_for_unknown_worker_is_404() {
        let store = web::Data::new(MemoryStore::new());
        let app = init_app!(store);

        let (status, body) = call_json!(
            app,
            test::TestRequest::get()
                .uri("/api/payslip?workerId=9&startDate=2026-01-01&endDate=2026-01-31")
        );

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Worker not found");
    }

    #[actix_web::test]
    async fn payslip_requires_every_parameter() {
        let store = web::Data::new(MemoryStore::new());
        let app = init_app!(store);

        let (status, body) = call_json!(
            app,
            test::TestRequest::get().uri("/api/payslip?workerId=1&startDate=2026-01-01")
        );

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required parameters");
    }

    #[actix_web::test]
    async fn inverted_range_is_rejected() {
        let store = web::Data::new(MemoryStore::new());
        let worker_id = seed(&store, 10.0, &[]).await;
        let app = init_app!(store);

        let uri = format!("/api/payslip?workerId={worker_id}&startDate=2026-01-31&endDate=2026-01-01");
        let (status, _) = call_json!(app, test::TestRequest::get().uri(&uri));

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn saved_summary_matches_generated_view() {
        let store = web::Data::new(MemoryStore::new());
        let worker_id = seed(
            &store,
            12.5,
            &[
                (5, AttendanceStatus::FullDay),
                (6, AttendanceStatus::FullDay),
                (7, AttendanceStatus::HalfDay),
            ],
        )
        .await;
        let app = init_app!(store);

        let uri = format!("/api/payslip?workerId={worker_id}&startDate=2026-01-01&endDate=2026-01-31");
        let (_, view) = call_json!(app, test::TestRequest::get().uri(&uri));

        let (status, summary) = call_json!(
            app,
            test::TestRequest::post().uri("/api/payslip").set_json(json!({
                "workerId": worker_id.to_string(),
                "startDate": "2026-01-01",
                "endDate": "2026-01-31"
            }))
        );

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(summary["workerId"], worker_id);
        assert_eq!(summary["totalHours"], view["totalHours"]);
        assert_eq!(summary["totalAmount"], view["totalAmount"]);
        assert_eq!(summary["totalAmount"], 250.0);
        assert_eq!(store.payslip_count(), 1);
    }

    #[actix_web::test]
    async fn saving_for_unknown_worker_stores_nothing() {
        let store = web::Data::new(MemoryStore::new());
        let app = init_app!(store);

        let (status, _) = call_json!(
            app,
            test::TestRequest::post().uri("/api/payslip").set_json(json!({
                "workerId": 3,
                "startDate": "2026-01-01",
                "endDate": "2026-01-31"
            }))
        );

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(store.payslip_count(), 0);
    }

    #[actix_web::test]
    async fn saving_without_end_date_is_rejected() {
        let store = web::Data::new(MemoryStore::new());
        let app = init_app!(store);

        let (status, body) = call_json!(
            app,
            test::TestRequest::post()
                .uri("/api/payslip")
                .set_json(json!({ "workerId": 1, "startDate": "2026-01-01" }))
        );

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields");
    }

    #[actix_web::test]
    async fn text_payslip_is_plain_text() {
        let store = web::Data::new(MemoryStore::new());
        let worker_id = seed(&store, 10.0, &[(1, AttendanceStatus::FullDay)]).await;
        let app = init_app!(store);

        let uri =
            format!("/api/payslip/text?workerId={worker_id}&startDate=2026-01-01&endDate=2026-01-31");
        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some("text/plain; charset=utf-8")
        );
        let body = test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.contains("Total Amount: RM80.00"));
        assert!(text.contains("Work Entries: 1"));
    }
}
