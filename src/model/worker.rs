use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "fullName": "Aminah Binti Yusof",
        "hourlyRate": 12.5,
        "createdAt": "2026-01-01T08:00:00Z"
    })
)]
pub struct Worker {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Aminah Binti Yusof")]
    pub full_name: String,

    #[schema(example = 12.5)]
    pub hourly_rate: f64,

    #[schema(value_type = String, format = "date-time", example = "2026-01-01T08:00:00Z")]
    pub created_at: DateTime<Utc>,
}

/// Validated name and rate, used for both create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerInput {
    pub full_name: String,
    pub hourly_rate: f64,
}
