use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::model::worker::Worker;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
    ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    FullDay,
    HalfDay,
    DayOff,
}

impl AttendanceStatus {
    pub const HOURS_PER_DAY: f64 = 8.0;

    /// Fraction of a working day this status is worth.
    pub fn day_contribution(self) -> f64 {
        match self {
            AttendanceStatus::FullDay => 1.0,
            AttendanceStatus::HalfDay => 0.5,
            AttendanceStatus::DayOff => 0.0,
        }
    }

    pub fn hour_contribution(self) -> f64 {
        match self {
            AttendanceStatus::FullDay => Self::HOURS_PER_DAY,
            AttendanceStatus::HalfDay => Self::HOURS_PER_DAY / 2.0,
            AttendanceStatus::DayOff => 0.0,
        }
    }

    pub fn is_day_off(self) -> bool {
        self == AttendanceStatus::DayOff
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub worker_id: u64,

    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,

    pub status: AttendanceStatus,
}

/// Attendance as stored in MySQL, status kept as text.
#[derive(Debug, sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: u64,
    pub worker_id: u64,
    pub date: NaiveDate,
    pub status: String,
}

impl TryFrom<AttendanceRow> for Attendance {
    type Error = AppError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<AttendanceStatus>().map_err(|_| {
            AppError::Internal(format!(
                "attendance {} has unknown status {:?}",
                row.id, row.status
            ))
        })?;

        Ok(Attendance {
            id: row.id,
            worker_id: row.worker_id,
            date: row.date,
            status,
        })
    }
}

/// An attendance record joined with the worker it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub id: u64,
    pub worker_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub worker: Worker,
}

impl AttendanceEntry {
    pub fn new(attendance: Attendance, worker: Worker) -> Self {
        Self {
            id: attendance.id,
            worker_id: attendance.worker_id,
            date: attendance.date,
            status: attendance.status,
            worker,
        }
    }
}

/// Optional filters for listing attendance, both date bounds inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceFilter {
    pub worker_id: Option<u64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn matches(&self, attendance: &Attendance) -> bool {
        self.worker_id.is_none_or(|id| attendance.worker_id == id)
            && self.start_date.is_none_or(|start| attendance.date >= start)
            && self.end_date.is_none_or(|end| attendance.date <= end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkAttendance {
    pub worker_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}
