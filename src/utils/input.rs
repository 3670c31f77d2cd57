//! Coercion of loosely typed request fields.
//!
//! Browser clients send ids and rates either as JSON numbers or as the
//! string content of a form field. An empty string is treated the same as
//! a missing field.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::model::attendance::AttendanceStatus;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrText {
    fn as_text(&self) -> String {
        match self {
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s.trim().to_string(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, NumberOrText::Text(s) if s.trim().is_empty())
    }
}

/// Returns the field if present and not blank.
pub fn present<'a>(field: &'a Option<NumberOrText>) -> Option<&'a NumberOrText> {
    field.as_ref().filter(|v| !v.is_blank())
}

pub fn present_str(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_id(name: &str, value: &NumberOrText) -> AppResult<u64> {
    let id = match value {
        NumberOrText::Number(n) => n.as_u64(),
        NumberOrText::Text(s) => s.trim().parse().ok(),
    };
    id.ok_or_else(|| AppError::validation(format!("{name} must be a positive integer id")))
}

/// Upper bound for an hourly rate, keeps every payslip amount finite.
pub const MAX_HOURLY_RATE: f64 = 1_000_000.0;

pub fn parse_rate(value: &NumberOrText) -> AppResult<f64> {
    let rate = match value {
        NumberOrText::Number(n) => n.as_f64(),
        NumberOrText::Text(s) => s.trim().parse::<f64>().ok(),
    };

    match rate {
        Some(r) if (0.0..=MAX_HOURLY_RATE).contains(&r) => Ok(r),
        _ => Err(AppError::validation(format!(
            "hourlyRate must be a number between 0 and {MAX_HOURLY_RATE}, got {}",
            value.as_text()
        ))),
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping the calendar date.
pub fn parse_date(name: &str, value: &str) -> AppResult<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::validation(format!("{name} must be an ISO date, got {value:?}")))
}

pub fn parse_status(value: &str) -> AppResult<AttendanceStatus> {
    value.trim().parse().map_err(|_| {
        AppError::validation(format!(
            "status must be one of FULL_DAY, HALF_DAY, DAY_OFF, got {value:?}"
        ))
    })
}
