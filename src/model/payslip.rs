use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::worker::Worker;

/// Aggregates derived from a set of attendance statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PayTotals {
    pub total_days: f64,
    pub total_hours: f64,
    pub total_amount: f64,
    /// Records that are not a day off, half days count as one
    pub total_work_days: u32,
    pub day_off_count: u32,
}

/// Reduces attendance statuses to pay totals.
///
/// Days and hours are summed independently from each status's contribution,
/// the amount is `total_hours * hourly_rate` with no rounding.
pub fn aggregate<I>(statuses: I, hourly_rate: f64) -> PayTotals
where
    I: IntoIterator<Item = AttendanceStatus>,
{
    let mut totals = statuses
        .into_iter()
        .fold(PayTotals::default(), |mut acc, status| {
            acc.total_days += status.day_contribution();
            acc.total_hours += status.hour_contribution();
            if status.is_day_off() {
                acc.day_off_count += 1;
            } else {
                acc.total_work_days += 1;
            }
            acc
        });

    totals.total_amount = totals.total_hours * hourly_rate;
    totals
}

/// Worker and inclusive date range a payslip is computed for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayPeriod {
    pub worker_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "workerId": 1,
    "workerName": "Aminah Binti Yusof",
    "hourlyRate": 10.0,
    "startDate": "2026-01-01",
    "endDate": "2026-01-31",
    "totalDays": 1.5,
    "totalWorkDays": 2,
    "dayOffCount": 1,
    "totalHours": 12.0,
    "totalAmount": 120.0,
    "attendances": []
}))]
pub struct Payslip {
    pub worker_id: u64,
    pub worker_name: String,
    pub hourly_rate: f64,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub total_days: f64,
    pub total_work_days: u32,
    pub day_off_count: u32,
    pub total_hours: f64,
    pub total_amount: f64,
    pub attendances: Vec<Attendance>,
}

impl Payslip {
    pub fn new(worker: &Worker, period: PayPeriod, attendances: Vec<Attendance>) -> Self {
        let totals = aggregate(attendances.iter().map(|a| a.status), worker.hourly_rate);

        Self {
            worker_id: worker.id,
            worker_name: worker.full_name.clone(),
            hourly_rate: worker.hourly_rate,
            start_date: period.start_date,
            end_date: period.end_date,
            total_days: totals.total_days,
            total_work_days: totals.total_work_days,
            day_off_count: totals.day_off_count,
            total_hours: totals.total_hours,
            total_amount: totals.total_amount,
            attendances,
        }
    }

    /// Plain-text payslip, amounts prefixed with `currency`.
    pub fn render_text(&self, currency: &str) -> String {
        format!(
            "PAYSLIP\n\
             {name}\n\
             Period: {start} - {end}\n\
             \n\
             Hourly Rate: {currency}{rate:.2}/hour\n\
             Total Days Worked: {days:.1} days\n\
             Total Hours: {hours:.1} hours (1 day = {per_day} hours)\n\
             Total Amount: {currency}{amount:.2}\n\
             \n\
             Work Entries: {work}\n\
             Days Off: {off}\n\
             \n\
             Note: Full Day = 1 day (8 hours), Half Day = 0.5 days (4 hours)",
            name = self.worker_name,
            start = self.start_date.format("%Y-%m-%d"),
            end = self.end_date.format("%Y-%m-%d"),
            rate = self.hourly_rate,
            days = self.total_days,
            hours = self.total_hours,
            per_day = AttendanceStatus::HOURS_PER_DAY,
            amount = self.total_amount,
            work = self.total_work_days,
            off = self.day_off_count,
        )
    }
}

/// Stored summary of a generated payslip. Never read back.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayslipSummary {
    pub id: u64,
    pub worker_id: u64,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub total_hours: f64,
    pub total_amount: f64,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewPayslipSummary {
    pub period: PayPeriod,
    pub total_hours: f64,
    pub total_amount: f64,
}

impl NewPayslipSummary {
    pub fn from_payslip(payslip: &Payslip) -> Self {
        Self {
            period: PayPeriod {
                worker_id: payslip.worker_id,
                start_date: payslip.start_date,
                end_date: payslip.end_date,
            },
            total_hours: payslip.total_hours,
            total_amount: payslip.total_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttendanceStatus::{DayOff, FullDay, HalfDay};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn worker(rate: f64) -> Worker {
        Worker {
            id: 1,
            full_name: "Aminah Binti Yusof".to_string(),
            hourly_rate: rate,
            created_at: DateTime::<Utc>::default(),
        }
    }

    #[test]
    fn mixed_week_matches_contribution_table() {
        let totals = aggregate([FullDay, HalfDay, DayOff], 10.0);

        assert_eq!(totals.total_days, 1.5);
        assert_eq!(totals.total_hours, 12.0);
        assert_eq!(totals.total_amount, 120.0);
        assert_eq!(totals.total_work_days, 2);
        assert_eq!(totals.day_off_count, 1);
    }

    #[test]
    fn no_attendance_is_all_zero() {
        assert_eq!(aggregate([], 25.0), PayTotals::default());
    }

    #[test]
    fn order_does_not_change_totals() {
        let forward = aggregate([FullDay, FullDay, HalfDay, DayOff, HalfDay], 7.25);
        let backward = aggregate([HalfDay, DayOff, HalfDay, FullDay, FullDay], 7.25);

        assert_eq!(forward, backward);
    }

    #[test]
    fn hours_and_days_follow_status_counts() {
        let statuses = [FullDay, HalfDay, HalfDay, DayOff, FullDay, FullDay, DayOff];
        let full = statuses.iter().filter(|s| **s == FullDay).count() as f64;
        let half = statuses.iter().filter(|s| **s == HalfDay).count() as f64;

        let totals = aggregate(statuses, 13.0);

        assert_eq!(totals.total_hours, 8.0 * full + 4.0 * half);
        assert_eq!(totals.total_days, full + 0.5 * half);
        assert_eq!(totals.total_amount, totals.total_hours * 13.0);
        assert_eq!(
            (totals.total_work_days + totals.day_off_count) as usize,
            statuses.len()
        );
    }

    #[test]
    fn payslip_keeps_the_attendance_it_was_built_from() {
        let attendances = vec![
            Attendance { id: 1, worker_id: 1, date: date(1), status: FullDay },
            Attendance { id: 2, worker_id: 1, date: date(2), status: HalfDay },
            Attendance { id: 3, worker_id: 1, date: date(3), status: DayOff },
        ];
        let period = PayPeriod { worker_id: 1, start_date: date(1), end_date: date(31) };

        let payslip = Payslip::new(&worker(10.0), period, attendances.clone());

        assert_eq!(payslip.worker_name, "Aminah Binti Yusof");
        assert_eq!(payslip.total_amount, 120.0);
        assert_eq!(payslip.attendances, attendances);

        let summary = NewPayslipSummary::from_payslip(&payslip);
        assert_eq!(summary.period, period);
        assert_eq!(summary.total_hours, 12.0);
    }

    #[test]
    fn text_render_formats_amounts() {
        let attendances = vec![
            Attendance { id: 1, worker_id: 1, date: date(1), status: FullDay },
            Attendance { id: 2, worker_id: 1, date: date(2), status: HalfDay },
        ];
        let period = PayPeriod { worker_id: 1, start_date: date(1), end_date: date(15) };
        let text = Payslip::new(&worker(10.0), period, attendances).render_text("RM");

        assert!(text.starts_with("PAYSLIP\nAminah Binti Yusof\n"));
        assert!(text.contains("Period: 2026-01-01 - 2026-01-15"));
        assert!(text.contains("Hourly Rate: RM10.00/hour"));
        assert!(text.contains("Total Days Worked: 1.5 days"));
        assert!(text.contains("Total Hours: 12.0 hours (1 day = 8 hours)"));
        assert!(text.contains("Total Amount: RM120.00"));
        assert!(text.contains("Work Entries: 2"));
        assert!(text.contains("Days Off: 0"));
    }

    #[test]
    fn text_render_layout_is_stable() {
        let attendances = vec![Attendance { id: 1, worker_id: 1, date: date(3), status: DayOff }];
        let period = PayPeriod { worker_id: 1, start_date: date(1), end_date: date(3) };
        let text = Payslip::new(&worker(12.5), period, attendances).render_text("$");

        let expected = "PAYSLIP\n\
                        Aminah Binti Yusof\n\
                        Period: 2026-01-01 - 2026-01-03\n\
                        \n\
                        Hourly Rate: $12.50/hour\n\
                        Total Days Worked: 0.0 days\n\
                        Total Hours: 0.0 hours (1 day = 8 hours)\n\
                        Total Amount: $0.00\n\
                        \n\
                        Work Entries: 0\n\
                        Days Off: 1\n\
                        \n\
                        Note: Full Day = 1 day (8 hours), Half Day = 0.5 days (4 hours)";
        assert_eq!(text, expected);
    }
}
