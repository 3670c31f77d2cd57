use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;
use tracing::{debug, error};

use super::Store;
use crate::error::{AppError, AppResult};
use crate::model::attendance::{
    Attendance, AttendanceEntry, AttendanceFilter, AttendanceRow, MarkAttendance, UpsertOutcome,
};
use crate::model::payslip::{NewPayslipSummary, PayPeriod, PayslipSummary};
use crate::model::worker::{Worker, WorkerInput};
use crate::utils::db_utils::{bind_all, build_attendance_where};

const WORKER_COLUMNS: &str = "id, full_name, hourly_rate, created_at";
const ATTENDANCE_COLUMNS: &str = "id, worker_id, date, status";
const PAYSLIP_COLUMNS: &str =
    "id, worker_id, start_date, end_date, total_hours, total_amount, created_at";

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Attendance joined with its worker in one row.
#[derive(sqlx::FromRow)]
struct AttendanceWorkerRow {
    id: u64,
    worker_id: u64,
    date: NaiveDate,
    status: String,
    full_name: String,
    hourly_rate: f64,
    created_at: DateTime<Utc>,
}

impl TryFrom<AttendanceWorkerRow> for AttendanceEntry {
    type Error = AppError;

    fn try_from(row: AttendanceWorkerRow) -> Result<Self, Self::Error> {
        let worker = Worker {
            id: row.worker_id,
            full_name: row.full_name,
            hourly_rate: row.hourly_rate,
            created_at: row.created_at,
        };
        let attendance = Attendance::try_from(AttendanceRow {
            id: row.id,
            worker_id: row.worker_id,
            date: row.date,
            status: row.status,
        })?;

        Ok(AttendanceEntry::new(attendance, worker))
    }
}

impl Store for MySqlStore {
    async fn list_workers(&self) -> AppResult<Vec<Worker>> {
        let sql = format!("SELECT {WORKER_COLUMNS} FROM workers ORDER BY id");
        let workers = sqlx::query_as::<_, Worker>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(workers)
    }

    async fn find_worker(&self, id: u64) -> AppResult<Option<Worker>> {
        let sql = format!("SELECT {WORKER_COLUMNS} FROM workers WHERE id = ?");
        let worker = sqlx::query_as::<_, Worker>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(worker)
    }

    async fn create_worker(&self, input: &WorkerInput) -> AppResult<Worker> {
        let result = sqlx::query(
            r#"
            INSERT INTO workers (full_name, hourly_rate)
            VALUES (?, ?)
            "#,
        )
        .bind(&input.full_name)
        .bind(input.hourly_rate)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        debug!(worker_id = id, "Worker inserted");

        self.find_worker(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("worker {id} vanished after insert")))
    }

    async fn update_worker(&self, id: u64, input: &WorkerInput) -> AppResult<Option<Worker>> {
        // MySQL reports zero affected rows for an unchanged row, so existence
        // is decided by reading the row back
        sqlx::query(
            r#"
            UPDATE workers
            SET full_name = ?, hourly_rate = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.full_name)
        .bind(input.hourly_rate)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_worker(id).await
    }

    async fn delete_worker(&self, id: u64) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let attendance = sqlx::query("DELETE FROM attendance WHERE worker_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let payslips = sqlx::query("DELETE FROM payslips WHERE worker_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let workers = sqlx::query("DELETE FROM workers WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if workers.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        debug!(
            worker_id = id,
            attendance = attendance.rows_affected(),
            payslips = payslips.rows_affected(),
            "Worker deleted with dependent rows"
        );
        Ok(true)
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceEntry>> {
        let filter_sql = build_attendance_where(filter);
        let sql = format!(
            r#"
            SELECT a.id, a.worker_id, a.date, a.status,
                   w.full_name, w.hourly_rate, w.created_at
            FROM attendance a
            JOIN workers w ON w.id = a.worker_id
            {}
            ORDER BY a.date DESC, a.worker_id ASC
            "#,
            filter_sql.clause
        );
        debug!(sql = %sql, bindings = ?filter_sql.values, "Fetching attendance");

        let rows = bind_all(sqlx::query_as::<_, AttendanceWorkerRow>(&sql), filter_sql.values)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, sql = %sql, "Failed to fetch attendance");
                e
            })?;

        rows.into_iter().map(AttendanceEntry::try_from).collect()
    }

    async fn attendance_in_period(&self, period: &PayPeriod) -> AppResult<Vec<Attendance>> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance \
             WHERE worker_id = ? AND date >= ? AND date <= ? ORDER BY date"
        );

        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(period.worker_id)
            .bind(period.start_date)
            .bind(period.end_date)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Attendance::try_from).collect()
    }

    async fn upsert_attendance(
        &self,
        mark: &MarkAttendance,
    ) -> AppResult<(Attendance, UpsertOutcome)> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE worker_id = ? AND date = ? FOR UPDATE"
        );
        let existing = sqlx::query_as::<_, AttendanceRow>(&select)
            .bind(mark.worker_id)
            .bind(mark.date)
            .fetch_optional(&mut *tx)
            .await?;

        let (id, outcome) = match existing {
            Some(row) => {
                sqlx::query("UPDATE attendance SET status = ? WHERE id = ?")
                    .bind(mark.status.to_string())
                    .bind(row.id)
                    .execute(&mut *tx)
                    .await?;
                (row.id, UpsertOutcome::Updated)
            }
            None => {
                let result = sqlx::query(
                    "INSERT INTO attendance (worker_id, date, status) VALUES (?, ?, ?)",
                )
                .bind(mark.worker_id)
                .bind(mark.date)
                .bind(mark.status.to_string())
                .execute(&mut *tx)
                .await?;
                (result.last_insert_id(), UpsertOutcome::Created)
            }
        };

        tx.commit().await?;

        Ok((
            Attendance {
                id,
                worker_id: mark.worker_id,
                date: mark.date,
                status: mark.status,
            },
            outcome,
        ))
    }

    async fn insert_payslip_summary(
        &self,
        summary: &NewPayslipSummary,
    ) -> AppResult<PayslipSummary> {
        let result = sqlx::query(
            r#"
            INSERT INTO payslips
            (worker_id, start_date, end_date, total_hours, total_amount)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(summary.period.worker_id)
        .bind(summary.period.start_date)
        .bind(summary.period.end_date)
        .bind(summary.total_hours)
        .bind(summary.total_amount)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        let sql = format!("SELECT {PAYSLIP_COLUMNS} FROM payslips WHERE id = ?");

        let stored = sqlx::query_as::<_, PayslipSummary>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }
}
