//! Persistence seam shared by every handler.
//!
//! Handlers are generic over [`Store`]; `main` picks [`MySqlStore`] when a
//! database URL is configured and [`MemoryStore`] otherwise.

mod memory;
mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

use crate::error::AppResult;
use crate::model::attendance::{
    Attendance, AttendanceEntry, AttendanceFilter, MarkAttendance, UpsertOutcome,
};
use crate::model::payslip::{NewPayslipSummary, PayPeriod, PayslipSummary};
use crate::model::worker::{Worker, WorkerInput};

#[allow(async_fn_in_trait)]
pub trait Store: Send + Sync + 'static {
    /// All workers in id order.
    async fn list_workers(&self) -> AppResult<Vec<Worker>>;

    async fn find_worker(&self, id: u64) -> AppResult<Option<Worker>>;

    async fn create_worker(&self, input: &WorkerInput) -> AppResult<Worker>;

    /// Overwrites name and rate. `None` if the worker does not exist.
    async fn update_worker(&self, id: u64, input: &WorkerInput) -> AppResult<Option<Worker>>;

    /// Removes the worker together with its attendance and payslip
    /// summaries. Returns `false` if the worker does not exist.
    async fn delete_worker(&self, id: u64) -> AppResult<bool>;

    /// Matching records joined with their worker, newest date first.
    async fn list_attendance(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceEntry>>;

    /// One worker's records inside the period, oldest date first.
    async fn attendance_in_period(&self, period: &PayPeriod) -> AppResult<Vec<Attendance>>;

    /// Creates the record for `(worker_id, date)` or overwrites its status.
    async fn upsert_attendance(
        &self,
        mark: &MarkAttendance,
    ) -> AppResult<(Attendance, UpsertOutcome)>;

    async fn insert_payslip_summary(&self, summary: &NewPayslipSummary)
    -> AppResult<PayslipSummary>;
}
