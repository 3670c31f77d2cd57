use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::Store;
use crate::error::{AppError, AppResult};
use crate::model::attendance::{
    Attendance, AttendanceEntry, AttendanceFilter, MarkAttendance, UpsertOutcome,
};
use crate::model::payslip::{NewPayslipSummary, PayPeriod, PayslipSummary};
use crate::model::worker::{Worker, WorkerInput};

/// Process-local store, one mutex over all tables.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    workers: BTreeMap<u64, Worker>,
    attendance: BTreeMap<(u64, NaiveDate), Attendance>,
    payslips: Vec<PayslipSummary>,
    last_worker_id: u64,
    last_attendance_id: u64,
    last_payslip_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

impl Store for MemoryStore {
    async fn list_workers(&self) -> AppResult<Vec<Worker>> {
        Ok(self.tables()?.workers.values().cloned().collect())
    }

    async fn find_worker(&self, id: u64) -> AppResult<Option<Worker>> {
        Ok(self.tables()?.workers.get(&id).cloned())
    }

    async fn create_worker(&self, input: &WorkerInput) -> AppResult<Worker> {
        let mut tables = self.tables()?;
        tables.last_worker_id += 1;

        let worker = Worker {
            id: tables.last_worker_id,
            full_name: input.full_name.clone(),
            hourly_rate: input.hourly_rate,
            created_at: Utc::now(),
        };
        tables.workers.insert(worker.id, worker.clone());
        Ok(worker)
    }

    async fn update_worker(&self, id: u64, input: &WorkerInput) -> AppResult<Option<Worker>> {
        let mut tables = self.tables()?;
        Ok(tables.workers.get_mut(&id).map(|worker| {
            worker.full_name = input.full_name.clone();
            worker.hourly_rate = input.hourly_rate;
            worker.clone()
        }))
    }

    async fn delete_worker(&self, id: u64) -> AppResult<bool> {
        let mut tables = self.tables()?;
        if tables.workers.remove(&id).is_none() {
            return Ok(false);
        }

        tables.attendance.retain(|(worker_id, _), _| *worker_id != id);
        tables.payslips.retain(|p| p.worker_id != id);
        Ok(true)
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceEntry>> {
        let tables = self.tables()?;

        let mut entries: Vec<AttendanceEntry> = tables
            .attendance
            .values()
            .filter(|a| filter.matches(a))
            .filter_map(|a| {
                tables
                    .workers
                    .get(&a.worker_id)
                    .map(|w| AttendanceEntry::new(a.clone(), w.clone()))
            })
            .collect();

        entries.sort_by(|a, b| b.date.cmp(&a.date).then(a.worker_id.cmp(&b.worker_id)));
        Ok(entries)
    }

    async fn attendance_in_period(&self, period: &PayPeriod) -> AppResult<Vec<Attendance>> {
        let tables = self.tables()?;
        let from = (period.worker_id, period.start_date);
        let to = (period.worker_id, period.end_date);
        if from > to {
            return Ok(Vec::new());
        }

        // keys sort by (worker, date) so the range is already date ordered
        Ok(tables.attendance.range(from..=to).map(|(_, a)| a.clone()).collect())
    }

    async fn upsert_attendance(
        &self,
        mark: &MarkAttendance,
    ) -> AppResult<(Attendance, UpsertOutcome)> {
        let mut tables = self.tables()?;
        let key = (mark.worker_id, mark.date);

        if let Some(existing) = tables.attendance.get_mut(&key) {
            existing.status = mark.status;
            return Ok((existing.clone(), UpsertOutcome::Updated));
        }

        tables.last_attendance_id += 1;
        let attendance = Attendance {
            id: tables.last_attendance_id,
            worker_id: mark.worker_id,
            date: mark.date,
            status: mark.status,
        };
        tables.attendance.insert(key, attendance.clone());
        Ok((attendance, UpsertOutcome::Created))
    }

    async fn insert_payslip_summary(
        &self,
        summary: &NewPayslipSummary,
    ) -> AppResult<PayslipSummary> {
        let mut tables = self.tables()?;
        tables.last_payslip_id += 1;

        let stored = PayslipSummary {
            id: tables.last_payslip_id,
            worker_id: summary.period.worker_id,
            start_date: summary.period.start_date,
            end_date: summary.period.end_date,
            total_hours: summary.total_hours,
            total_amount: summary.total_amount,
            created_at: Utc::now(),
        };
        tables.payslips.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
impl MemoryStore {
    pub fn payslip_count(&self) -> usize {
        self.tables().map(|t| t.payslips.len()).unwrap_or(0)
    }

    pub fn attendance_count(&self) -> usize {
        self.tables().map(|t| t.attendance.len()).unwrap_or(0)
    }
}
