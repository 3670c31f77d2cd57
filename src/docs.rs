use crate::api::attendance::RecordAttendance;
use crate::api::health::HealthResponse;
use crate::api::payslip::SavePayslip;
use crate::api::worker::WorkerPayload;
use crate::model::attendance::{Attendance, AttendanceEntry, AttendanceStatus};
use crate::model::payslip::{Payslip, PayslipSummary};
use crate::model::worker::Worker;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Worker Payslip API",
        version = "1.0.0",
        description = r#"
## Worker Attendance & Payslips

Keeps a directory of hourly-paid workers, one attendance mark per worker per
day, and derives payslips from that attendance.

### Key Features
- **Workers**
  - Create, update, list, view and delete workers with their hourly rate
- **Attendance**
  - Mark a day as `FULL_DAY`, `HALF_DAY` or `DAY_OFF`; marking again overwrites
- **Payslips**
  - Compute days, hours and pay for a date range, print it, or save a summary

### Pay Rules
| status    | days | hours |
|-----------|------|-------|
| FULL_DAY  | 1    | 8     |
| HALF_DAY  | 0.5  | 4     |
| DAY_OFF   | 0    | 0     |

Amount = total hours x hourly rate.

### Errors
Errors are JSON: `{"error": "..."}`. 400 for missing or invalid input,
404 for an unknown worker, 500 for anything else.
"#,
    ),
    paths(
        crate::api::health::health_check,

        crate::api::worker::list_workers,
        crate::api::worker::get_worker,
        crate::api::worker::create_worker,
        crate::api::worker::update_worker,
        crate::api::worker::delete_worker,

        crate::api::attendance::list_attendance,
        crate::api::attendance::record_attendance,

        crate::api::payslip::generate_payslip,
        crate::api::payslip::payslip_text,
        crate::api::payslip::save_payslip
    ),
    components(
        schemas(
            HealthResponse,
            Worker,
            WorkerPayload,
            AttendanceStatus,
            Attendance,
            AttendanceEntry,
            RecordAttendance,
            Payslip,
            PayslipSummary,
            SavePayslip
        )
    ),
    tags(
        (name = "Worker", description = "Worker directory APIs"),
        (name = "Attendance", description = "Attendance ledger APIs"),
        (name = "Payslip", description = "Payslip generation APIs"),
        (name = "Health", description = "Liveness"),
    )
)]
pub struct ApiDoc;
