pub mod attendance;
pub mod payslip;
pub mod worker;
