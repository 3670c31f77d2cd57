pub mod attendance;
pub mod health;
pub mod payslip;
pub mod worker;
