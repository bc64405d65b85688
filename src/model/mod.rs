pub mod timesheet;
pub mod user;
