pub mod timesheet;
