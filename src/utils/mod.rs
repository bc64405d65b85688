pub mod clock;
pub mod leave_validation;
