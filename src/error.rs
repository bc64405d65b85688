use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;

use crate::store::StoreError;

/// Failure kinds surfaced by the timesheet lifecycle
#[derive(Debug, thiserror::Error)]
pub enum TimesheetError {
    /// Referenced user or timesheet does not exist
    #[error("{0}")]
    NotFound(String),

    /// Business rule violation
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TimesheetError {
    pub fn user_not_found(user_id: u64) -> Self {
        Self::NotFound(format!("User with id:{} doesn't exist", user_id))
    }

    pub fn timesheet_not_found(id: u64) -> Self {
        Self::NotFound(format!("Time sheet with id:{} doesn't exist", id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl ResponseError for TimesheetError {
    fn status_code(&self) -> StatusCode {
        match self {
            TimesheetError::NotFound(_) => StatusCode::NOT_FOUND,
            TimesheetError::Validation(_) => StatusCode::BAD_REQUEST,
            TimesheetError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            TimesheetError::Store(e) => {
                tracing::error!(error = %e, "Timesheet store failure");
                HttpResponse::InternalServerError().json(json!({
                    "message": "Internal Server Error"
                }))
            }
            _ => HttpResponse::build(self.status_code()).json(json!({
                "message": self.to_string()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_kinds_to_status_codes() {
        assert_eq!(
            TimesheetError::timesheet_not_found(4).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TimesheetError::validation("period overlap").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TimesheetError::Store(StoreError::TransactionClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_details_stay_out_of_the_message() {
        let err = TimesheetError::Store(StoreError::InvalidStatus("BOGUS".into()));
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
