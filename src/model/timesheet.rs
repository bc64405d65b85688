use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::utils::leave_validation::business_days;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TimesheetStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "user_id": 1000,
    "from_date": "2026-03-02",
    "to_date": "2026-03-06",
    "note": "Family trip",
    "status": "PENDING",
    "created_by": "jdoe",
    "created_at": "2026-02-20T09:30:00Z",
    "modified_by": null,
    "modified_at": null
}))]
pub struct Timesheet {
    pub id: u64,
    pub user_id: u64,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-03-06", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    pub note: String,
    pub status: TimesheetStatus,
    pub created_by: String,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    pub modified_by: Option<String>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Timesheet {
    /// Business days covered by the stored period
    pub fn business_days(&self) -> i64 {
        business_days(self.from_date, self.to_date)
    }
}

/// A timesheet that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewTimesheet {
    pub user_id: u64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub note: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl NewTimesheet {
    pub fn into_timesheet(self, id: u64) -> Timesheet {
        Timesheet {
            id,
            user_id: self.user_id,
            from_date: self.from_date,
            to_date: self.to_date,
            note: self.note,
            status: TimesheetStatus::Pending,
            created_by: self.created_by,
            created_at: self.created_at,
            modified_by: None,
            modified_at: None,
        }
    }
}
