//! Persistence seams used by the timesheet lifecycle.
//!
//! Every lifecycle operation runs inside one [`UnitOfWork`] obtained from a
//! [`Backend`]. Reads, the balance debit and the timesheet write all go
//! through that unit so they commit together; dropping it without calling
//! [`UnitOfWork::commit`] discards every change.
//!
//! Read-only operations use [`Backend::begin_read_only`], which sees the same
//! committed state without holding locks on the rows it reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::timesheet::{NewTimesheet, Timesheet, TimesheetStatus};
use crate::model::user::User;

#[cfg(test)]
pub mod memory;
pub mod mysql;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid timesheet status `{0}`")]
    InvalidStatus(String),

    #[error("transaction already finished")]
    TransactionClosed,
}

#[async_trait]
pub trait TimesheetStore: Send {
    /// Like [`UserDirectory::find_user`], locks the row unless read-only
    async fn find_timesheet(&mut self, id: u64) -> Result<Option<Timesheet>, StoreError>;

    /// All timesheets of a user in insertion order
    async fn find_timesheets_by_user(&mut self, user_id: u64)
    -> Result<Vec<Timesheet>, StoreError>;

    async fn insert_timesheet(&mut self, new: &NewTimesheet) -> Result<Timesheet, StoreError>;

    /// Overwrites dates, note and the modification stamp
    async fn update_timesheet(&mut self, timesheet: &Timesheet) -> Result<(), StoreError>;

    async fn delete_timesheet(&mut self, id: u64) -> Result<(), StoreError>;

    async fn update_status_fields(
        &mut self,
        id: u64,
        status: TimesheetStatus,
        modified_by: &str,
        modified_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserDirectory: Send {
    /// Loads the user. A unit of work from [`Backend::begin`] holds the row
    /// until it finishes; a read-only one does not.
    async fn find_user(&mut self, id: u64) -> Result<Option<User>, StoreError>;

    async fn debit_days_off(&mut self, user_id: u64, amount: i64) -> Result<(), StoreError>;

    async fn credit_days_off(&mut self, user_id: u64, amount: i64) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UnitOfWork: TimesheetStore + UserDirectory {
    async fn commit(&mut self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;

    /// Unit of work for reads only; nothing it loads stays locked
    async fn begin_read_only(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;
}
