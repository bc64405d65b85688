//! Timesheet lifecycle: submission, edits by the owner, the manager's
//! decision, deletion, and the read-only overlap/balance checks the UI uses
//! before submitting.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, instrument};

use crate::error::TimesheetError;
use crate::model::timesheet::{NewTimesheet, Timesheet, TimesheetStatus};
use crate::model::user::User;
use crate::store::{Backend, TimesheetStore, UnitOfWork, UserDirectory};
use crate::utils::clock::Clock;
use crate::utils::leave_validation::{business_days, overlaps};

const OVERLAP_MESSAGE: &str = "Time sheet period should not overlap with previous time sheets";
const ONLY_PENDING_UPDATE: &str = "Only time sheets with status of \"PENDING\" can be updated";

/// What a user's other timesheets mean for a requested period
#[derive(Debug, Default, PartialEq, Eq)]
struct Liability {
    /// Some non-rejected timesheet shares a day with the period
    overlap: bool,
    /// Business days still awaiting a decision
    pending_days: i64,
}

impl Liability {
    fn scan(existing: &[Timesheet], exclude: Option<u64>, from: NaiveDate, to: NaiveDate) -> Self {
        let mut liability = Liability::default();

        for ts in existing {
            if Some(ts.id) == exclude || ts.status == TimesheetStatus::Rejected {
                continue;
            }
            if ts.status == TimesheetStatus::Pending {
                liability.pending_days += ts.business_days();
            }
            if overlaps(ts.from_date, ts.to_date, from, to) {
                liability.overlap = true;
            }
        }

        liability
    }
}

fn rejected(message: impl Into<String>) -> TimesheetError {
    let message = message.into();
    debug!(reason = %message, "Time sheet request rejected");
    TimesheetError::validation(message)
}

pub struct TimesheetService {
    backend: Arc<dyn Backend>,
    clock: Arc<dyn Clock>,
    strict_terminal_transitions: bool,
}

impl TimesheetService {
    pub fn new(backend: Arc<dyn Backend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            strict_terminal_transitions: false,
        }
    }

    /// When set, managers may only decide PENDING timesheets, and deleting an
    /// APPROVED timesheet gives its days back to the owner.
    pub fn with_strict_terminal_transitions(mut self, strict: bool) -> Self {
        self.strict_terminal_transitions = strict;
        self
    }

    fn check_period(&self, from: NaiveDate, to: NaiveDate) -> Result<(), TimesheetError> {
        if to < from {
            return Err(rejected("To date must be after the from Date"));
        }

        let year = self.clock.today().year();
        if from.year() != year || to.year() != year {
            return Err(rejected("From date and To date must be in the current year"));
        }

        Ok(())
    }

    fn check_liability(user: &User, requested: i64, liability: &Liability) -> Result<(), TimesheetError> {
        if liability.overlap {
            return Err(rejected(OVERLAP_MESSAGE));
        }

        let total = requested + liability.pending_days;
        if user.days_off < total {
            return Err(rejected(format!(
                "Insufficient balance: {} business days requested including pending time sheets, {} available",
                total, user.days_off
            )));
        }

        Ok(())
    }

    async fn require_user(uow: &mut dyn UnitOfWork, user_id: u64) -> Result<User, TimesheetError> {
        uow.find_user(user_id)
            .await?
            .ok_or_else(|| TimesheetError::user_not_found(user_id))
    }

    async fn require_timesheet(uow: &mut dyn UnitOfWork, id: u64) -> Result<Timesheet, TimesheetError> {
        uow.find_timesheet(id)
            .await?
            .ok_or_else(|| TimesheetError::timesheet_not_found(id))
    }

    /// Submits a new PENDING timesheet. The balance is only debited on approval.
    #[instrument(name = "timesheet_create", skip(self, note))]
    pub async fn create(
        &self,
        user_id: u64,
        from_date: NaiveDate,
        to_date: NaiveDate,
        note: String,
    ) -> Result<Timesheet, TimesheetError> {
        let mut uow = self.backend.begin().await?;

        let user = Self::require_user(uow.as_mut(), user_id).await?;
        self.check_period(from_date, to_date)?;

        let existing = uow.find_timesheets_by_user(user_id).await?;
        let liability = Liability::scan(&existing, None, from_date, to_date);
        Self::check_liability(&user, business_days(from_date, to_date), &liability)?;

        let created = uow
            .insert_timesheet(&NewTimesheet {
                user_id,
                from_date,
                to_date,
                note,
                created_by: user.username,
                created_at: self.clock.now(),
            })
            .await?;
        uow.commit().await?;

        info!(timesheet_id = created.id, "Time sheet submitted");
        Ok(created)
    }

    /// Owner edit of a PENDING timesheet's dates and note
    #[instrument(name = "timesheet_update_by_user", skip(self, note))]
    pub async fn update_by_user(
        &self,
        id: u64,
        from_date: NaiveDate,
        to_date: NaiveDate,
        note: String,
        modified_by: String,
    ) -> Result<Timesheet, TimesheetError> {
        let mut uow = self.backend.begin().await?;

        let mut timesheet = Self::require_timesheet(uow.as_mut(), id).await?;
        if timesheet.status != TimesheetStatus::Pending {
            return Err(rejected(ONLY_PENDING_UPDATE));
        }
        self.check_period(from_date, to_date)?;

        let user = Self::require_user(uow.as_mut(), timesheet.user_id).await?;
        let existing = uow.find_timesheets_by_user(timesheet.user_id).await?;
        let liability = Liability::scan(&existing, Some(id), from_date, to_date);
        Self::check_liability(&user, business_days(from_date, to_date), &liability)?;

        timesheet.from_date = from_date;
        timesheet.to_date = to_date;
        timesheet.note = note;
        timesheet.modified_by = Some(modified_by);
        timesheet.modified_at = Some(self.clock.now());

        uow.update_timesheet(&timesheet).await?;
        uow.commit().await?;

        info!(timesheet_id = id, "Time sheet updated by owner");
        Ok(timesheet)
    }

    /// Manager decision. APPROVED debits the stored span from the owner's
    /// balance in the same unit of work as the status change.
    #[instrument(name = "timesheet_update_by_manager", skip(self))]
    pub async fn update_by_manager(
        &self,
        id: u64,
        status: TimesheetStatus,
        modified_by: String,
    ) -> Result<Timesheet, TimesheetError> {
        let mut uow = self.backend.begin().await?;

        let timesheet = Self::require_timesheet(uow.as_mut(), id).await?;

        if self.strict_terminal_transitions {
            if timesheet.status != TimesheetStatus::Pending {
                return Err(rejected(
                    "Only time sheets with status of \"PENDING\" can be approved or rejected",
                ));
            }
            if status == TimesheetStatus::Pending {
                return Err(rejected("A time sheet can only be set to APPROVED or REJECTED"));
            }
        }

        if status == TimesheetStatus::Approved {
            let days = timesheet.business_days();
            Self::require_user(uow.as_mut(), timesheet.user_id).await?;
            uow.debit_days_off(timesheet.user_id, days).await?;
            debug!(user_id = timesheet.user_id, days, "Debited days off");
        }

        let modified_at = self.clock.now();
        uow.update_status_fields(id, status, &modified_by, modified_at)
            .await?;
        uow.commit().await?;

        info!(timesheet_id = id, %status, "Time sheet decided by manager");
        Ok(Timesheet {
            status,
            modified_by: Some(modified_by),
            modified_at: Some(modified_at),
            ..timesheet
        })
    }

    /// Removes a timesheet whatever its status and returns what was removed
    #[instrument(name = "timesheet_delete", skip(self))]
    pub async fn delete(&self, id: u64) -> Result<Timesheet, TimesheetError> {
        let mut uow = self.backend.begin().await?;

        let timesheet = Self::require_timesheet(uow.as_mut(), id).await?;

        if self.strict_terminal_transitions && timesheet.status == TimesheetStatus::Approved {
            let days = timesheet.business_days();
            uow.credit_days_off(timesheet.user_id, days).await?;
            debug!(user_id = timesheet.user_id, days, "Credited days off");
        }

        uow.delete_timesheet(id).await?;
        uow.commit().await?;

        info!(timesheet_id = id, "Time sheet deleted");
        Ok(timesheet)
    }

    pub async fn get(&self, id: u64) -> Result<Timesheet, TimesheetError> {
        let mut uow = self.backend.begin_read_only().await?;
        Self::require_timesheet(uow.as_mut(), id).await
    }

    pub async fn list_by_user(&self, user_id: u64) -> Result<Vec<Timesheet>, TimesheetError> {
        let mut uow = self.backend.begin_read_only().await?;
        Ok(uow.find_timesheets_by_user(user_id).await?)
    }

    pub async fn check_new_overlap(
        &self,
        user_id: u64,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<bool, TimesheetError> {
        let mut uow = self.backend.begin_read_only().await?;
        let existing = uow.find_timesheets_by_user(user_id).await?;
        Ok(Liability::scan(&existing, None, from_date, to_date).overlap)
    }

    pub async fn check_edited_overlap(
        &self,
        user_id: u64,
        timesheet_id: u64,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<bool, TimesheetError> {
        let mut uow = self.backend.begin_read_only().await?;
        Self::require_timesheet(uow.as_mut(), timesheet_id).await?;

        let existing = uow.find_timesheets_by_user(user_id).await?;
        Ok(Liability::scan(&existing, Some(timesheet_id), from_date, to_date).overlap)
    }

    pub async fn check_new_exceeds_balance(
        &self,
        user_id: u64,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<bool, TimesheetError> {
        self.exceeds_balance(user_id, None, from_date, to_date).await
    }

    /// The timesheet itself need not exist; its id is only left out of the sum
    pub async fn check_edited_exceeds_balance(
        &self,
        user_id: u64,
        timesheet_id: u64,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<bool, TimesheetError> {
        self.exceeds_balance(user_id, Some(timesheet_id), from_date, to_date)
            .await
    }

    async fn exceeds_balance(
        &self,
        user_id: u64,
        exclude: Option<u64>,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<bool, TimesheetError> {
        let mut uow = self.backend.begin_read_only().await?;
        let user = Self::require_user(uow.as_mut(), user_id).await?;

        let existing = uow.find_timesheets_by_user(user_id).await?;
        let pending = Liability::scan(&existing, exclude, from_date, to_date).pending_days;

        Ok(user.days_off < business_days(from_date, to_date) + pending)
    }
}
