use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{Backend, StoreError, TimesheetStore, UnitOfWork, UserDirectory};
use crate::model::timesheet::{NewTimesheet, Timesheet, TimesheetStatus};
use crate::model::user::User;

/// In-memory backend for tests. A writing unit of work holds the lock until it
/// is dropped, and its writes are only published on commit. A read-only one
/// works on a snapshot and publishes nothing.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
}

#[derive(Clone, Default)]
struct State {
    next_id: u64,
    timesheets: BTreeMap<u64, Timesheet>,
    users: HashMap<u64, User>,
}

impl InMemoryBackend {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let state = State {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            ..State::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub async fn user(&self, id: u64) -> Option<User> {
        self.state.lock().await.users.get(&id).cloned()
    }

    pub async fn timesheet(&self, id: u64) -> Option<Timesheet> {
        self.state.lock().await.timesheets.get(&id).cloned()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let guard = self.state.clone().lock_owned().await;
        let working = State::clone(&guard);
        Ok(Box::new(InMemoryUnitOfWork {
            guard: Some(guard),
            working,
        }))
    }

    async fn begin_read_only(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let working = State::clone(&*self.state.lock().await);
        Ok(Box::new(InMemoryUnitOfWork {
            guard: None,
            working,
        }))
    }
}

pub struct InMemoryUnitOfWork {
    guard: Option<OwnedMutexGuard<State>>,
    working: State,
}

#[async_trait]
impl TimesheetStore for InMemoryUnitOfWork {
    async fn find_timesheet(&mut self, id: u64) -> Result<Option<Timesheet>, StoreError> {
        Ok(self.working.timesheets.get(&id).cloned())
    }

    async fn find_timesheets_by_user(
        &mut self,
        user_id: u64,
    ) -> Result<Vec<Timesheet>, StoreError> {
        Ok(self
            .working
            .timesheets
            .values()
            .filter(|ts| ts.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_timesheet(&mut self, new: &NewTimesheet) -> Result<Timesheet, StoreError> {
        self.working.next_id += 1;
        let timesheet = new.clone().into_timesheet(self.working.next_id);
        self.working
            .timesheets
            .insert(timesheet.id, timesheet.clone());
        Ok(timesheet)
    }

    async fn update_timesheet(&mut self, timesheet: &Timesheet) -> Result<(), StoreError> {
        if let Some(stored) = self.working.timesheets.get_mut(&timesheet.id) {
            stored.from_date = timesheet.from_date;
            stored.to_date = timesheet.to_date;
            stored.note = timesheet.note.clone();
            stored.modified_by = timesheet.modified_by.clone();
            stored.modified_at = timesheet.modified_at;
        }
        Ok(())
    }

    async fn delete_timesheet(&mut self, id: u64) -> Result<(), StoreError> {
        self.working.timesheets.remove(&id);
        Ok(())
    }

    async fn update_status_fields(
        &mut self,
        id: u64,
        status: TimesheetStatus,
        modified_by: &str,
        modified_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if let Some(stored) = self.working.timesheets.get_mut(&id) {
            stored.status = status;
            stored.modified_by = Some(modified_by.to_string());
            stored.modified_at = Some(modified_at);
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUnitOfWork {
    async fn find_user(&mut self, id: u64) -> Result<Option<User>, StoreError> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn debit_days_off(&mut self, user_id: u64, amount: i64) -> Result<(), StoreError> {
        if let Some(user) = self.working.users.get_mut(&user_id) {
            user.days_off -= amount;
        }
        Ok(())
    }

    async fn credit_days_off(&mut self, user_id: u64, amount: i64) -> Result<(), StoreError> {
        if let Some(user) = self.working.users.get_mut(&user_id) {
            user.days_off += amount;
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(&mut self) -> Result<(), StoreError> {
        let guard = self.guard.as_mut().ok_or(StoreError::TransactionClosed)?;
        **guard = self.working.clone();
        Ok(())
    }
}
