use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySql, MySqlConnection, MySqlPool, Transaction};
use tracing::debug;

use super::{Backend, StoreError, TimesheetStore, UnitOfWork, UserDirectory};
use crate::model::timesheet::{NewTimesheet, Timesheet, TimesheetStatus};
use crate::model::user::User;

const TIMESHEET_COLUMNS: &str = r#"
    id, user_id, from_date, to_date, note, status,
    created_by, created_at, modified_by, modified_at
"#;

const SELECT_USER: &str = r#"
    SELECT
        CAST(id AS UNSIGNED) AS id,
        username,
        CAST(days_off AS SIGNED) AS days_off
    FROM users
    WHERE id = ?"#;

#[derive(FromRow)]
struct TimesheetRow {
    id: u64,
    user_id: u64,
    from_date: NaiveDate,
    to_date: NaiveDate,
    note: String,
    status: String,
    created_by: String,
    created_at: DateTime<Utc>,
    modified_by: Option<String>,
    modified_at: Option<DateTime<Utc>>,
}

impl TryFrom<TimesheetRow> for Timesheet {
    type Error = StoreError;

    fn try_from(row: TimesheetRow) -> Result<Self, Self::Error> {
        let status = TimesheetStatus::from_str(&row.status)
            .map_err(|_| StoreError::InvalidStatus(row.status.clone()))?;

        Ok(Timesheet {
            id: row.id,
            user_id: row.user_id,
            from_date: row.from_date,
            to_date: row.to_date,
            note: row.note,
            status,
            created_by: row.created_by,
            created_at: row.created_at,
            modified_by: row.modified_by,
            modified_at: row.modified_at,
        })
    }
}

/// MySQL backend; one database transaction per unit of work
#[derive(Clone)]
pub struct MySqlBackend {
    pool: MySqlPool,
}

impl MySqlBackend {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Backend for MySqlBackend {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(MySqlUnitOfWork {
            tx: Some(tx),
            locking: true,
        }))
    }

    async fn begin_read_only(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(MySqlUnitOfWork {
            tx: Some(tx),
            locking: false,
        }))
    }
}

pub struct MySqlUnitOfWork {
    tx: Option<Transaction<'static, MySql>>,
    locking: bool,
}

/// Appends `FOR UPDATE` when the row should stay locked until commit
fn select_sql(select: &str, locking: bool) -> String {
    if locking {
        format!("{} FOR UPDATE", select)
    } else {
        select.to_string()
    }
}

impl MySqlUnitOfWork {
    fn conn(&mut self) -> Result<&mut MySqlConnection, StoreError> {
        self.tx.as_deref_mut().ok_or(StoreError::TransactionClosed)
    }
}

#[async_trait]
impl TimesheetStore for MySqlUnitOfWork {
    async fn find_timesheet(&mut self, id: u64) -> Result<Option<Timesheet>, StoreError> {
        let sql = select_sql(
            &format!("SELECT {} FROM timesheets WHERE id = ?", TIMESHEET_COLUMNS),
            self.locking,
        );

        let row = sqlx::query_as::<_, TimesheetRow>(&sql)
            .bind(id)
            .fetch_optional(self.conn()?)
            .await?;

        row.map(Timesheet::try_from).transpose()
    }

    async fn find_timesheets_by_user(
        &mut self,
        user_id: u64,
    ) -> Result<Vec<Timesheet>, StoreError> {
        let sql = format!(
            "SELECT {} FROM timesheets WHERE user_id = ? ORDER BY id",
            TIMESHEET_COLUMNS
        );

        let rows = sqlx::query_as::<_, TimesheetRow>(&sql)
            .bind(user_id)
            .fetch_all(self.conn()?)
            .await?;

        rows.into_iter().map(Timesheet::try_from).collect()
    }

    async fn insert_timesheet(&mut self, new: &NewTimesheet) -> Result<Timesheet, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO timesheets
                (user_id, from_date, to_date, note, status, created_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.user_id)
        .bind(new.from_date)
        .bind(new.to_date)
        .bind(&new.note)
        .bind(TimesheetStatus::Pending.as_ref())
        .bind(&new.created_by)
        .bind(new.created_at)
        .execute(self.conn()?)
        .await?;

        let id = result.last_insert_id();
        debug!(timesheet_id = id, user_id = new.user_id, "Inserted timesheet");

        Ok(new.clone().into_timesheet(id))
    }

    async fn update_timesheet(&mut self, timesheet: &Timesheet) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE timesheets
            SET from_date = ?, to_date = ?, note = ?, modified_by = ?, modified_at = ?
            WHERE id = ?
            "#,
        )
        .bind(timesheet.from_date)
        .bind(timesheet.to_date)
        .bind(&timesheet.note)
        .bind(&timesheet.modified_by)
        .bind(timesheet.modified_at)
        .bind(timesheet.id)
        .execute(self.conn()?)
        .await?;

        Ok(())
    }

    async fn delete_timesheet(&mut self, id: u64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM timesheets WHERE id = ?")
            .bind(id)
            .execute(self.conn()?)
            .await?;

        Ok(())
    }

    async fn update_status_fields(
        &mut self,
        id: u64,
        status: TimesheetStatus,
        modified_by: &str,
        modified_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE timesheets
            SET status = ?, modified_by = ?, modified_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status.as_ref())
        .bind(modified_by)
        .bind(modified_at)
        .bind(id)
        .execute(self.conn()?)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MySqlUnitOfWork {
    async fn find_user(&mut self, id: u64) -> Result<Option<User>, StoreError> {
        // Writing units lock the row so validations for the same user serialise
        let sql = select_sql(SELECT_USER, self.locking);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.conn()?)
            .await?;

        Ok(user)
    }

    async fn debit_days_off(&mut self, user_id: u64, amount: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET days_off = days_off - ? WHERE id = ?")
            .bind(amount)
            .bind(user_id)
            .execute(self.conn()?)
            .await?;

        Ok(())
    }

    async fn credit_days_off(&mut self, user_id: u64, amount: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET days_off = days_off + ? WHERE id = ?")
            .bind(amount)
            .bind(user_id)
            .execute(self.conn()?)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MySqlUnitOfWork {
    async fn commit(&mut self) -> Result<(), StoreError> {
        let tx = self.tx.take().ok_or(StoreError::TransactionClosed)?;
        tx.commit().await?;
        Ok(())
    }
}
