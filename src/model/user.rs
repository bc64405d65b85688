/// Owner of timesheets. The row lives in the `users` table; only the leave
/// balance is written from here.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub username: String,
    /// Remaining days off
    pub days_off: i64,
}
