use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use tracing::info;

pub async fn init_db(database_url: &str, max_connections: u32) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Creates the `timesheets` table when it is missing. The `users` table
/// belongs to the user directory and must already provide `id`, `username`
/// and `days_off`.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS timesheets (
            id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
            user_id BIGINT UNSIGNED NOT NULL,
            from_date DATE NOT NULL,
            to_date DATE NOT NULL,
            note TEXT NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'PENDING',
            created_by VARCHAR(255) NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            modified_by VARCHAR(255) NULL,
            modified_at TIMESTAMP NULL,
            INDEX idx_timesheets_user_id (user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Timesheet schema ready");
    Ok(())
}
