use sqlx::MySqlPool;
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../migrations/0001_init.sql");

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPool::connect(database_url).await
}

/// Creates the `workers`, `attendance` and `payslips` tables if missing.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    for statement in schema_statements(SCHEMA) {
        debug!(sql = %statement, "Applying schema statement");
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}

fn schema_statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';').map(str::trim).filter(|s| !s.is_empty())
}
