use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::Connection;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};

/// Builds driver connect options from the application's database settings.
pub fn connect_options(settings: &DatabaseSettings) -> Result<MySqlConnectOptions, DbError> {
    if settings.host.trim().is_empty() {
        return Err(DbError::ConnectionConfigError(
            "database host must be set.".to_string(),
        ));
    }
    if settings.name.trim().is_empty() {
        return Err(DbError::ConnectionConfigError(
            "database name must be set.".to_string(),
        ));
    }

    Ok(MySqlConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name))
}

/// Opens the single connection used for a whole export run.
///
/// When `statement_timeout_secs` is set, the session's statement time limit
/// is lowered accordingly. If that fails, the freshly opened connection is
/// closed before the error is returned.
pub async fn connect(settings: &DatabaseSettings) -> Result<MySqlConnection, DbError> {
    let options = connect_options(settings)?;

    tracing::info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.name,
        "Connecting to database"
    );
    let mut conn = MySqlConnection::connect_with(&options)
        .await
        .map_err(DbError::ConnectionError)?;

    if let Some(secs) = settings.statement_timeout_secs {
        if let Err(e) = apply_statement_timeout(&mut conn, secs).await {
            close(conn).await;
            return Err(DbError::ConnectionError(e));
        }
    }

    Ok(conn)
}

async fn apply_statement_timeout(conn: &mut MySqlConnection, secs: u64) -> Result<(), sqlx::Error> {
    let version: String = sqlx::query_scalar("SELECT VERSION()")
        .fetch_one(&mut *conn)
        .await?;
    let statement = statement_timeout_sql(&version, secs);
    tracing::debug!(server = %version, statement = %statement, "Applying statement timeout");
    sqlx::query(&statement).execute(&mut *conn).await?;
    Ok(())
}

/// MySQL limits statements through `max_execution_time` (milliseconds),
/// MariaDB through `max_statement_time` (seconds).
fn statement_timeout_sql(server_version: &str, secs: u64) -> String {
    if server_version.contains("MariaDB") {
        format!("SET SESSION max_statement_time = {secs}")
    } else {
        let millis = secs.saturating_mul(1000);
        format!("SET SESSION max_execution_time = {millis}")
    }
}

/// Closes a connection, logging rather than propagating any failure so it
/// never masks the outcome of the run.
pub async fn close(conn: MySqlConnection) {
    match conn.close().await {
        Ok(()) => tracing::info!("Connection closed."),
        Err(e) => tracing::warn!(error = %e, "Failed to close database connection cleanly."),
    }
}
