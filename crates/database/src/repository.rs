use crate::catalog::sql_for;
use crate::connection;
use crate::error::DbError;
use crate::fetcher::ChunkedFetcher;
use configuration::DatabaseSettings;
use core_types::{MarketBasketRow, ReportKind, ReportRows, SalesDataRow, SeasonalityRow};
use sqlx::FromRow;
use sqlx::mysql::{MySqlConnection, MySqlRow};

/// Anything the export pipeline can pull report rows from.
///
/// Reports are fetched one at a time; `close` consumes the source and is
/// called exactly once, whatever the outcome of the run.
#[allow(async_fn_in_trait)]
pub trait ReportSource {
    /// Fetches the complete, ordered result set of one report.
    async fn fetch_report(&mut self, report: ReportKind) -> Result<ReportRows, DbError>;

    /// Releases the underlying connection.
    async fn close(self);
}

/// The `DbRepository` owns the run's single MySQL connection and runs the
/// catalog queries against it.
#[derive(Debug)]
pub struct DbRepository {
    conn: MySqlConnection,
    fetcher: ChunkedFetcher,
}

impl DbRepository {
    /// Creates a new `DbRepository` around an already open connection.
    pub fn new(conn: MySqlConnection, fetcher: ChunkedFetcher) -> Self {
        Self { conn, fetcher }
    }

    /// Opens the connection described by `settings` and wraps it.
    pub async fn connect(
        settings: &DatabaseSettings,
        fetcher: ChunkedFetcher,
    ) -> Result<Self, DbError> {
        let conn = connection::connect(settings).await?;
        Ok(Self::new(conn, fetcher))
    }

    async fn fetch_rows<T>(&mut self, report: ReportKind) -> Result<Vec<T>, DbError>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin + 'static,
    {
        let fetcher = self.fetcher;
        let rows = sqlx::query_as::<_, T>(sql_for(report)).fetch(&mut self.conn);
        fetcher.collect(report, rows).await
    }
}

impl ReportSource for DbRepository {
    #[tracing::instrument(name = "fetch_report", skip_all, fields(report = %report))]
    async fn fetch_report(&mut self, report: ReportKind) -> Result<ReportRows, DbError> {
        let rows = match report {
            ReportKind::SalesData => {
                ReportRows::SalesData(self.fetch_rows::<SalesDataRow>(report).await?)
            }
            ReportKind::SeasonalityVelocity => {
                ReportRows::SeasonalityVelocity(self.fetch_rows::<SeasonalityRow>(report).await?)
            }
            ReportKind::MarketBasketAnalysis => {
                ReportRows::MarketBasketAnalysis(self.fetch_rows::<MarketBasketRow>(report).await?)
            }
        };
        tracing::info!("Fetched {} rows for {}", rows.len(), report);
        Ok(rows)
    }

    async fn close(self) {
        connection::close(self.conn).await;
    }
}
