use crate::error::DbError;
use core_types::ReportKind;
use futures::stream::{Stream, StreamExt, TryChunksError, TryStreamExt};
use std::num::NonZeroUsize;
use std::pin::pin;

/// Default number of rows pulled from the driver per chunk.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = NonZeroUsize::new(1000).unwrap();

/// Drains a query's row stream in bounded chunks into one ordered vector.
///
/// The query is issued once; the driver only ever buffers up to `chunk_size`
/// decoded rows before they are appended to the result. The chunk size never
/// changes the concatenated output.
#[derive(Debug, Clone, Copy)]
pub struct ChunkedFetcher {
    chunk_size: NonZeroUsize,
}

impl Default for ChunkedFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ChunkedFetcher {
    pub fn new(chunk_size: NonZeroUsize) -> Self {
        Self { chunk_size }
    }

    pub fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }

    /// Collects every row of `rows`, tagging any driver error with `report`.
    ///
    /// An empty stream yields an empty vector. Rows already received before an
    /// error are discarded along with the report.
    pub async fn collect<T, S>(&self, report: ReportKind, rows: S) -> Result<Vec<T>, DbError>
    where
        S: Stream<Item = Result<T, sqlx::Error>>,
    {
        let mut chunks = pin!(rows.try_chunks(self.chunk_size.get()));
        let mut collected = Vec::new();
        let mut chunk_count = 0usize;

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|TryChunksError(_, source)| DbError::query(report, source))?;
            chunk_count += 1;
            tracing::debug!(
                report = %report,
                chunk = chunk_count,
                rows = chunk.len(),
                "Fetched chunk"
            );
            collected.extend(chunk);
        }

        Ok(collected)
    }
}
