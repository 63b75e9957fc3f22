//! # OSPOS Database Crate
//!
//! This crate is the only place that talks to the OSPOS MySQL/MariaDB
//! database. It owns the SQL of every report and hides the driver behind the
//! `ReportSource` trait.
//!
//! ## Architectural Principles
//!
//! - **One connection per run:** `DbRepository` wraps exactly one
//!   `MySqlConnection`; queries run strictly one after another on it.
//! - **Bounded fetching:** each query is issued once and its rows are pulled
//!   in chunks (`ChunkedFetcher`) instead of one unbounded transfer.
//! - **Typed rows:** results decode straight into the per-report records from
//!   `core-types`.
//!
//! ## Public API
//!
//! - `connect` / `close`: open and release the run's connection.
//! - `sql_for`: the query catalog.
//! - `DbRepository`: the MySQL-backed `ReportSource`.
//! - `DbError`: connection and query failures, the latter tagged with the report.

// Declare the modules that constitute this crate.
pub mod catalog;
pub mod connection;
pub mod error;
pub mod fetcher;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use catalog::sql_for;
pub use connection::{close, connect};
pub use error::DbError;
pub use fetcher::{ChunkedFetcher, DEFAULT_CHUNK_SIZE};
pub use repository::{DbRepository, ReportSource};
