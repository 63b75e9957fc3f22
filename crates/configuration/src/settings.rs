use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// Chunks are preallocated, so the size is capped well below `usize::MAX`.
pub const MAX_CHUNK_SIZE: usize = 100_000;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseSettings,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

/// Connection parameters for the OSPOS MySQL/MariaDB database.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// The schema holding the `ospos_*` tables.
    pub name: String,
    /// Upper bound for a single query, in seconds. Unset means queries may run indefinitely.
    pub statement_timeout_secs: Option<u64>,
}

/// Where and how the data bundle is written.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    /// The generated script file. Its parent directory is created on demand.
    pub output_path: PathBuf,
    /// Maximum number of rows pulled from the driver per chunk.
    pub chunk_size: usize,
    /// The JavaScript constant the bundle is assigned to.
    pub bundle_identifier: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Checks the invariants the export pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.host must not be empty".to_string(),
            ));
        }
        if self.database.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.name must not be empty".to_string(),
            ));
        }
        if self.export.chunk_size == 0 || self.export.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "export.chunk_size must be between 1 and {MAX_CHUNK_SIZE}"
            )));
        }
        if !is_js_identifier(&self.export.bundle_identifier) {
            return Err(ConfigError::ValidationError(format!(
                "export.bundle_identifier '{}' is not a valid JavaScript identifier",
                self.export.bundle_identifier
            )));
        }
        Ok(())
    }
}

/// Words that cannot be bound with `const` in a script: ECMAScript reserved
/// words plus the non-writable globals.
const JS_RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield", "arguments",
    "eval", "undefined", "NaN", "Infinity",
];

fn is_js_identifier(name: &str) -> bool {
    if JS_RESERVED_WORDS.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
