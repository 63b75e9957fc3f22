use crate::bundle::DataBundle;
use crate::error::ExportError;
use std::path::Path;

/// Renders the bundle as a single script statement:
/// `const <identifier> = <json>;`
pub fn render_artifact(bundle: &DataBundle, identifier: &str) -> Result<String, ExportError> {
    let json = serde_json::to_string(bundle)?;
    Ok(format!("const {identifier} = {json};"))
}

/// Writes `contents` to `path`, replacing any existing file.
///
/// The parent directory is created first if it does not exist.
pub async fn write_artifact(path: &Path, contents: &str) -> Result<(), ExportError> {
    let write_error = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }
    tokio::fs::write(path, contents).await.map_err(write_error)?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote data bundle");
    Ok(())
}
