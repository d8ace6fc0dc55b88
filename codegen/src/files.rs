use std::path::Path;

use crate::error::GenerateError;

/// Read a UTF-8 input document.
pub fn read_input(path: &Path) -> Result<String, GenerateError> {
    std::fs::read_to_string(path).map_err(|source| GenerateError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write generated text in one shot. A failed write is reported, not retried.
pub fn write(path: &Path, text: &str) -> Result<(), GenerateError> {
    std::fs::write(path, text).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = text.len(), "wrote output");
    Ok(())
}
