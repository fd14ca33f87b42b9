use std::path::Path;

use crate::errors::PersistError;

/// Write a rendered document to `destination`, replacing any existing file.
///
/// A destination that cannot be opened for writing (read-only, or held open by
/// another program on platforms that lock files) is reported as
/// `PersistError::PermissionDenied`.
pub async fn persist(document: &[u8], destination: &Path) -> Result<(), PersistError> {
    tokio::fs::write(destination, document)
        .await
        .map_err(|e| PersistError::from_io(destination.to_path_buf(), e))
}
