use influence_core::SnapshotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings: {0}")]
    Settings(#[source] serde_json::Error),
}
