use thiserror::Error;

/// Rejected model edits: bad presentation text, or no node keys left.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid color value: {0:?} (expected #rgb or #rrggbb)")]
    InvalidColor(String),
    #[error("Unknown node shape: {0:?}")]
    UnknownShape(String),
    #[error("Unknown edge style: {0:?}")]
    UnknownEdgeStyle(String),
    #[error("No node keys left to hand out")]
    KeysExhausted,
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Snapshot root must be a JSON object")]
    NotAnObject,
    #[error("Invalid view: scale {scale} must be finite and positive")]
    InvalidView { scale: f64 },
    #[error("Invalid view: offset must be finite")]
    InvalidOffset,
    #[error("Node {key} has a non-finite coordinate")]
    NonFiniteCoordinate { key: String },
    #[error("Edge {src} -> {dst} has a non-finite weight")]
    NonFiniteWeight { src: String, dst: String },
    #[error("Node key F{suffix} leaves the counter no room for new keys")]
    CounterExhausted { suffix: u64 },
}
