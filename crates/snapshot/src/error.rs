use thiserror::Error;

/// Errors emitted while decoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A mandatory sub-object is absent.
    #[error("snapshot is missing required section `{0}`")]
    MissingSection(&'static str),
    /// A mandatory field is absent or empty.
    #[error("snapshot field `{0}` is missing or invalid")]
    MissingField(&'static str),
    /// The JSON could not be deserialized at all.
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}
