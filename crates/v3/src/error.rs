use nubridge_codec::CodecError;
use thiserror::Error;

/// Errors emitted while encoding or decoding v3 files.
#[derive(Debug, Error)]
pub enum V3Error {
    /// A record ended early while decoding.
    #[error("short record while decoding {kind}")]
    Short {
        /// Record kind being decoded.
        kind: &'static str,
        #[source]
        source: CodecError,
    },
    /// A file on disk does not have the size its header implies.
    #[error("{file}: unexpected size {actual}, expected {expected}")]
    FormatMismatch {
        /// File the mismatch was found in.
        file: String,
        /// Size the header or layout implies.
        expected: usize,
        /// Size actually present.
        actual: usize,
    },
    /// File system failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
