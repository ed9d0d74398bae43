//! Error taxonomy for the content-filtering engine

/// Errors surfaced by the filter-list loader and checksum verifier.
///
/// Per-rule parse failures are never represented here: they are silently
/// dropped and counted in [`crate::loader::LoadStats`]. Only file-level and
/// header-level failures reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The filter list does not begin with a `[Adblock Plus` header.
    #[error("filter list is missing the required [Adblock Plus header")]
    InvalidHeader,

    /// The embedded `! Checksum:` does not match the computed digest.
    #[error("checksum mismatch: expected {expected}, computed {computed}")]
    ChecksumMismatch { expected: String, computed: String },

    /// A file could not be opened, read, or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
