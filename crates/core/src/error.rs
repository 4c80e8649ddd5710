/// Crate-wide result type for registry and catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors for hook registration. Build-time plugin failures
/// are logged and skipped by the catalog rather than surfaced here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A free-text hook pattern failed to compile.
    #[error("invalid hook pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
