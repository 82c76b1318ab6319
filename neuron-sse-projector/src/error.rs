use thiserror::Error;

/// Construction-time failures.
///
/// The projector's hot path (`project`/`project_error`) is infallible by
/// design — malformed input is dropped, not surfaced as a `Result` (see the
/// error taxonomy in the crate's top-level docs). This enum only covers
/// programmer errors caught when a [`crate::Projector`] is built.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProjectorError {
    /// A `stream_id` prefix was empty or contained characters outside
    /// `[A-Za-z0-9_-]`.
    #[error("invalid stream id prefix: {0:?}")]
    InvalidStreamIdPrefix(String),

    /// A [`crate::ProjectorConfig`] field was set to a value that can never
    /// produce well-formed output (e.g. a zero-sized chunk window).
    #[error("invalid projector config: {field} must be greater than zero")]
    InvalidConfig {
        /// Name of the offending config field.
        field: &'static str,
    },
}
