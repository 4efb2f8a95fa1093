use thiserror::Error;

/// Errors surfaced by the decision pipeline.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The evaluation request itself was malformed. Never coerced; the
    /// whole evaluation is rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
