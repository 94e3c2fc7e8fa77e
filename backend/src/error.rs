use thiserror::Error;

/// Errors raised by the mapping, freeze and generation engines and their
/// collaborators.
///
/// Only `InvalidInput`, `UpstreamReasoningFailure` and a `PersistenceFailure`
/// of the frozen template abort a whole call. The match errors are recorded
/// per tag and the render/persist errors per row.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{count} occurrences of {what}")]
    AmbiguousMatch { what: String, count: usize },

    #[error("{0}")]
    NoMatch(String),

    #[error("reasoning step returned invalid output: {0}")]
    UpstreamReasoningFailure(String),

    #[error("render failed: {0}")]
    RenderFailure(String),

    #[error("persistence failed: {0}")]
    PersistenceFailure(String),

    #[error("document container error: {0}")]
    Container(String),

    #[error("template '{0}' is already frozen")]
    AlreadyFrozen(String),

    #[error("template '{0}' not found")]
    TemplateNotFound(String),
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        EngineError::PersistenceFailure(err.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::PersistenceFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
