use thiserror::Error;

/// Errors raised while validating or simulating token supply scenarios.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid comparison: {0}")]
    InvalidComparison(String),

    #[error("scenario '{name}' failed: {source}")]
    ScenarioFailed {
        name: String,
        #[source]
        source: Box<EngineError>,
    },

    #[error("arithmetic overflow while performing supply calculation: {0}")]
    CalculationOverflow(&'static str),
}

impl EngineError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}

/// Result alias used throughout the engine.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
