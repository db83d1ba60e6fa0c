use thiserror::Error;

/// Errors raised by the engine, the registries and the agents.
#[derive(Debug, Error)]
pub enum GameError {
    /// `step()` was called on an engine that has never been reset
    #[error("step() called before reset(); the engine has no episode yet")]
    NotReset,

    /// A name outside one of the closed vocabularies (game, agent, model, ...)
    #[error("unknown {kind} `{key}` (expected one of: {expected})")]
    Unknown {
        kind: &'static str,
        key: String,
        expected: &'static str,
    },

    /// A setting the selected mode cannot run without
    #[error("missing required setting {0}")]
    MissingSetting(&'static str),

    /// The human player asked to quit
    #[error("interrupted by user")]
    Interrupted,

    #[error("display error: {0}")]
    Display(#[from] std::io::Error),
}

impl GameError {
    pub fn unknown(kind: &'static str, key: &str, expected: &'static str) -> Self {
        Self::Unknown {
            kind,
            key: key.to_string(),
            expected,
        }
    }
}
