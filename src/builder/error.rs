//! Build errors for the state machine builder.

use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("initial state not specified; call .initial(id) before .build()")]
    MissingInitialState,

    #[error("no states registered; add at least one state")]
    NoStates,

    /// Construction-time validation failure from the machine core
    /// (duplicate identifier, unknown initial state).
    #[error(transparent)]
    Machine(#[from] crate::core::Error),
}
