//! Error taxonomy for the state machine runtime.
//!
//! Every failure the runtime can raise is a distinct variant of [`Error`],
//! so embedders can match on the kind instead of parsing messages. The
//! runtime performs no retries and no silent recovery: every error is
//! surfaced synchronously to the immediate caller.

use thiserror::Error;

/// Convenience alias used throughout the runtime and by state hooks.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by the state machine runtime.
///
/// State identifiers are rendered with their `Debug` form so the error
/// type stays non-generic and cheap to pass around.
#[derive(Debug, Error)]
pub enum Error {
    /// Two states supplied at construction share an identifier.
    #[error("duplicate state id: {0}")]
    DuplicateState(String),

    /// A referenced identifier has no registered state.
    #[error("state not found: {0}")]
    StateNotFound(String),

    /// An operation that requires a running machine was called before
    /// `start()` (or after `stop()`).
    #[error("state machine has not been started; call start() first")]
    MachineNotStarted,

    /// The current state's guard rejected a requested transition.
    #[error("transition from {from} to {to} denied by guard")]
    TransitionDenied {
        /// Identifier of the state that refused to be left.
        from: String,
        /// Identifier of the requested target state.
        to: String,
    },

    /// An error raised by a consumer-supplied lifecycle hook.
    ///
    /// The runtime never catches these: they propagate out of
    /// `start`/`stop`/`transition_to`/`update`, leaving the machine in
    /// whatever partial state the failed hook produced.
    #[error("{0}")]
    Hook(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn duplicate_state(id: &impl std::fmt::Debug) -> Self {
        Self::DuplicateState(format!("{id:?}"))
    }

    pub(crate) fn state_not_found(id: &impl std::fmt::Debug) -> Self {
        Self::StateNotFound(format!("{id:?}"))
    }

    pub(crate) fn transition_denied(from: &impl std::fmt::Debug, to: &impl std::fmt::Debug) -> Self {
        Self::TransitionDenied {
            from: format!("{from:?}"),
            to: format!("{to:?}"),
        }
    }

    /// Wrap a consumer error raised inside a lifecycle hook.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tickstate::core::Error;
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
    /// let err = Error::hook(io);
    /// assert!(matches!(err, Error::Hook(_)));
    /// ```
    pub fn hook<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Hook(Box::new(err))
    }
}
