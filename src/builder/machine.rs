//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{MachineConfig, State, StateId, StateMachine, DEFAULT_HISTORY_CAPACITY};

/// Fluent builder over [`MachineConfig`].
///
/// # Example
///
/// ```rust
/// use tickstate::builder::StateMachineBuilder;
/// use tickstate::core::State;
/// use tickstate::state_id;
///
/// state_id! {
///     enum LightId { Red, Green }
/// }
///
/// struct Red;
///
/// impl State<(), LightId> for Red {
///     fn id(&self) -> LightId {
///         LightId::Red
///     }
/// }
///
/// struct Green;
///
/// impl State<(), LightId> for Green {
///     fn id(&self) -> LightId {
///         LightId::Green
///     }
/// }
///
/// let machine = StateMachineBuilder::new()
///     .state(Red)
///     .state(Green)
///     .initial(LightId::Red)
///     .history_capacity(16)
///     .build()
///     .unwrap();
///
/// assert!(!machine.is_started());
/// ```
pub struct StateMachineBuilder<C, I: StateId> {
    states: Vec<Box<dyn State<C, I>>>,
    initial: Option<I>,
    history_capacity: usize,
}

impl<C, I: StateId> StateMachineBuilder<C, I> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            initial: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Register a state, boxing it in place.
    pub fn state<S>(mut self, state: S) -> Self
    where
        S: State<C, I> + 'static,
    {
        self.states.push(Box::new(state));
        self
    }

    /// Register an already-boxed state.
    pub fn boxed_state(mut self, state: Box<dyn State<C, I>>) -> Self {
        self.states.push(state);
        self
    }

    /// Set the initial state identifier (required).
    pub fn initial(mut self, id: I) -> Self {
        self.initial = Some(id);
        self
    }

    /// Override the transition-history bound (default 100).
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Build the machine.
    ///
    /// Returns an error if the initial state was never set, no states
    /// were registered, or core validation fails (duplicate identifier,
    /// initial identifier naming no registered state).
    pub fn build(self) -> Result<StateMachine<C, I>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let config =
            MachineConfig::new(self.states, initial).with_history_capacity(self.history_capacity);
        Ok(StateMachine::new(config)?)
    }
}

impl<C, I: StateId> Default for StateMachineBuilder<C, I> {
    fn default() -> Self {
        Self::new()
    }
}
