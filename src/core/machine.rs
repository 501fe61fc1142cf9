//! The state machine core.
//!
//! Owns the state table and the current-state pointer, drives guarded
//! transitions and per-tick updates, and feeds the event log. The context
//! is a caller-owned resource lent to every operation that runs hooks;
//! the machine never clones or snapshots it.
//!
//! Execution is fully synchronous and single-threaded. The only ordering
//! guarantee is causal: exit, then pointer update, then event emission
//! (listeners in registration order), then enter. Concurrent calls from
//! multiple threads are not supported and must be serialized by the
//! embedding application.

use chrono::Utc;
use std::collections::HashMap;

use super::error::{Error, Result};
use super::event::{EventLog, SubscriptionId, TransitionEvent};
use super::state::{State, StateId};

/// Default bound on the number of retained transition events.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Immutable bundle from which a [`StateMachine`] is constructed.
pub struct MachineConfig<C, I: StateId> {
    /// The full collection of states. Identifiers must be pairwise
    /// distinct.
    pub states: Vec<Box<dyn State<C, I>>>,
    /// Identifier of the state made current by `start()`. Must name one
    /// of `states`.
    pub initial: I,
    /// Bound on the transition-event history.
    pub history_capacity: usize,
}

impl<C, I: StateId> MachineConfig<C, I> {
    /// Bundle `states` with the designated initial identifier, using the
    /// default history capacity.
    pub fn new(states: Vec<Box<dyn State<C, I>>>, initial: I) -> Self {
        Self {
            states,
            initial,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Override the history bound.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}

/// A finite-state machine over a caller-owned context `C`.
///
/// The machine is either *unstarted* (no current state) or *started*
/// (exactly one current state); `start()` and `stop()` move between the
/// two and are both idempotent. A stopped machine is re-startable.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{MachineConfig, Result, State, StateMachine};
/// use tickstate::state_id;
///
/// state_id! {
///     enum MoverId { Idle, Walking }
/// }
///
/// #[derive(Default)]
/// struct Mover {
///     speed: f64,
/// }
///
/// struct Idle;
///
/// impl State<Mover, MoverId> for Idle {
///     fn id(&self) -> MoverId {
///         MoverId::Idle
///     }
/// }
///
/// struct Walking;
///
/// impl State<Mover, MoverId> for Walking {
///     fn id(&self) -> MoverId {
///         MoverId::Walking
///     }
///
///     fn on_enter(&mut self, mover: &mut Mover, _previous: Option<&MoverId>) -> Result<()> {
///         mover.speed = 1.0;
///         Ok(())
///     }
/// }
///
/// # fn main() -> tickstate::core::Result<()> {
/// let config = MachineConfig::new(
///     vec![Box::new(Idle) as Box<dyn State<Mover, MoverId>>, Box::new(Walking)],
///     MoverId::Idle,
/// );
/// let mut mover = Mover::default();
/// let mut machine = StateMachine::new(config)?;
///
/// machine.start(&mut mover)?;
/// machine.transition_to(&mut mover, MoverId::Walking)?;
///
/// assert_eq!(machine.current_state_id()?, &MoverId::Walking);
/// assert_eq!(mover.speed, 1.0);
/// assert_eq!(machine.history().len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct StateMachine<C, I: StateId> {
    states: HashMap<I, Box<dyn State<C, I>>>,
    initial: I,
    current: Option<I>,
    log: EventLog<I>,
}

impl<C, I: StateId> StateMachine<C, I> {
    /// Construct a machine from a configuration. Runs no hooks.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateState`] if two states share an identifier;
    /// [`Error::StateNotFound`] if the initial identifier names no
    /// supplied state.
    pub fn new(config: MachineConfig<C, I>) -> Result<Self> {
        let mut states = HashMap::with_capacity(config.states.len());
        for state in config.states {
            let id = state.id();
            if states.contains_key(&id) {
                return Err(Error::duplicate_state(&id));
            }
            states.insert(id, state);
        }

        if !states.contains_key(&config.initial) {
            return Err(Error::state_not_found(&config.initial));
        }

        Ok(Self {
            states,
            initial: config.initial,
            current: None,
            log: EventLog::new(config.history_capacity),
        })
    }

    /// Make the initial state current and run its `on_enter` with no
    /// previous state. A no-op if the machine is already started.
    pub fn start(&mut self, ctx: &mut C) -> Result<()> {
        if self.current.is_some() {
            return Ok(());
        }

        let initial = self.initial.clone();
        // Construction already validated the initial id.
        if !self.states.contains_key(&initial) {
            return Err(Error::state_not_found(&initial));
        }

        self.current = Some(initial.clone());
        tracing::debug!(state = ?initial, "state machine started");
        self.state_mut(&initial)?.on_enter(ctx, None)
    }

    /// Run the current state's `on_exit` with no next state, then clear
    /// the current state. A no-op if the machine is not started.
    pub fn stop(&mut self, ctx: &mut C) -> Result<()> {
        let Some(current) = self.current.clone() else {
            return Ok(());
        };

        self.state_mut(&current)?.on_exit(ctx, None)?;
        self.current = None;
        tracing::debug!(state = ?current, "state machine stopped");
        Ok(())
    }

    /// Execute a guarded transition to `target`.
    ///
    /// On success the causal order is strict: the current state's
    /// `on_exit` runs, the pointer advances, one event is appended to the
    /// log and listeners are notified, and the new state's `on_enter`
    /// runs. A hook error propagates to the caller without rolling back
    /// whatever already happened; in particular, the pointer stays
    /// advanced when `on_enter` fails.
    ///
    /// A transition targeting the current state runs the full exit/enter
    /// sequence and emits an event like any other.
    ///
    /// # Errors
    ///
    /// [`Error::MachineNotStarted`] if the machine is not started;
    /// [`Error::StateNotFound`] if `target` is unknown;
    /// [`Error::TransitionDenied`] if the current state's guard refuses,
    /// in which case no hook runs and no event is emitted.
    pub fn transition_to(&mut self, ctx: &mut C, target: I) -> Result<()> {
        let from = self.current.clone().ok_or(Error::MachineNotStarted)?;

        if !self.states.contains_key(&target) {
            return Err(Error::state_not_found(&target));
        }

        if !self.state(&from)?.can_transition_to(&target, ctx) {
            return Err(Error::transition_denied(&from, &target));
        }

        self.state_mut(&from)?.on_exit(ctx, Some(&target))?;
        self.current = Some(target.clone());
        tracing::debug!(from = ?from, to = ?target, "transition committed");
        self.log.emit(TransitionEvent {
            from: from.clone(),
            to: target.clone(),
            timestamp: Utc::now(),
        });
        self.state_mut(&target)?.on_enter(ctx, Some(&from))
    }

    /// Drive one tick: run the current state's `on_update` with the
    /// elapsed delta, and execute any transition it requests.
    ///
    /// A requested transition goes through [`transition_to`] with
    /// identical guard semantics: a denied auto-transition surfaces as
    /// [`Error::TransitionDenied`] out of this call, not silently
    /// ignored.
    ///
    /// [`transition_to`]: StateMachine::transition_to
    pub fn update(&mut self, ctx: &mut C, dt: f64) -> Result<()> {
        let current = self.current.clone().ok_or(Error::MachineNotStarted)?;
        let next = self.state_mut(&current)?.on_update(ctx, dt)?;
        if let Some(next) = next {
            self.transition_to(ctx, next)?;
        }
        Ok(())
    }

    /// Identifier of the current state.
    ///
    /// # Errors
    ///
    /// [`Error::MachineNotStarted`] if the machine is not started.
    pub fn current_state_id(&self) -> Result<&I> {
        self.current.as_ref().ok_or(Error::MachineNotStarted)
    }

    /// The configured initial identifier.
    pub fn initial_state_id(&self) -> &I {
        &self.initial
    }

    /// Whether the machine has a current state.
    pub fn is_started(&self) -> bool {
        self.current.is_some()
    }

    /// Independent snapshot of the transition history, oldest first.
    pub fn history(&self) -> Vec<TransitionEvent<I>> {
        self.log.history()
    }

    /// Register a listener invoked synchronously, in registration order,
    /// for every future transition event. History is not replayed.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&TransitionEvent<I>) + 'static,
    {
        self.log.subscribe(listener)
    }

    /// Remove the listener registered under `id`. Idempotent; returns
    /// whether a listener was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.log.unsubscribe(id)
    }

    fn state(&self, id: &I) -> Result<&dyn State<C, I>> {
        self.states
            .get(id)
            .map(|s| s.as_ref())
            .ok_or_else(|| Error::state_not_found(id))
    }

    fn state_mut(&mut self, id: &I) -> Result<&mut (dyn State<C, I> + 'static)> {
        self.states
            .get_mut(id)
            .map(|s| s.as_mut())
            .ok_or_else(|| Error::state_not_found(id))
    }
}
