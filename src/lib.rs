//! Tickstate: an embeddable, tick-driven state machine runtime.
//!
//! A [`StateMachine`] manages a single current state over an arbitrary
//! caller-owned context, drives per-tick updates, executes guarded
//! transitions, and records a bounded history of state changes that
//! listeners can subscribe to. [`HierarchicalState`] composes machines
//! into trees by nesting a child machine inside one state of its parent.
//!
//! The runtime is fully synchronous and single-threaded: every hook and
//! listener runs to completion before control returns to the caller of
//! `update`/`transition_to`/`start`/`stop`. The context is never cloned
//! or snapshotted. It is lent by reference into every hook, so the
//! embedding application keeps ownership and upholds single-threaded
//! access.
//!
//! # Core Concepts
//!
//! - **Context**: caller-owned mutable data shared by all states of one
//!   machine
//! - **State**: a named behavior unit with a guard and three lifecycle
//!   hooks, via the [`State`] trait
//! - **Transition events**: bounded FIFO history plus synchronous,
//!   registration-ordered subscriptions, via the [`EventLog`]
//!
//! # Example
//!
//! ```rust
//! use tickstate::core::{Result, State};
//! use tickstate::{state_id, StateMachineBuilder};
//!
//! state_id! {
//!     enum MoverId {
//!         Idle,
//!         Walking,
//!         Running,
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Mover {
//!     speed: f64,
//! }
//!
//! struct Idle;
//!
//! impl State<Mover, MoverId> for Idle {
//!     fn id(&self) -> MoverId {
//!         MoverId::Idle
//!     }
//! }
//!
//! struct Walking;
//!
//! impl State<Mover, MoverId> for Walking {
//!     fn id(&self) -> MoverId {
//!         MoverId::Walking
//!     }
//!
//!     fn on_enter(&mut self, mover: &mut Mover, _previous: Option<&MoverId>) -> Result<()> {
//!         mover.speed = 1.0;
//!         Ok(())
//!     }
//!
//!     fn on_update(&mut self, mover: &mut Mover, dt: f64) -> Result<Option<MoverId>> {
//!         mover.speed += dt;
//!         if mover.speed >= 5.0 {
//!             Ok(Some(MoverId::Running))
//!         } else {
//!             Ok(None)
//!         }
//!     }
//! }
//!
//! struct Running;
//!
//! impl State<Mover, MoverId> for Running {
//!     fn id(&self) -> MoverId {
//!         MoverId::Running
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let mut machine = StateMachineBuilder::new()
//!         .state(Idle)
//!         .state(Walking)
//!         .state(Running)
//!         .initial(MoverId::Idle)
//!         .build()
//!         .expect("valid configuration");
//!
//!     let mut mover = Mover::default();
//!     machine.start(&mut mover)?;
//!     machine.transition_to(&mut mover, MoverId::Walking)?;
//!     machine.update(&mut mover, 4.0)?;
//!
//!     assert_eq!(machine.current_state_id()?, &MoverId::Running);
//!     assert_eq!(mover.speed, 5.0);
//!     assert_eq!(machine.history().len(), 2);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod core;

// Re-export the public surface at the crate root.
pub use builder::{BuildError, StateMachineBuilder};
pub use core::{
    Error, EventLog, HierarchicalState, MachineConfig, Nested, Result, State, StateId,
    StateMachine, SubscriptionId, TransitionEvent, DEFAULT_HISTORY_CAPACITY,
};
