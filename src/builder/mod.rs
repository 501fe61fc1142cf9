//! Construction ergonomics for state machines.
//!
//! [`StateMachineBuilder`] assembles a machine fluently without touching
//! [`MachineConfig`](crate::core::MachineConfig) directly, and the
//! [`state_id!`](crate::state_id) macro declares identifier enums with
//! the required derive set.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
