//! The contract every state of a machine satisfies.
//!
//! A state is a named behavior unit: a fixed identifier, a transition
//! guard, and three lifecycle hooks. All hooks are synchronous and run to
//! completion before control returns to the caller of the machine
//! operation that triggered them. Work that would otherwise be
//! asynchronous must be modeled as its own state that polls a completion
//! flag in [`State::on_update`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

use super::error::Result;

/// Marker for types usable as state identifiers.
///
/// An identifier is a discrete label from a finite, consumer-defined set:
/// comparable by equality, usable as a lookup key, and serializable so
/// transition events can be exported. Blanket-implemented for every type
/// meeting the bounds; a small derived enum is the usual choice (the
/// [`state_id!`](crate::state_id) macro declares one).
pub trait StateId: Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + 'static {}

impl<T> StateId for T where T: Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + 'static {}

/// A named behavior unit bound to one identifier.
///
/// `C` is the caller-owned context shared by all states of one machine;
/// `I` is the identifier type. Every hook has a no-op default and the
/// guard defaults to permissive, so concrete states override only what
/// they need.
///
/// A state does not store machine-level information such as "the previous
/// state" itself; that is passed as an argument to the relevant hook.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{Result, State};
/// use tickstate::state_id;
///
/// state_id! {
///     enum DoorId { Closed, Open }
/// }
///
/// struct Door {
///     ajar_for: f64,
/// }
///
/// struct Open;
///
/// impl State<Door, DoorId> for Open {
///     fn id(&self) -> DoorId {
///         DoorId::Open
///     }
///
///     fn on_update(&mut self, door: &mut Door, dt: f64) -> Result<Option<DoorId>> {
///         door.ajar_for += dt;
///         if door.ajar_for >= 30.0 {
///             Ok(Some(DoorId::Closed))
///         } else {
///             Ok(None)
///         }
///     }
/// }
/// ```
pub trait State<C, I: StateId> {
    /// The state's identifier, fixed for its lifetime.
    fn id(&self) -> I;

    /// Guard consulted before any transition out of this state commits,
    /// including auto-transitions requested by this state's own
    /// [`on_update`](State::on_update). Returning `false` denies the
    /// transition. Must be pure.
    fn can_transition_to(&self, _target: &I, _ctx: &C) -> bool {
        true
    }

    /// Invoked exactly once when this state becomes current. `previous`
    /// is `None` on the very first activation of the machine.
    fn on_enter(&mut self, _ctx: &mut C, _previous: Option<&I>) -> Result<()> {
        Ok(())
    }

    /// Invoked once per tick while this state is current. Returning
    /// `Some(id)` requests a transition to that state; `None` remains.
    fn on_update(&mut self, _ctx: &mut C, _dt: f64) -> Result<Option<I>> {
        Ok(None)
    }

    /// Invoked exactly once when this state stops being current. `next`
    /// is `None` when the machine is stopping entirely.
    fn on_exit(&mut self, _ctx: &mut C, _next: Option<&I>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
    enum TestId {
        A,
        B,
    }

    struct Bare;

    impl State<u32, TestId> for Bare {
        fn id(&self) -> TestId {
            TestId::A
        }
    }

    #[test]
    fn guard_defaults_to_permissive() {
        let state = Bare;
        assert!(state.can_transition_to(&TestId::B, &0));
    }

    #[test]
    fn default_hooks_are_noops() {
        let mut state = Bare;
        let mut ctx = 7u32;

        state.on_enter(&mut ctx, None).unwrap();
        let next = state.on_update(&mut ctx, 0.5).unwrap();
        state.on_exit(&mut ctx, Some(&TestId::B)).unwrap();

        assert_eq!(next, None);
        assert_eq!(ctx, 7);
    }

    #[test]
    fn string_ids_satisfy_the_marker() {
        fn assert_state_id<T: StateId>() {}
        assert_state_id::<String>();
        assert_state_id::<TestId>();
    }
}
