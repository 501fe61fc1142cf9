//! Hierarchical states: a state that owns and drives a nested machine.
//!
//! Composition, not inheritance: [`HierarchicalState`] is an ordinary
//! [`State`] implementation that contains an owned child
//! [`StateMachine`], constructed when the state is entered and destroyed
//! when it is exited. The child's lifetime is strictly bounded by one
//! activation interval of its parent state, and the child borrows the
//! same context the parent hook received.

use super::error::Result;
use super::machine::{MachineConfig, StateMachine};
use super::state::{State, StateId};

/// Describes the nested machine a [`HierarchicalState`] drives.
///
/// `child_config` is the abstract factory consulted each time the parent
/// state is entered; the other methods have defaults so simple nests
/// supply only the factory.
pub trait Nested<C, I: StateId> {
    /// Identifier type of the child machine's states.
    type ChildId: StateId;

    /// Derive the child machine's configuration from the parent context.
    ///
    /// Called on every activation of the parent state; each activation
    /// gets a fresh child machine.
    fn child_config(&self, ctx: &C) -> MachineConfig<C, Self::ChildId>;

    /// Parent-level transition logic, evaluated after the child machine
    /// has ticked. Returning `Some(id)` requests a transition of the
    /// *parent* machine. Defaults to never requesting one.
    fn after_child_update(
        &mut self,
        _ctx: &mut C,
        _dt: f64,
        _child: &mut StateMachine<C, Self::ChildId>,
    ) -> Result<Option<I>> {
        Ok(None)
    }

    /// Guard for leaving the parent state. Defaults to permissive.
    fn can_transition_to(&self, _target: &I, _ctx: &C) -> bool {
        true
    }
}

/// A state that composes a child [`StateMachine`].
///
/// Entering it constructs and starts the child (so the child's initial
/// state is entered within the same call); each tick forwards `dt` to
/// the child before consulting [`Nested::after_child_update`]; exiting
/// it stops and drops the child.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{
///     HierarchicalState, MachineConfig, Nested, Result, State, StateMachine,
/// };
/// use tickstate::state_id;
///
/// state_id! {
///     enum TowerId { Idle, Attacking }
/// }
///
/// state_id! {
///     enum AttackId { Aiming, Firing }
/// }
///
/// #[derive(Default)]
/// struct Tower {
///     shots: u32,
/// }
///
/// struct Aiming;
///
/// impl State<Tower, AttackId> for Aiming {
///     fn id(&self) -> AttackId {
///         AttackId::Aiming
///     }
///
///     fn on_update(&mut self, _tower: &mut Tower, _dt: f64) -> Result<Option<AttackId>> {
///         Ok(Some(AttackId::Firing))
///     }
/// }
///
/// struct Firing;
///
/// impl State<Tower, AttackId> for Firing {
///     fn id(&self) -> AttackId {
///         AttackId::Firing
///     }
///
///     fn on_update(&mut self, tower: &mut Tower, _dt: f64) -> Result<Option<AttackId>> {
///         tower.shots += 1;
///         Ok(None)
///     }
/// }
///
/// struct AttackNest;
///
/// impl Nested<Tower, TowerId> for AttackNest {
///     type ChildId = AttackId;
///
///     fn child_config(&self, _tower: &Tower) -> MachineConfig<Tower, AttackId> {
///         MachineConfig::new(vec![Box::new(Aiming), Box::new(Firing)], AttackId::Aiming)
///     }
/// }
///
/// # fn main() -> tickstate::core::Result<()> {
/// let attacking = HierarchicalState::new(TowerId::Attacking, AttackNest);
/// let config = MachineConfig::new(
///     vec![Box::new(attacking) as Box<dyn State<Tower, TowerId>>],
///     TowerId::Attacking,
/// );
///
/// let mut tower = Tower::default();
/// let mut machine = StateMachine::new(config)?;
/// machine.start(&mut tower)?;
/// machine.update(&mut tower, 0.1)?;
/// machine.update(&mut tower, 0.1)?;
/// assert_eq!(tower.shots, 1);
/// # Ok(())
/// # }
/// ```
pub struct HierarchicalState<C, I: StateId, N: Nested<C, I>> {
    id: I,
    nested: N,
    child: Option<StateMachine<C, N::ChildId>>,
}

impl<C, I: StateId, N: Nested<C, I>> HierarchicalState<C, I, N> {
    /// Bind a nest description to a parent-state identifier.
    pub fn new(id: I, nested: N) -> Self {
        Self {
            id,
            nested,
            child: None,
        }
    }

    /// The child machine, present only while this state is active.
    pub fn child(&self) -> Option<&StateMachine<C, N::ChildId>> {
        self.child.as_ref()
    }

    /// The nest description.
    pub fn nested(&self) -> &N {
        &self.nested
    }
}

impl<C, I: StateId, N: Nested<C, I>> State<C, I> for HierarchicalState<C, I, N> {
    fn id(&self) -> I {
        self.id.clone()
    }

    fn can_transition_to(&self, target: &I, ctx: &C) -> bool {
        self.nested.can_transition_to(target, ctx)
    }

    fn on_enter(&mut self, ctx: &mut C, _previous: Option<&I>) -> Result<()> {
        let config = self.nested.child_config(ctx);
        let mut child = StateMachine::new(config)?;
        child.start(ctx)?;
        self.child = Some(child);
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut C, dt: f64) -> Result<Option<I>> {
        match self.child.as_mut() {
            Some(child) => {
                child.update(ctx, dt)?;
                self.nested.after_child_update(ctx, dt, child)
            }
            None => Ok(None),
        }
    }

    fn on_exit(&mut self, ctx: &mut C, _next: Option<&I>) -> Result<()> {
        match self.child.take() {
            Some(mut child) => child.stop(ctx),
            None => Ok(()),
        }
    }
}
