//! Property-based tests for the machine runtime.
//!
//! These tests use proptest to verify invariants hold across many
//! randomly generated transition sequences.

use chrono::Utc;
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use tickstate::{
    state_id, Error, EventLog, MachineConfig, State, StateMachine, TransitionEvent,
};

state_id! {
    enum Id {
        A,
        B,
        C,
    }
}

/// Permissive state with no behavior.
struct Plain(Id);

impl State<(), Id> for Plain {
    fn id(&self) -> Id {
        self.0
    }
}

/// State whose guard denies every transition.
struct Locked(Id);

impl State<(), Id> for Locked {
    fn id(&self) -> Id {
        self.0
    }

    fn can_transition_to(&self, _target: &Id, _ctx: &()) -> bool {
        false
    }
}

fn permissive_states() -> Vec<Box<dyn State<(), Id>>> {
    vec![
        Box::new(Plain(Id::A)),
        Box::new(Plain(Id::B)),
        Box::new(Plain(Id::C)),
    ]
}

prop_compose! {
    fn arbitrary_id()(variant in 0..3u8) -> Id {
        match variant {
            0 => Id::A,
            1 => Id::B,
            _ => Id::C,
        }
    }
}

proptest! {
    #[test]
    fn history_never_exceeds_capacity(
        targets in prop::collection::vec(arbitrary_id(), 0..40),
        capacity in 1..10usize,
    ) {
        let config = MachineConfig::new(permissive_states(), Id::A)
            .with_history_capacity(capacity);
        let mut machine = StateMachine::new(config).unwrap();
        let mut ctx = ();

        machine.start(&mut ctx).unwrap();
        for target in &targets {
            machine.transition_to(&mut ctx, *target).unwrap();
        }

        prop_assert_eq!(machine.history().len(), targets.len().min(capacity));
    }

    #[test]
    fn history_preserves_transition_order(
        targets in prop::collection::vec(arbitrary_id(), 1..20),
    ) {
        let config = MachineConfig::new(permissive_states(), Id::A);
        let mut machine = StateMachine::new(config).unwrap();
        let mut ctx = ();

        machine.start(&mut ctx).unwrap();
        for target in &targets {
            machine.transition_to(&mut ctx, *target).unwrap();
        }

        let history = machine.history();
        prop_assert_eq!(history.len(), targets.len());

        let mut previous = Id::A;
        for (event, target) in history.iter().zip(&targets) {
            prop_assert_eq!(&event.from, &previous);
            prop_assert_eq!(&event.to, target);
            previous = *target;
        }
        prop_assert_eq!(machine.current_state_id().unwrap(), targets.last().unwrap());
    }

    #[test]
    fn eviction_drops_oldest_first(
        targets in prop::collection::vec(arbitrary_id(), 5..30),
    ) {
        let capacity = 4;
        let config = MachineConfig::new(permissive_states(), Id::A)
            .with_history_capacity(capacity);
        let mut machine = StateMachine::new(config).unwrap();
        let mut ctx = ();

        machine.start(&mut ctx).unwrap();
        for target in &targets {
            machine.transition_to(&mut ctx, *target).unwrap();
        }

        let history = machine.history();
        prop_assert_eq!(history.len(), capacity);

        // The retained events are exactly the last `capacity` changes.
        let n = targets.len();
        prop_assert_eq!(&history[0].to, &targets[n - capacity]);
        prop_assert_eq!(&history[0].from, &targets[n - capacity - 1]);
        prop_assert_eq!(&history[capacity - 1].to, &targets[n - 1]);
    }

    #[test]
    fn denied_transitions_leave_no_trace(
        targets in prop::collection::vec(arbitrary_id(), 1..10),
    ) {
        let states: Vec<Box<dyn State<(), Id>>> = vec![
            Box::new(Locked(Id::A)),
            Box::new(Plain(Id::B)),
            Box::new(Plain(Id::C)),
        ];
        let mut machine = StateMachine::new(MachineConfig::new(states, Id::A)).unwrap();
        let mut ctx = ();

        machine.start(&mut ctx).unwrap();
        for target in &targets {
            let result = machine.transition_to(&mut ctx, *target);
            let denied = matches!(result, Err(Error::TransitionDenied { .. }));
            prop_assert!(denied);
        }

        prop_assert_eq!(machine.current_state_id().unwrap(), &Id::A);
        prop_assert!(machine.history().is_empty());
    }

    #[test]
    fn every_listener_sees_every_event(
        targets in prop::collection::vec(arbitrary_id(), 0..15),
        listeners in 1..4usize,
    ) {
        let config = MachineConfig::new(permissive_states(), Id::A);
        let mut machine = StateMachine::new(config).unwrap();
        let mut ctx = ();

        let counters: Vec<Rc<RefCell<usize>>> = (0..listeners)
            .map(|_| Rc::new(RefCell::new(0)))
            .collect();
        for counter in &counters {
            let sink = counter.clone();
            machine.subscribe(move |_| *sink.borrow_mut() += 1);
        }

        machine.start(&mut ctx).unwrap();
        for target in &targets {
            machine.transition_to(&mut ctx, *target).unwrap();
        }

        for counter in &counters {
            prop_assert_eq!(*counter.borrow(), targets.len());
        }
    }

    #[test]
    fn standalone_log_is_bounded(
        events in prop::collection::vec((arbitrary_id(), arbitrary_id()), 0..30),
        capacity in 0..8usize,
    ) {
        let mut log = EventLog::new(capacity);
        for (from, to) in &events {
            log.emit(TransitionEvent {
                from: *from,
                to: *to,
                timestamp: Utc::now(),
            });
        }

        prop_assert_eq!(log.len(), events.len().min(capacity));
        prop_assert_eq!(log.capacity(), capacity);
    }
}
