//! Bounded-history publish/subscribe log for transition events.
//!
//! Every committed state change produces one [`TransitionEvent`]. The
//! [`EventLog`] keeps a bounded FIFO history of them and notifies
//! registered listeners synchronously, in registration order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::state::StateId;

/// Immutable record of a committed state change.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use tickstate::core::TransitionEvent;
/// use tickstate::state_id;
///
/// state_id! {
///     enum Phase { Aim, Fire }
/// }
///
/// let event = TransitionEvent {
///     from: Phase::Aim,
///     to: Phase::Fire,
///     timestamp: Utc::now(),
/// };
///
/// let json = serde_json::to_string(&event).unwrap();
/// let back: TransitionEvent<Phase> = serde_json::from_str(&json).unwrap();
/// assert_eq!(event, back);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionEvent<I: StateId> {
    /// Identifier of the state being left.
    pub from: I,
    /// Identifier of the state being entered.
    pub to: I,
    /// When the transition was committed.
    pub timestamp: DateTime<Utc>,
}

/// Token identifying a registered listener, used to unsubscribe it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(u64);

type Listener<I> = Box<dyn FnMut(&TransitionEvent<I>)>;

/// Bounded FIFO store of [`TransitionEvent`]s plus a listener registry.
///
/// The machine owns one of these and feeds it on every committed
/// transition; it is also usable standalone by embedders that want the
/// same bounded-history semantics for their own events.
pub struct EventLog<I: StateId> {
    history: VecDeque<TransitionEvent<I>>,
    capacity: usize,
    listeners: Vec<(SubscriptionId, Listener<I>)>,
    next_subscription: u64,
}

impl<I: StateId> EventLog<I> {
    /// Create a log retaining at most `capacity` events.
    ///
    /// A capacity of zero retains no history; listeners still fire.
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity.min(64)),
            capacity,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Append an event, evicting the oldest entry if the capacity is
    /// exceeded, then notify every registered listener in registration
    /// order.
    ///
    /// Listener panics are not caught; they unwind to the emitter's
    /// caller.
    pub fn emit(&mut self, event: TransitionEvent<I>) {
        self.history.push_back(event.clone());
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// Register a listener for every future event (history is not
    /// replayed). Returns the token that unsubscribes it.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&TransitionEvent<I>) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove exactly the listener registered under `id`.
    ///
    /// Safe to call multiple times; returns whether a listener was
    /// actually removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Independent, order-preserving copy of the history, oldest first.
    pub fn history(&self) -> Vec<TransitionEvent<I>> {
        self.history.iter().cloned().collect()
    }

    /// Empty both the history and the listener registry.
    pub fn clear(&mut self) {
        self.history.clear();
        self.listeners.clear();
    }

    /// The configured history bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of events currently retained.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
    enum Id {
        A,
        B,
        C,
    }

    fn event(from: Id, to: Id) -> TransitionEvent<Id> {
        TransitionEvent {
            from,
            to,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn history_is_ordered_oldest_first() {
        let mut log = EventLog::new(10);
        log.emit(event(Id::A, Id::B));
        log.emit(event(Id::B, Id::C));

        let history = log.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].to, Id::B);
        assert_eq!(history[1].to, Id::C);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut log = EventLog::new(2);
        log.emit(event(Id::A, Id::B));
        log.emit(event(Id::B, Id::C));
        log.emit(event(Id::C, Id::A));

        let history = log.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].from, Id::B);
        assert_eq!(history[1].from, Id::C);
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let mut log = EventLog::new(0);
        let seen = Rc::new(RefCell::new(0));
        let seen_by_listener = seen.clone();
        log.subscribe(move |_| *seen_by_listener.borrow_mut() += 1);

        log.emit(event(Id::A, Id::B));

        assert!(log.is_empty());
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn history_snapshot_is_independent() {
        let mut log = EventLog::new(10);
        log.emit(event(Id::A, Id::B));

        let snapshot = log.history();
        log.emit(event(Id::B, Id::C));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn listeners_fire_in_registration_order() {
        let mut log = EventLog::new(10);
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = order.clone();
        log.subscribe(move |_| first.borrow_mut().push("first"));
        let second = order.clone();
        log.subscribe(move |_| second.borrow_mut().push("second"));

        log.emit(event(Id::A, Id::B));

        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_listener() {
        let mut log = EventLog::new(10);
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = order.clone();
        let token = log.subscribe(move |_| first.borrow_mut().push("first"));
        let second = order.clone();
        log.subscribe(move |_| second.borrow_mut().push("second"));

        assert!(log.unsubscribe(token));
        // Second call is a no-op.
        assert!(!log.unsubscribe(token));

        log.emit(event(Id::A, Id::B));

        assert_eq!(*order.borrow(), vec!["second"]);
    }

    #[test]
    fn listeners_see_future_events_only() {
        let mut log = EventLog::new(10);
        log.emit(event(Id::A, Id::B));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        log.subscribe(move |e: &TransitionEvent<Id>| sink.borrow_mut().push(e.to));

        log.emit(event(Id::B, Id::C));

        assert_eq!(*seen.borrow(), vec![Id::C]);
    }

    #[test]
    fn clear_drops_history_and_listeners() {
        let mut log = EventLog::new(10);
        let seen = Rc::new(RefCell::new(0));
        let sink = seen.clone();
        log.subscribe(move |_| *sink.borrow_mut() += 1);
        log.emit(event(Id::A, Id::B));

        log.clear();
        log.emit(event(Id::B, Id::C));

        assert_eq!(log.len(), 1);
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn event_serializes_round_trip() {
        let original = event(Id::A, Id::B);
        let json = serde_json::to_string(&original).unwrap();
        let back: TransitionEvent<Id> = serde_json::from_str(&json).unwrap();
        assert_eq!(original, back);
    }
}
