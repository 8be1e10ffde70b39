//! Change notification bus for record mutations.
//!
//! # Responsibility
//! - Keep the registry of address-scoped change listeners.
//! - Deliver records-changed events synchronously after successful
//!   mutations.
//!
//! # Invariants
//! - Delivery is fire-and-forget: no ordering between listeners, no
//!   retries, no result.
//! - A listener subscribed to an address also observes every descendant
//!   address, so collection subscribers see record-level changes.
//! - Subscription ids are process-unique and never reused.

use crate::address::Address;
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Event published after a mutation changed at least one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsChanged {
    /// Address the mutating operation was invoked with.
    pub address: Address,
}

/// Receiver side of change notifications.
pub trait ChangeListener: Send + Sync {
    fn on_records_changed(&self, event: &RecordsChanged);
}

/// Handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscription {
    address: Address,
    listener: Arc<dyn ChangeListener>,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    subscriptions: BTreeMap<u64, Subscription>,
}

/// Clone-shareable registry of change listeners.
///
/// Clones share one registry; subscribing through any clone makes the
/// listener visible to publishes through every other clone.
#[derive(Clone, Default)]
pub struct ChangeBus {
    state: Arc<Mutex<BusState>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for `address` and its descendants.
    pub fn subscribe(&self, address: Address, listener: Arc<dyn ChangeListener>) -> SubscriptionId {
        let mut state = self.lock_state();
        let id = state.next_id;
        state.next_id += 1;
        state.subscriptions.insert(id, Subscription { address, listener });
        SubscriptionId(id)
    }

    /// Removes one subscription; unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.lock_state().subscriptions.remove(&id.0);
    }

    pub fn subscription_count(&self) -> usize {
        self.lock_state().subscriptions.len()
    }

    /// Publishes `event` to every matching listener, synchronously on the
    /// calling thread.
    pub fn publish(&self, event: &RecordsChanged) {
        // Matching listeners are collected under the lock and invoked
        // outside it, so a listener may subscribe or unsubscribe freely.
        let matched: Vec<Arc<dyn ChangeListener>> = self
            .lock_state()
            .subscriptions
            .values()
            .filter(|sub| event_reaches(&event.address, &sub.address))
            .map(|sub| Arc::clone(&sub.listener))
            .collect();

        debug!(
            "event=records_changed module=events status=ok address={} listeners={}",
            event.address,
            matched.len()
        );
        for listener in matched {
            listener.on_records_changed(event);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, BusState> {
        // Nothing panics while holding the guard, so a poisoned lock still
        // protects a consistent registry.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn event_reaches(event_address: &Address, subscribed: &Address) -> bool {
    event_address == subscribed || event_address.is_descendant_of(subscribed)
}
