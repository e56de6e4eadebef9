//! Rental State Store
//!
//! Process-wide holder of the rental collection. The store is the Subject of
//! an observer relationship: callers register zero-argument callbacks and are
//! notified synchronously after every mutation. Components do not read the
//! store directly; a `reactive_stores` mirror (kept in sync by an observer
//! registered at the composition root) gives them field-level reactivity.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use reactive_stores::Store;

use crate::cache::Clock;
use crate::models::{Item, Rental};

type Observer = Rc<dyn Fn()>;

struct StoreInner {
    rentals: Vec<Rental>,
    last_update: f64,
    observers: Vec<(u64, Observer)>,
    next_token: u64,
}

/// Handle to the rental store. Cheap to clone; constructed once at the
/// composition root and provided through context, never as a module global.
///
/// Two mutations in flight at once resolve in network arrival order, last
/// write wins. Known limitation: there is no request sequencing.
#[derive(Clone)]
pub struct RentalStore {
    inner: Rc<RefCell<StoreInner>>,
    clock: Clock,
}

impl RentalStore {
    pub fn new(clock: Clock) -> Self {
        let last_update = clock();
        RentalStore {
            inner: Rc::new(RefCell::new(StoreInner {
                rentals: Vec::new(),
                last_update,
                observers: Vec::new(),
                next_token: 0,
            })),
            clock,
        }
    }

    pub fn rentals(&self) -> Vec<Rental> {
        self.inner.borrow().rentals.clone()
    }

    /// Milliseconds timestamp of the last mutation.
    pub fn last_update(&self) -> f64 {
        self.inner.borrow().last_update
    }

    /// Replaces the whole collection and notifies. Identical input still
    /// notifies; there is no diffing.
    pub fn set_all(&self, rentals: Vec<Rental>) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.rentals = rentals;
            inner.last_update = (self.clock)();
        }
        self.notify();
    }

    pub fn add(&self, rental: Rental) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.rentals.push(rental);
            inner.last_update = (self.clock)();
        }
        self.notify();
    }

    /// Replaces the record with the matching id. An unknown id leaves the
    /// collection untouched but still notifies (documented quirk).
    pub fn update(&self, id: u32, rental: Rental) {
        {
            let mut inner = self.inner.borrow_mut();
            if let Some(slot) = inner.rentals.iter_mut().find(|r| r.id == id) {
                *slot = rental;
            }
            inner.last_update = (self.clock)();
        }
        self.notify();
    }

    /// Removes the record with the matching id. An unknown id leaves the
    /// collection untouched but still notifies (documented quirk).
    pub fn remove(&self, id: u32) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.rentals.retain(|r| r.id != id);
            inner.last_update = (self.clock)();
        }
        self.notify();
    }

    /// Registers an observer; the handle removes exactly this registration.
    /// Subscribing the same closure twice yields two independent
    /// registrations, each needing its own unsubscribe.
    pub fn subscribe(&self, observer: impl Fn() + 'static) -> Subscription {
        let token = {
            let mut inner = self.inner.borrow_mut();
            let token = inner.next_token;
            inner.next_token += 1;
            inner.observers.push((token, Rc::new(observer)));
            token
        };
        Subscription {
            token,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Invokes every registered observer in registration order, on the
    /// calling thread. Iterates a snapshot, so observers may subscribe or
    /// unsubscribe mid-notification; they must not mutate the collection
    /// itself from inside the callback.
    pub fn notify(&self) {
        let snapshot: Vec<Observer> = self
            .inner
            .borrow()
            .observers
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in snapshot {
            observer();
        }
    }
}

/// Registration handle returned by [`RentalStore::subscribe`]. Removal is by
/// registration identity, so duplicate subscriptions of one callback are
/// torn down independently. Dropping the handle deregisters, so an observer
/// can never outlive the state it closes over.
pub struct Subscription {
    token: u64,
    inner: Weak<RefCell<StoreInner>>,
}

impl Subscription {
    /// Removes exactly this registration. Dropping the handle does the same;
    /// this spelling just makes the intent visible at call sites.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .borrow_mut()
                .observers
                .retain(|(token, _)| *token != self.token);
        }
    }
}

pub fn use_rental_store() -> RentalStore {
    expect_context::<RentalStore>()
}

// ========================
// Reactive Mirror
// ========================

/// Field-reactive mirror of shared collections. `rentals` and `last_sync`
/// are written only by the store observer installed in `App`; `items` is
/// written by the item loader.
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub rentals: Vec<Rental>,
    pub items: Vec<Item>,
    /// Millisecond timestamp of the last store notification.
    pub last_sync: f64,
}

pub type AppStore = Store<AppState>;

pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::RentalStatus;

    fn test_clock() -> (Rc<Cell<f64>>, Clock) {
        let now = Rc::new(Cell::new(0.0));
        let handle = Rc::clone(&now);
        (now, Rc::new(move || handle.get()))
    }

    fn rental(id: u32) -> Rental {
        Rental {
            id,
            item_id: 1,
            item_name: "Umbrella".to_string(),
            renter_name: "Kim".to_string(),
            renter_contact: "kim@example.com".to_string(),
            status: RentalStatus::Ongoing,
            rental_date: Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap(),
            expected_return_date: Utc.with_ymd_and_hms(2026, 7, 8, 9, 0, 0).unwrap(),
            return_date: None,
            notes: None,
        }
    }

    #[test]
    fn test_every_mutation_notifies_each_observer_once_in_order() {
        let (_, clock) = test_clock();
        let store = RentalStore::new(clock);
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        let sub_a = store.subscribe(move || first.borrow_mut().push("a"));
        let second = Rc::clone(&log);
        let sub_b = store.subscribe(move || second.borrow_mut().push("b"));

        store.add(rental(1));
        store.update(1, rental(1));
        store.remove(1);
        store.set_all(vec![rental(2)]);

        assert_eq!(*log.borrow(), vec!["a", "b", "a", "b", "a", "b", "a", "b"]);
        sub_a.unsubscribe();
        sub_b.unsubscribe();
    }

    #[test]
    fn test_unsubscribe_stops_all_further_notifications() {
        let (_, clock) = test_clock();
        let store = RentalStore::new(clock);
        let count = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&count);
        let sub = store.subscribe(move || counter.set(counter.get() + 1));
        store.add(rental(1));
        assert_eq!(count.get(), 1);

        sub.unsubscribe();
        store.add(rental(2));
        store.remove(1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_duplicate_subscription_needs_two_unsubscribes() {
        let (_, clock) = test_clock();
        let store = RentalStore::new(clock);
        let count = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&count);
        let observer = move || counter.set(counter.get() + 1);
        let sub_one = store.subscribe(observer.clone());
        let sub_two = store.subscribe(observer);

        store.add(rental(1));
        assert_eq!(count.get(), 2);

        sub_one.unsubscribe();
        store.add(rental(2));
        assert_eq!(count.get(), 3);

        sub_two.unsubscribe();
        store.add(rental(3));
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_update_replaces_matching_record() {
        let (_, clock) = test_clock();
        let store = RentalStore::new(clock);
        store.set_all(vec![rental(1), rental(2)]);

        let mut changed = rental(2);
        changed.renter_name = "Lee".to_string();
        store.update(2, changed);

        let rentals = store.rentals();
        assert_eq!(rentals[0].renter_name, "Kim");
        assert_eq!(rentals[1].renter_name, "Lee");
    }

    #[test]
    fn test_unknown_id_is_collection_noop_but_still_notifies() {
        let (_, clock) = test_clock();
        let store = RentalStore::new(clock);
        store.set_all(vec![rental(1)]);

        let count = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&count);
        let sub = store.subscribe(move || counter.set(counter.get() + 1));

        store.update(99, rental(99));
        store.remove(99);

        assert_eq!(store.rentals().len(), 1);
        assert_eq!(store.rentals()[0].id, 1);
        assert_eq!(count.get(), 2);
        sub.unsubscribe();
    }

    #[test]
    fn test_set_all_with_identical_input_still_notifies() {
        let (now, clock) = test_clock();
        let store = RentalStore::new(clock);
        let count = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&count);
        let sub = store.subscribe(move || counter.set(counter.get() + 1));

        now.set(10.0);
        store.set_all(vec![rental(1)]);
        now.set(20.0);
        store.set_all(vec![rental(1)]);

        assert_eq!(count.get(), 2);
        assert_eq!(store.last_update(), 20.0);
        sub.unsubscribe();
    }

    #[test]
    fn test_observer_may_unsubscribe_during_notification() {
        let (_, clock) = test_clock();
        let store = RentalStore::new(clock);
        let count = Rc::new(Cell::new(0u32));

        // First observer drops the second one mid-notification; the snapshot
        // still delivers the current round to both.
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let stealer = Rc::clone(&slot);
        let _sub_a = store.subscribe(move || {
            if let Some(sub) = stealer.borrow_mut().take() {
                sub.unsubscribe();
            }
        });
        let counter = Rc::clone(&count);
        let sub_b = store.subscribe(move || counter.set(counter.get() + 1));
        *slot.borrow_mut() = Some(sub_b);

        store.add(rental(1));
        assert_eq!(count.get(), 1);

        store.add(rental(2));
        assert_eq!(count.get(), 1);
    }
}
