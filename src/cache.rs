//! Remote-backed Query Cache
//!
//! Deduplicates list fetches against the gateway and provides invalidation
//! after mutations. Single-owner, single-writer; only ever touched from the
//! UI thread.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;

use crate::api::ApiError;
use crate::config::STALE_AFTER_MS;

/// Milliseconds-since-epoch source, injected so tests advance time by hand
/// instead of sleeping.
pub type Clock = Rc<dyn Fn() -> f64>;

/// Wall clock backed by the browser's `Date.now()`.
pub fn browser_clock() -> Clock {
    Rc::new(js_sys::Date::now)
}

/// The two remote collections this client tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Items,
    Rentals,
}

/// Cache key: entity kind plus an optional filter discriminator (e.g. the
/// rental status of a filtered list query).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: EntityKind,
    pub filter: Option<String>,
}

impl QueryKey {
    pub fn all(kind: EntityKind) -> Self {
        QueryKey { kind, filter: None }
    }

    pub fn filtered(kind: EntityKind, filter: impl Into<String>) -> Self {
        QueryKey {
            kind,
            filter: Some(filter.into()),
        }
    }
}

type CachedValue = Rc<dyn Any>;
type InFlight = Shared<LocalBoxFuture<'static, Result<CachedValue, ApiError>>>;

struct CacheEntry {
    value: CachedValue,
    fetched_at: f64,
}

struct CacheInner {
    entries: HashMap<QueryKey, CacheEntry>,
    in_flight: HashMap<QueryKey, InFlight>,
}

/// Handle to the query cache. Cheap to clone; constructed once at the
/// composition root and provided through context.
#[derive(Clone)]
pub struct QueryCache {
    inner: Rc<RefCell<CacheInner>>,
    clock: Clock,
}

impl QueryCache {
    pub fn new(clock: Clock) -> Self {
        QueryCache {
            inner: Rc::new(RefCell::new(CacheInner {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
            })),
            clock,
        }
    }

    /// Returns the cached collection when fresh, otherwise runs `loader` and
    /// caches its result. Concurrent fetches of the same key join a single
    /// in-flight load, so at most one request per key is on the wire.
    /// Failures are never cached; every caller that joined the load sees the
    /// same error and the next fetch retries.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, loader: F) -> Result<Rc<T>, ApiError>
    where
        T: 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + 'static,
    {
        if let Some(value) = self.lookup_fresh(&key) {
            return downcast(value);
        }

        let existing = self.inner.borrow().in_flight.get(&key).cloned();
        let load = match existing {
            Some(load) => load,
            None => {
                let fut = loader();
                let load: InFlight = async move {
                    fut.await.map(|value| Rc::new(value) as CachedValue)
                }
                .boxed_local()
                .shared();
                self.inner
                    .borrow_mut()
                    .in_flight
                    .insert(key.clone(), load.clone());
                load
            }
        };

        let result = load.await;
        {
            let mut inner = self.inner.borrow_mut();
            inner.in_flight.remove(&key);
            if let Ok(value) = &result {
                inner.entries.insert(
                    key,
                    CacheEntry {
                        value: Rc::clone(value),
                        fetched_at: (self.clock)(),
                    },
                );
            }
        }
        downcast(result?)
    }

    /// Drops every entry for `kind`, regardless of filter discriminator, so
    /// the next fetch reloads from the gateway.
    pub fn invalidate(&self, kind: EntityKind) {
        self.inner
            .borrow_mut()
            .entries
            .retain(|key, _| key.kind != kind);
    }

    /// Mutation policy: rentals and items are cross-dependent server-side (a
    /// rental mutation changes item stock), so every successful mutation
    /// stales both collections.
    pub fn invalidate_after_mutation(&self) {
        self.invalidate(EntityKind::Rentals);
        self.invalidate(EntityKind::Items);
    }

    fn lookup_fresh(&self, key: &QueryKey) -> Option<CachedValue> {
        let inner = self.inner.borrow();
        let entry = inner.entries.get(key)?;
        let age = (self.clock)() - entry.fetched_at;
        (age < STALE_AFTER_MS).then(|| Rc::clone(&entry.value))
    }
}

fn downcast<T: 'static>(value: CachedValue) -> Result<Rc<T>, ApiError> {
    value
        .downcast::<T>()
        .map_err(|_| ApiError::Decode("query cache holds a different type for this key".into()))
}

pub fn use_query_cache() -> QueryCache {
    leptos::prelude::expect_context::<QueryCache>()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::channel::oneshot;
    use futures::executor::block_on;

    use super::*;

    fn test_clock() -> (Rc<Cell<f64>>, Clock) {
        let now = Rc::new(Cell::new(0.0));
        let handle = Rc::clone(&now);
        (now, Rc::new(move || handle.get()))
    }

    fn counting_loader(
        counter: &Rc<Cell<u32>>,
        value: Vec<u32>,
    ) -> impl FnOnce() -> futures::future::Ready<Result<Vec<u32>, ApiError>> {
        let counter = Rc::clone(counter);
        move || {
            counter.set(counter.get() + 1);
            futures::future::ready(Ok(value))
        }
    }

    #[test]
    fn test_second_fetch_within_window_skips_loader() {
        let (_, clock) = test_clock();
        let cache = QueryCache::new(clock);
        let loads = Rc::new(Cell::new(0u32));
        let key = QueryKey::all(EntityKind::Rentals);

        block_on(async {
            let first = cache
                .fetch(key.clone(), counting_loader(&loads, vec![1, 2, 3]))
                .await
                .expect("first fetch");
            let second = cache
                .fetch(key.clone(), counting_loader(&loads, vec![9]))
                .await
                .expect("second fetch");
            assert_eq!(*first, vec![1, 2, 3]);
            assert_eq!(*second, vec![1, 2, 3]);
        });
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn test_entry_past_staleness_window_reloads() {
        let (now, clock) = test_clock();
        let cache = QueryCache::new(clock);
        let loads = Rc::new(Cell::new(0u32));
        let key = QueryKey::all(EntityKind::Items);

        block_on(async {
            cache
                .fetch(key.clone(), counting_loader(&loads, vec![1]))
                .await
                .expect("first fetch");
            now.set(STALE_AFTER_MS + 1.0);
            let reloaded = cache
                .fetch(key.clone(), counting_loader(&loads, vec![2]))
                .await
                .expect("reload");
            assert_eq!(*reloaded, vec![2]);
        });
        assert_eq!(loads.get(), 2);
    }

    #[test]
    fn test_invalidate_forces_reload_for_matching_kind_only() {
        let (_, clock) = test_clock();
        let cache = QueryCache::new(clock);
        let rental_loads = Rc::new(Cell::new(0u32));
        let item_loads = Rc::new(Cell::new(0u32));
        let rentals = QueryKey::all(EntityKind::Rentals);
        let overdue = QueryKey::filtered(EntityKind::Rentals, "OVERDUE");
        let items = QueryKey::all(EntityKind::Items);

        block_on(async {
            cache
                .fetch(rentals.clone(), counting_loader(&rental_loads, vec![1]))
                .await
                .expect("seed rentals");
            cache
                .fetch(overdue.clone(), counting_loader(&rental_loads, vec![2]))
                .await
                .expect("seed filtered rentals");
            cache
                .fetch(items.clone(), counting_loader(&item_loads, vec![3]))
                .await
                .expect("seed items");

            cache.invalidate(EntityKind::Rentals);

            // Both rental keys reload, the item key does not.
            cache
                .fetch(rentals, counting_loader(&rental_loads, vec![1]))
                .await
                .expect("reload rentals");
            cache
                .fetch(overdue, counting_loader(&rental_loads, vec![2]))
                .await
                .expect("reload filtered rentals");
            cache
                .fetch(items, counting_loader(&item_loads, vec![3]))
                .await
                .expect("items still cached");
        });
        assert_eq!(rental_loads.get(), 4);
        assert_eq!(item_loads.get(), 1);
    }

    #[test]
    fn test_concurrent_fetches_share_one_load() {
        let (_, clock) = test_clock();
        let cache = QueryCache::new(clock);
        let key = QueryKey::all(EntityKind::Rentals);
        let (tx, rx) = oneshot::channel::<Result<Vec<u32>, ApiError>>();

        block_on(async {
            let first = cache.fetch(key.clone(), || async move {
                rx.await.expect("sender stays alive")
            });
            let second = cache.fetch::<Vec<u32>, _, _>(key.clone(), || async move {
                panic!("second loader must not run while a load is in flight")
            });
            let release = async move {
                tx.send(Ok(vec![7])).expect("receiver stays alive");
            };

            let (first, second, ()) = futures::join!(first, second, release);
            assert_eq!(*first.expect("first fetch"), vec![7]);
            assert_eq!(*second.expect("second fetch"), vec![7]);
        });
    }

    #[test]
    fn test_failure_is_not_cached() {
        let (_, clock) = test_clock();
        let cache = QueryCache::new(clock);
        let loads = Rc::new(Cell::new(0u32));
        let key = QueryKey::all(EntityKind::Items);

        block_on(async {
            let counter = Rc::clone(&loads);
            let failed = cache
                .fetch::<Vec<u32>, _, _>(key.clone(), move || {
                    counter.set(counter.get() + 1);
                    futures::future::ready(Err(ApiError::Transport("offline".into())))
                })
                .await;
            assert_eq!(
                failed.expect_err("loader failure propagates"),
                ApiError::Transport("offline".into())
            );

            let recovered = cache
                .fetch(key, counting_loader(&loads, vec![4]))
                .await
                .expect("retry succeeds");
            assert_eq!(*recovered, vec![4]);
        });
        assert_eq!(loads.get(), 2);
    }
}
