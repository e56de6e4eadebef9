//! Application Root
//!
//! Composition root: constructs the store, cache and context, wires the
//! store mirror and the push listener, and loads both collections through
//! the cache whenever the reload trigger bumps.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::cache::{browser_clock, EntityKind, QueryCache, QueryKey};
use crate::components::{DashboardPage, ItemsPage, NavBar, RentalsPage, ToastStack};
use crate::config::RECONNECT_DELAY_MS;
use crate::context::{AppContext, Page};
use crate::models::Loadable;
use crate::push::{push_url, ConnState, PushListener};
use crate::store::{AppState, AppStateStoreFields, AppStore, RentalStore};

#[component]
pub fn App() -> impl IntoView {
    // Explicitly constructed shared state, injected through context; nothing
    // here lives at module scope.
    let store = RentalStore::new(browser_clock());
    let cache = QueryCache::new(browser_clock());
    let state: AppStore = reactive_stores::Store::new(AppState::default());
    let ctx = AppContext::new();

    provide_context(store.clone());
    provide_context(cache.clone());
    provide_context(state);
    provide_context(ctx);

    // Mirror observer: every store notification re-publishes the collection
    // into the reactive state the components read.
    let mirror_sub = {
        let source = store.clone();
        store.subscribe(move || {
            state.rentals().set(source.rentals());
            state.last_sync().set(source.last_update());
        })
    };
    // Console observer, kept separate so the log line survives mirror
    // changes.
    let log_sub = store.subscribe(|| {
        web_sys::console::log_1(&"[APP] rental collection changed".into());
    });

    // Push listener: recognized events stale both collections and surface a
    // toast, then the reload below refetches.
    let listener = {
        let cache = cache.clone();
        PushListener::start(
            push_url(),
            RECONNECT_DELAY_MS,
            move |event| {
                cache.invalidate_after_mutation();
                ctx.notify_info(event.message());
                ctx.reload();
            },
            move |conn| ctx.set_push_connected.set(conn == ConnState::Open),
        )
    };

    // Owned by the root for the app's lifetime; dropping them on owner
    // cleanup deregisters the observers and tears the listener down.
    let _held = StoredValue::new_local((mirror_sub, log_sub, listener));

    // Load both collections through the cache on startup and on every
    // reload. Mutations invalidate first, so a reload after one goes to the
    // network; otherwise a fresh cache entry answers without a request.
    Effect::new(move |_| {
        let _ = ctx.reload_trigger.get();
        let store = expect_context::<RentalStore>();
        let cache = expect_context::<QueryCache>();
        // A retry after a failure shows the loading state again; a routine
        // refetch keeps the current data on screen.
        if ctx.rentals_load.get_untracked().error().is_some() {
            ctx.rentals_load.set(Loadable::Loading);
        }
        if ctx.items_load.get_untracked().error().is_some() {
            ctx.items_load.set(Loadable::Loading);
        }
        spawn_local(async move {
            match cache
                .fetch(QueryKey::all(EntityKind::Rentals), || api::list_rentals(None))
                .await
            {
                Ok(rentals) => {
                    store.set_all((*rentals).clone());
                    ctx.rentals_load.set(Loadable::Ready);
                }
                Err(err) => ctx.rentals_load.set(Loadable::Failed(err.to_string())),
            }
            match cache
                .fetch(QueryKey::all(EntityKind::Items), || api::list_items())
                .await
            {
                Ok(items) => {
                    state.items().set((*items).clone());
                    ctx.items_load.set(Loadable::Ready);
                }
                Err(err) => ctx.items_load.set(Loadable::Failed(err.to_string())),
            }
        });
    });

    view! {
        <div class="app-layout">
            <NavBar />

            <main class="main-content">
                {move || match ctx.page.get() {
                    Page::Dashboard => view! { <DashboardPage /> }.into_any(),
                    Page::Rentals => view! { <RentalsPage /> }.into_any(),
                    Page::Items => view! { <ItemsPage /> }.into_any(),
                }}
            </main>

            <ToastStack />
        </div>
    }
}
