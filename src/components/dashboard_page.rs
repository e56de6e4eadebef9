//! Dashboard Page
//!
//! Stat cards, quick actions, activity feed, popularity ranking and the
//! monthly chart, all derived from the mirrored collections.

use chrono::Utc;
use leptos::prelude::*;

use crate::components::{MonthlyChart, PopularItems, QuickActions, RecentActivity, StatCard};
use crate::context::use_app_context;
use crate::stats::{dashboard_stats, monthly_totals, popular_items, recent_activity};
use crate::store::{use_app_store, use_rental_store, AppStateStoreFields};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = use_app_context();
    let state = use_app_store();
    let store = use_rental_store();

    // Direct store observer: counts change notifications while this page is
    // mounted. The subscription is dropped (and deregistered) on unmount.
    let (update_count, set_update_count) = signal(0u32);
    let _observer = StoredValue::new_local(
        store.subscribe(move || set_update_count.update(|count| *count += 1)),
    );

    let stats = Memo::new(move |_| {
        dashboard_stats(&state.rentals().get(), &state.items().get(), Utc::now())
    });
    let ongoing = Memo::new(move |_| stats.get().ongoing);
    let available = Memo::new(move |_| stats.get().available_items);
    let today = Memo::new(move |_| stats.get().today_rentals);
    let overdue = Memo::new(move |_| stats.get().overdue);

    let feed = Memo::new(move |_| recent_activity(&state.rentals().get()));
    let ranking = Memo::new(move |_| popular_items(&state.rentals().get()));
    let buckets = Memo::new(move |_| monthly_totals(&state.rentals().get(), Utc::now()));

    let loading = move || ctx.rentals_load.get().is_loading() || ctx.items_load.get().is_loading();
    let failure = move || {
        ctx.rentals_load
            .get()
            .error()
            .or(ctx.items_load.get().error())
            .map(str::to_owned)
    };

    view! {
        <div class="page dashboard-page">
            <header class="page-header">
                <div>
                    <h1>"Dashboard"</h1>
                    <p>"Loan activity at a glance"</p>
                </div>
                <Show when=move || (update_count.get() > 0)>
                    <span class="update-hint">
                        {move || format!("{} live updates", update_count.get())}
                    </span>
                </Show>
            </header>

            <Show when=move || loading()>
                <p class="loading-hint">"Loading..."</p>
            </Show>

            {move || failure().map(|message| view! {
                <div class="fetch-error">
                    <p>{format!("Could not load data: {message}")}</p>
                    <button class="btn secondary" on:click=move |_| ctx.reload()>
                        "Retry"
                    </button>
                </div>
            })}

            <Show when=move || !loading() && failure().is_none()>
                <div class="stat-grid">
                    <StatCard label="Ongoing rentals" value=ongoing accent="blue" />
                    <StatCard label="Available items" value=available accent="green" />
                    <StatCard label="Rented today" value=today accent="yellow" />
                    <StatCard label="Overdue" value=overdue accent="red" />
                </div>

                <QuickActions />

                <div class="dashboard-grid">
                    <RecentActivity feed=feed />
                    <PopularItems ranking=ranking />
                </div>

                <MonthlyChart buckets=buckets />
            </Show>
        </div>
    }
}
