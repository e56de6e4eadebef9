//! Rental List Component
//!
//! Status/search filtering and pagination over the mirrored rental
//! collection.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::cache::{use_query_cache, EntityKind, QueryKey};
use crate::config::PAGE_SIZE;
use crate::context::use_app_context;
use crate::stats::{clamp_page, filter_rentals, page_slice, total_pages, StatusFilter};
use crate::store::{use_app_store, use_rental_store, AppStateStoreFields};

use super::RentalRow;

const STATUS_OPTIONS: &[(&str, &str)] = &[
    ("ALL", "All"),
    ("ONGOING", "Ongoing"),
    ("COMPLETED", "Returned"),
    ("OVERDUE", "Overdue"),
];

#[component]
pub fn RentalList() -> impl IntoView {
    let ctx = use_app_context();
    let state = use_app_store();
    let store = use_rental_store();
    let cache = use_query_cache();

    let (status_filter, set_status_filter) = signal(StatusFilter::All);
    let (search, set_search) = signal(String::new());
    let (page, set_page) = signal(1usize);

    // Quick actions jump here with a status preset (e.g. overdue). The
    // preset also pulls the server-filtered list through the cache and
    // publishes it, the way a filtered page load did originally.
    Effect::new(move |_| {
        if let Some(preset) = ctx.rental_preset.get() {
            set_status_filter.set(StatusFilter::Only(preset));
            set_page.set(1);
            let store = store.clone();
            let cache = cache.clone();
            spawn_local(async move {
                let key = QueryKey::filtered(EntityKind::Rentals, preset.as_query());
                match cache.fetch(key, move || api::list_rentals(Some(preset))).await {
                    Ok(list) => store.set_all((*list).clone()),
                    Err(err) => ctx.notify_error(format!("Could not load rentals: {err}")),
                }
            });
        }
    });

    let filtered = Memo::new(move |_| {
        filter_rentals(&state.rentals().get(), status_filter.get(), &search.get())
    });
    let pages = Memo::new(move |_| total_pages(filtered.get().len()));
    // The stored page is not auto-corrected; clamp at read time so a filter
    // change cannot leave the view past the end.
    let current_page = Memo::new(move |_| clamp_page(page.get(), pages.get()));
    let visible = Memo::new(move |_| page_slice(&filtered.get(), current_page.get()));

    view! {
        <div class="rental-list">
            <div class="card filter-bar">
                <input
                    type="text"
                    class="search-input"
                    placeholder="Search item or renter..."
                    prop:value=move || search.get()
                    on:input=move |ev| {
                        set_search.set(event_target_value(&ev));
                        set_page.set(1);
                    }
                />
                <select
                    prop:value=move || status_filter.get().as_str()
                    on:change=move |ev| {
                        set_status_filter.set(StatusFilter::parse(&event_target_value(&ev)));
                        set_page.set(1);
                        // The store may hold a server-filtered subset from a
                        // preset jump; a reload restores the full list (from
                        // cache while fresh).
                        ctx.reload();
                    }
                >
                    {STATUS_OPTIONS.iter().map(|(value, label)| view! {
                        <option value=*value>{*label}</option>
                    }).collect_view()}
                </select>
                <span class="result-count">
                    {move || format!("{} rental records", filtered.get().len())}
                </span>
            </div>

            <Show
                when=move || !visible.get().is_empty()
                fallback=|| view! {
                    <div class="card"><p class="empty-hint">"No rental records."</p></div>
                }
            >
                <ul class="rental-rows">
                    <For
                        each=move || visible.get()
                        key=|rental| rental.clone()
                        children=move |rental| view! { <RentalRow rental=rental /> }
                    />
                </ul>
            </Show>

            <Show when=move || (pages.get() > 1)>
                <div class="card pagination">
                    <button
                        class="btn small"
                        disabled=move || current_page.get() == 1
                        on:click=move |_| set_page.set(current_page.get().saturating_sub(1).max(1))
                    >
                        "Prev"
                    </button>
                    {move || (1..=pages.get()).map(|n| {
                        let is_current = move || current_page.get() == n;
                        view! {
                            <button
                                class=move || if is_current() { "btn small page current" } else { "btn small page" }
                                on:click=move |_| set_page.set(n)
                            >
                                {n}
                            </button>
                        }
                    }).collect_view()}
                    <button
                        class="btn small"
                        disabled=move || current_page.get() >= pages.get()
                        on:click=move |_| set_page.set(clamp_page(current_page.get() + 1, pages.get()))
                    >
                        "Next"
                    </button>
                    <span class="page-size-hint">{format!("{PAGE_SIZE} per page")}</span>
                </div>
            </Show>
        </div>
    }
}
