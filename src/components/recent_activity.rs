//! Recent Activity Component
//!
//! Merged feed of the latest rental starts and returns.

use leptos::prelude::*;

use crate::stats::{ActivityEntry, ActivityKind};

#[component]
pub fn RecentActivity(#[prop(into)] feed: Signal<Vec<ActivityEntry>>) -> impl IntoView {
    view! {
        <div class="card recent-activity">
            <h3>"Recent activity"</h3>
            <Show
                when=move || !feed.get().is_empty()
                fallback=|| view! { <p class="empty-hint">"No recent activity."</p> }
            >
                <ul class="activity-list">
                    <For
                        each=move || feed.get()
                        key=|entry| (entry.rental_id, entry.kind == ActivityKind::Returned)
                        children=move |entry| {
                            let (verb, class) = match entry.kind {
                                ActivityKind::Rented => ("Rented", "activity rented"),
                                ActivityKind::Returned => ("Returned", "activity returned"),
                            };
                            view! {
                                <li class=class>
                                    <span class="activity-verb">{verb}</span>
                                    <span class="activity-item">{entry.item_name.clone()}</span>
                                    <span class="activity-renter">{entry.renter_name.clone()}</span>
                                    <span class="activity-time">
                                        {entry.at.format("%b %d %H:%M").to_string()}
                                    </span>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>
        </div>
    }
}
