//! Popular Items Component
//!
//! Top-5 ranking of items by rental count.

use leptos::prelude::*;

use crate::stats::PopularItem;

#[component]
pub fn PopularItems(#[prop(into)] ranking: Signal<Vec<PopularItem>>) -> impl IntoView {
    view! {
        <div class="card popular-items">
            <h3>"Top 5 items"</h3>
            <Show
                when=move || !ranking.get().is_empty()
                fallback=|| view! { <p class="empty-hint">"No rentals recorded yet."</p> }
            >
                <ol class="ranking-list">
                    <For
                        each=move || ranking.get()
                        key=|entry| entry.name.clone()
                        children=move |entry| {
                            view! {
                                <li class="ranking-row">
                                    <span class=format!("rank rank-{}", entry.rank)>{entry.rank}</span>
                                    <span class="ranking-name">{entry.name.clone()}</span>
                                    <span class="ranking-count">{entry.count} " rentals"</span>
                                </li>
                            }
                        }
                    />
                </ol>
            </Show>
        </div>
    }
}
