//! Navigation Bar Component
//!
//! Sidebar page switcher with the push-channel connectivity dot.

use leptos::prelude::*;

use crate::context::{use_app_context, Page};

const PAGES: &[Page] = &[Page::Dashboard, Page::Rentals, Page::Items];

#[component]
pub fn NavBar() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <nav class="nav-bar">
            <div class="nav-title">
                <h2>"Lenddesk"</h2>
                <p class="nav-subtitle">"Inventory & rental tracking"</p>
            </div>

            <div class="nav-links">
                {PAGES.iter().map(|&page| {
                    let is_active = move || ctx.page.get() == page;
                    view! {
                        <button
                            class=move || if is_active() { "nav-link active" } else { "nav-link" }
                            on:click=move |_| ctx.go(page)
                        >
                            {page.label()}
                        </button>
                    }
                }).collect_view()}
            </div>

            <div class="nav-status">
                <span
                    class=move || {
                        if ctx.push_connected.get() { "status-dot online" } else { "status-dot offline" }
                    }
                ></span>
                <span class="status-text">
                    {move || if ctx.push_connected.get() { "Live updates" } else { "Reconnecting..." }}
                </span>
            </div>
        </nav>
    }
}
