//! Quick Actions Component
//!
//! Dashboard shortcuts into the rental and item views.

use leptos::prelude::*;

use crate::context::{use_app_context, Page};
use crate::models::RentalStatus;

#[component]
pub fn QuickActions() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <div class="card quick-actions">
            <h3>"Quick actions"</h3>
            <div class="quick-actions-row">
                <button class="btn primary" on:click=move |_| ctx.go_rentals(None)>
                    "Rent an item"
                </button>
                <button class="btn secondary" on:click=move |_| ctx.go(Page::Items)>
                    "Register an item"
                </button>
                <button
                    class="btn danger"
                    on:click=move |_| ctx.go_rentals(Some(RentalStatus::Overdue))
                >
                    "Overdue list"
                </button>
            </div>
        </div>
    }
}
