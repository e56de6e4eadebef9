//! Rentals Page
//!
//! Create-rental form above the filtered, paginated rental list.

use leptos::prelude::*;

use crate::context::use_app_context;

use super::{RentalForm, RentalList};

#[component]
pub fn RentalsPage() -> impl IntoView {
    let ctx = use_app_context();

    let loading = move || ctx.rentals_load.get().is_loading() || ctx.items_load.get().is_loading();
    let failure = move || {
        ctx.rentals_load
            .get()
            .error()
            .or(ctx.items_load.get().error())
            .map(str::to_owned)
    };

    view! {
        <div class="page rentals-page">
            <header class="page-header">
                <h1>"Rentals"</h1>
                <p>"Register, return and manage rental transactions"</p>
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
                <RentalForm />
                <RentalList />
            </Show>
        </div>
    }
}
