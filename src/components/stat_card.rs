//! Stat Card Component
//!
//! Single dashboard counter with a label and an accent color.

use leptos::prelude::*;

#[component]
pub fn StatCard(
    label: &'static str,
    #[prop(into)] value: Signal<usize>,
    accent: &'static str,
) -> impl IntoView {
    view! {
        <div class=format!("stat-card {accent}")>
            <p class="stat-value">{move || value.get()}</p>
            <p class="stat-label">{label}</p>
        </div>
    }
}
