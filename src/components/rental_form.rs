//! Rental Form Component
//!
//! Creates a new rental transaction against the gateway.

use chrono::NaiveDate;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::cache::use_query_cache;
use crate::context::use_app_context;
use crate::models::CreateRentalRequest;
use crate::stats::{stock_status, StockStatus};
use crate::store::{use_app_store, use_rental_store, AppStateStoreFields};

#[component]
pub fn RentalForm() -> impl IntoView {
    let ctx = use_app_context();
    let state = use_app_store();
    let store = use_rental_store();
    let cache = use_query_cache();

    let (item_id, set_item_id) = signal(String::new());
    let (renter_name, set_renter_name) = signal(String::new());
    let (renter_contact, set_renter_contact) = signal(String::new());
    let (expected_date, set_expected_date) = signal(String::new());
    let (notes, set_notes) = signal(String::new());
    let (error, set_error) = signal(None::<&'static str>);
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get() {
            return;
        }

        let Ok(item_id) = item_id.get().parse::<u32>() else {
            set_error.set(Some("Pick an item."));
            return;
        };
        let name = renter_name.get().trim().to_string();
        if name.is_empty() {
            set_error.set(Some("Enter the renter's name."));
            return;
        }
        let contact = renter_contact.get().trim().to_string();
        if contact.is_empty() {
            set_error.set(Some("Enter a contact."));
            return;
        }
        let Ok(date) = NaiveDate::parse_from_str(&expected_date.get(), "%Y-%m-%d") else {
            set_error.set(Some("Pick an expected return date."));
            return;
        };
        set_error.set(None);

        // The picker yields a bare date; the deadline is end of that day.
        let Some(expected_return_date) = date.and_hms_opt(23, 59, 59).map(|t| t.and_utc()) else {
            return;
        };
        let trimmed_notes = notes.get().trim().to_string();
        let req = CreateRentalRequest {
            item_id,
            renter_name: name,
            renter_contact: contact,
            expected_return_date,
            notes: (!trimmed_notes.is_empty()).then_some(trimmed_notes),
        };

        set_submitting.set(true);
        let store = store.clone();
        let cache = cache.clone();
        spawn_local(async move {
            match api::create_rental(&req).await {
                Ok(rental) => {
                    cache.invalidate_after_mutation();
                    store.add(rental);
                    ctx.notify_success("Rental registered.");
                    ctx.reload();
                    set_item_id.set(String::new());
                    set_renter_name.set(String::new());
                    set_renter_contact.set(String::new());
                    set_expected_date.set(String::new());
                    set_notes.set(String::new());
                }
                Err(err) => ctx.notify_error(format!("Could not register rental: {err}")),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <form class="card rental-form" on:submit=on_submit>
            <h3>"New rental"</h3>

            <div class="form-row">
                <label>"Item"</label>
                <select
                    prop:value=move || item_id.get()
                    on:change=move |ev| set_item_id.set(event_target_value(&ev))
                >
                    <option value="">"Select an item..."</option>
                    <For
                        each=move || state.items().get()
                        key=|item| item.id
                        children=move |item| {
                            let rentable = stock_status(&item) == StockStatus::Available;
                            view! {
                                <option value=item.id.to_string() disabled=!rentable>
                                    {format!("{} ({} left)", item.name, item.stock)}
                                </option>
                            }
                        }
                    />
                </select>
            </div>

            <div class="form-row">
                <label>"Renter"</label>
                <input
                    type="text"
                    placeholder="Name"
                    prop:value=move || renter_name.get()
                    on:input=move |ev| set_renter_name.set(event_target_value(&ev))
                />
            </div>

            <div class="form-row">
                <label>"Contact"</label>
                <input
                    type="text"
                    placeholder="Email or phone"
                    prop:value=move || renter_contact.get()
                    on:input=move |ev| set_renter_contact.set(event_target_value(&ev))
                />
            </div>

            <div class="form-row">
                <label>"Expected return"</label>
                <input
                    type="date"
                    prop:value=move || expected_date.get()
                    on:input=move |ev| set_expected_date.set(event_target_value(&ev))
                />
            </div>

            <div class="form-row">
                <label>"Notes"</label>
                <textarea
                    placeholder="Optional"
                    prop:value=move || notes.get()
                    on:input=move |ev| set_notes.set(event_target_value(&ev))
                ></textarea>
            </div>

            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}

            <button type="submit" class="btn primary" disabled=move || submitting.get()>
                {move || if submitting.get() { "Registering..." } else { "Register rental" }}
            </button>
        </form>
    }
}
