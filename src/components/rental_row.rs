//! Rental Row Component
//!
//! One rental record with return/extend/edit/delete actions.

use chrono::{Duration, NaiveDate};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::cache::use_query_cache;
use crate::context::use_app_context;
use crate::models::{Rental, RentalStatus, UpdateRentalRequest};
use crate::store::use_rental_store;

use super::ConfirmButton;

#[component]
pub fn RentalRow(rental: Rental) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_rental_store();
    let cache = use_query_cache();

    let (busy, set_busy) = signal(false);
    let (editing, set_editing) = signal(false);

    let id = rental.id;
    let open = rental.status != RentalStatus::Completed;
    let status_class = match rental.status {
        RentalStatus::Ongoing => "status-badge ongoing",
        RentalStatus::Completed => "status-badge completed",
        RentalStatus::Overdue => "status-badge overdue",
    };

    // Edit form state, seeded from the record.
    let (edit_name, set_edit_name) = signal(rental.renter_name.clone());
    let (edit_contact, set_edit_contact) = signal(rental.renter_contact.clone());
    let (edit_date, set_edit_date) =
        signal(rental.expected_return_date.format("%Y-%m-%d").to_string());
    let (edit_notes, set_edit_notes) = signal(rental.notes.clone().unwrap_or_default());

    let on_return = {
        let store = store.clone();
        let cache = cache.clone();
        move |_: web_sys::MouseEvent| {
            if busy.get() {
                return;
            }
            set_busy.set(true);
            let store = store.clone();
            let cache = cache.clone();
            spawn_local(async move {
                match api::return_rental(id).await {
                    Ok(returned) => {
                        cache.invalidate_after_mutation();
                        store.update(id, returned);
                        ctx.notify_success("Marked as returned.");
                        ctx.reload();
                    }
                    Err(err) => ctx.notify_error(format!("Could not mark as returned: {err}")),
                }
                set_busy.set(false);
            });
        }
    };

    // One-click deadline extension; partial update, so PATCH.
    let on_extend = {
        let store = store.clone();
        let cache = cache.clone();
        let current_deadline = rental.expected_return_date;
        move |_: web_sys::MouseEvent| {
            if busy.get() {
                return;
            }
            set_busy.set(true);
            let req = UpdateRentalRequest {
                expected_return_date: Some(current_deadline + Duration::days(7)),
                ..Default::default()
            };
            let store = store.clone();
            let cache = cache.clone();
            spawn_local(async move {
                match api::patch_rental(id, &req).await {
                    Ok(updated) => {
                        cache.invalidate_after_mutation();
                        store.update(id, updated);
                        ctx.notify_success("Deadline extended by a week.");
                        ctx.reload();
                    }
                    Err(err) => ctx.notify_error(format!("Could not extend deadline: {err}")),
                }
                set_busy.set(false);
            });
        }
    };

    let on_save_edit = {
        let store = store.clone();
        let cache = cache.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            if busy.get() {
                return;
            }
            let name = edit_name.get().trim().to_string();
            let contact = edit_contact.get().trim().to_string();
            if name.is_empty() || contact.is_empty() {
                ctx.notify_error("Renter name and contact cannot be empty.");
                return;
            }
            let Ok(date) = NaiveDate::parse_from_str(&edit_date.get(), "%Y-%m-%d") else {
                ctx.notify_error("Expected return date is not valid.");
                return;
            };
            let trimmed_notes = edit_notes.get().trim().to_string();
            let req = UpdateRentalRequest {
                renter_name: Some(name),
                renter_contact: Some(contact),
                expected_return_date: date.and_hms_opt(23, 59, 59).map(|t| t.and_utc()),
                notes: Some(trimmed_notes),
            };
            set_busy.set(true);
            let store = store.clone();
            let cache = cache.clone();
            spawn_local(async move {
                match api::update_rental(id, &req).await {
                    Ok(updated) => {
                        cache.invalidate_after_mutation();
                        store.update(id, updated);
                        ctx.notify_success("Rental updated.");
                        ctx.reload();
                        set_editing.set(false);
                    }
                    Err(err) => ctx.notify_error(format!("Could not update rental: {err}")),
                }
                set_busy.set(false);
            });
        }
    };

    let on_delete = {
        let store = store.clone();
        let cache = cache.clone();
        move |()| {
            if busy.get() {
                return;
            }
            set_busy.set(true);
            let store = store.clone();
            let cache = cache.clone();
            spawn_local(async move {
                match api::delete_rental(id).await {
                    Ok(()) => {
                        cache.invalidate_after_mutation();
                        store.remove(id);
                        ctx.notify_success("Rental record deleted.");
                        ctx.reload();
                    }
                    Err(err) => ctx.notify_error(format!("Could not delete rental: {err}")),
                }
                set_busy.set(false);
            });
        }
    };

    view! {
        <li class="rental-row" class:busy=move || busy.get()>
            <div class="rental-summary">
                <span class=status_class>{rental.status.label()}</span>
                <span class="rental-item">{rental.item_name.clone()}</span>
                <span class="rental-renter">
                    {rental.renter_name.clone()} " · " {rental.renter_contact.clone()}
                </span>
                <span class="rental-dates">
                    {rental.rental_date.format("%Y-%m-%d").to_string()}
                    " → "
                    {match rental.return_date {
                        Some(returned) => returned.format("%Y-%m-%d").to_string(),
                        None => format!(
                            "due {}",
                            rental.expected_return_date.format("%Y-%m-%d")
                        ),
                    }}
                </span>
                {rental.notes.clone().map(|notes| view! { <span class="rental-notes">{notes}</span> })}
            </div>

            <div class="rental-actions">
                <Show when=move || open>
                    <button
                        class="btn small"
                        disabled=move || busy.get()
                        on:click=on_return.clone()
                    >
                        "Return"
                    </button>
                    <button
                        class="btn small"
                        disabled=move || busy.get()
                        on:click=on_extend.clone()
                    >
                        "+1 week"
                    </button>
                </Show>
                <button class="btn small secondary" on:click=move |_| set_editing.update(|e| *e = !*e)>
                    {move || if editing.get() { "Close" } else { "Edit" }}
                </button>
                <ConfirmButton
                    label="Delete"
                    button_class="btn small danger"
                    on_confirm=on_delete
                />
            </div>

            <Show when=move || editing.get()>
                <form class="rental-edit-form" on:submit=on_save_edit.clone()>
                    <input
                        type="text"
                        placeholder="Renter"
                        prop:value=move || edit_name.get()
                        on:input=move |ev| set_edit_name.set(event_target_value(&ev))
                    />
                    <input
                        type="text"
                        placeholder="Contact"
                        prop:value=move || edit_contact.get()
                        on:input=move |ev| set_edit_contact.set(event_target_value(&ev))
                    />
                    <input
                        type="date"
                        prop:value=move || edit_date.get()
                        on:input=move |ev| set_edit_date.set(event_target_value(&ev))
                    />
                    <input
                        type="text"
                        placeholder="Notes"
                        prop:value=move || edit_notes.get()
                        on:input=move |ev| set_edit_notes.set(event_target_value(&ev))
                    />
                    <button type="submit" class="btn small primary" disabled=move || busy.get()>
                        "Save"
                    </button>
                </form>
            </Show>
        </li>
    }
}
