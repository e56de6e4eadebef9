//! Item Card Component
//!
//! One loanable item with stock badge, availability toggle, edit and delete.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::cache::use_query_cache;
use crate::context::use_app_context;
use crate::models::{Item, UpdateItemRequest};
use crate::stats::stock_status;

use super::ConfirmButton;

#[component]
pub fn ItemCard(
    item: Item,
    /// Opens the edit modal with a fresh copy of the record.
    #[prop(into)]
    on_edit: UnsyncCallback<u32>,
) -> impl IntoView {
    let ctx = use_app_context();
    let cache = use_query_cache();

    let (busy, set_busy) = signal(false);

    let id = item.id;
    let status = stock_status(&item);
    let out_of_stock = item.stock == 0;

    // Availability is an intent flag, flipped in place; partial update, so
    // PATCH.
    let on_toggle = {
        let cache = cache.clone();
        let available = item.available;
        move |_: web_sys::MouseEvent| {
            if busy.get() {
                return;
            }
            set_busy.set(true);
            let req = UpdateItemRequest {
                available: Some(!available),
                ..Default::default()
            };
            let cache = cache.clone();
            spawn_local(async move {
                match api::patch_item(id, &req).await {
                    Ok(updated) => {
                        cache.invalidate_after_mutation();
                        ctx.notify_success(if updated.available {
                            "Item opened for loan."
                        } else {
                            "Item withdrawn from loan."
                        });
                        ctx.reload();
                    }
                    Err(err) => ctx.notify_error(format!("Could not update item: {err}")),
                }
                set_busy.set(false);
            });
        }
    };

    let on_delete = {
        let cache = cache.clone();
        move |()| {
            if busy.get() {
                return;
            }
            set_busy.set(true);
            let cache = cache.clone();
            spawn_local(async move {
                match api::delete_item(id).await {
                    Ok(()) => {
                        cache.invalidate_after_mutation();
                        ctx.notify_success("Item deleted.");
                        ctx.reload();
                    }
                    Err(err) => ctx.notify_error(format!("Could not delete item: {err}")),
                }
                set_busy.set(false);
            });
        }
    };

    view! {
        <div class="card item-card" class:dimmed=out_of_stock class:busy=move || busy.get()>
            <div class="item-card-head">
                <h4 class="item-name">{item.name.clone()}</h4>
                <span class=status.css_class()>{status.label()}</span>
            </div>
            <p class="item-category">{item.category.clone()}</p>
            <p class="item-description">{item.description.clone()}</p>
            <p class="item-stock">
                "Stock " <strong>{item.stock}</strong> " / " {item.total_stock}
            </p>

            <div class="item-actions">
                <button class="btn small" disabled=move || busy.get() on:click=on_toggle>
                    {if item.available { "Withdraw" } else { "Open for loan" }}
                </button>
                <button class="btn small secondary" on:click=move |_| on_edit.run(id)>
                    "Edit"
                </button>
                <ConfirmButton
                    label="Delete"
                    button_class="btn small danger"
                    on_confirm=on_delete
                />
            </div>
        </div>
    }
}
