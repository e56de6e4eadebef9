//! Item Form Component
//!
//! Create/edit form shown in the items page modal. Stock is set once at
//! creation and immutable afterwards.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::cache::use_query_cache;
use crate::context::use_app_context;
use crate::models::{CreateItemRequest, Item, UpdateItemRequest};

#[component]
pub fn ItemForm(
    /// `None` creates a new item, `Some` edits the given record.
    target: Option<Item>,
    #[prop(into)] on_close: UnsyncCallback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let cache = use_query_cache();

    let editing = target.as_ref().map(|item| item.id);
    let (name, set_name) = signal(target.as_ref().map(|i| i.name.clone()).unwrap_or_default());
    let (category, set_category) = signal(
        target
            .as_ref()
            .map(|i| i.category.clone())
            .unwrap_or_default(),
    );
    let (description, set_description) = signal(
        target
            .as_ref()
            .map(|i| i.description.clone())
            .unwrap_or_default(),
    );
    let (stock, set_stock) = signal(
        target
            .as_ref()
            .map(|i| i.stock.to_string())
            .unwrap_or_default(),
    );
    let (available, set_available) = signal(target.as_ref().map(|i| i.available).unwrap_or(true));
    let (error, set_error) = signal(None::<&'static str>);
    let (submitting, set_submitting) = signal(false);

    let on_submit = {
        let cache = cache.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            if submitting.get() {
                return;
            }

            let name_value = name.get().trim().to_string();
            let category_value = category.get().trim().to_string();
            let description_value = description.get().trim().to_string();
            if name_value.is_empty() {
                set_error.set(Some("Enter an item name."));
                return;
            }
            if category_value.is_empty() {
                set_error.set(Some("Enter a category."));
                return;
            }
            if description_value.is_empty() {
                set_error.set(Some("Enter a description."));
                return;
            }

            let stock_value = match editing {
                Some(_) => 0,
                None => match stock.get().trim().parse::<u32>() {
                    Ok(stock) if stock >= 1 => stock,
                    _ => {
                        set_error.set(Some("Initial stock must be at least 1."));
                        return;
                    }
                },
            };
            set_error.set(None);
            set_submitting.set(true);

            let cache = cache.clone();
            spawn_local(async move {
                let outcome = match editing {
                    Some(id) => {
                        let req = UpdateItemRequest {
                            name: Some(name_value),
                            category: Some(category_value),
                            description: Some(description_value),
                            available: Some(available.get_untracked()),
                        };
                        api::update_item(id, &req).await.map(|_| "Item updated.")
                    }
                    None => {
                        let req = CreateItemRequest {
                            name: name_value,
                            category: category_value,
                            description: description_value,
                            stock: stock_value,
                        };
                        api::create_item(&req).await.map(|_| "Item registered.")
                    }
                };
                match outcome {
                    Ok(message) => {
                        cache.invalidate_after_mutation();
                        ctx.notify_success(message);
                        ctx.reload();
                        on_close.run(());
                    }
                    Err(err) => ctx.notify_error(format!("Could not save item: {err}")),
                }
                set_submitting.set(false);
            });
        }
    };

    view! {
        <form class="item-form" on:submit=on_submit>
            <h3>{if editing.is_some() { "Edit item" } else { "Register item" }}</h3>

            <div class="form-row">
                <label>"Name"</label>
                <input
                    type="text"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
            </div>

            <div class="form-row">
                <label>"Category"</label>
                <input
                    type="text"
                    prop:value=move || category.get()
                    on:input=move |ev| set_category.set(event_target_value(&ev))
                />
            </div>

            <div class="form-row">
                <label>"Description"</label>
                <textarea
                    prop:value=move || description.get()
                    on:input=move |ev| set_description.set(event_target_value(&ev))
                ></textarea>
            </div>

            <Show when=move || editing.is_none()>
                <div class="form-row">
                    <label>"Initial stock"</label>
                    <input
                        type="number"
                        min="1"
                        prop:value=move || stock.get()
                        on:input=move |ev| set_stock.set(event_target_value(&ev))
                    />
                </div>
            </Show>

            <Show when=move || editing.is_some()>
                <div class="form-row checkbox-row">
                    <label>
                        <input
                            type="checkbox"
                            prop:checked=move || available.get()
                            on:change=move |ev| set_available.set(event_target_checked(&ev))
                        />
                        "Open for loan"
                    </label>
                </div>
            </Show>

            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}

            <div class="form-actions">
                <button type="submit" class="btn primary" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Saving..." } else { "Save" }}
                </button>
                <button type="button" class="btn secondary" on:click=move |_| on_close.run(())>
                    "Cancel"
                </button>
            </div>
        </form>
    }
}
