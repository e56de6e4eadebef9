//! Items Page
//!
//! Item card grid with a modal create/edit form.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::context::use_app_context;
use crate::models::Item;
use crate::store::{use_app_store, AppStateStoreFields};

use super::{ItemCard, ItemForm};

/// Modal state: closed, create, or edit with the record preloaded.
#[derive(Clone, PartialEq)]
enum ModalState {
    Closed,
    Create,
    Edit(Item),
}

#[component]
pub fn ItemsPage() -> impl IntoView {
    let ctx = use_app_context();
    let state = use_app_store();

    let (modal, set_modal) = signal(ModalState::Closed);

    let loading = move || ctx.items_load.get().is_loading();
    let failure = move || ctx.items_load.get().error().map(str::to_owned);

    // Edit opens on a fresh detail fetch so a stale grid entry cannot seed
    // the form.
    let on_edit = move |id: u32| {
        spawn_local(async move {
            match api::get_item(id).await {
                Ok(item) => set_modal.set(ModalState::Edit(item)),
                Err(err) => ctx.notify_error(format!("Could not load item: {err}")),
            }
        });
    };

    view! {
        <div class="page items-page">
            <header class="page-header">
                <div>
                    <h1>"Items"</h1>
                    <p>"Register and manage loanable items"</p>
                </div>
                <button class="btn primary" on:click=move |_| set_modal.set(ModalState::Create)>
                    "Register item"
                </button>
            </header>

            <Show when=move || loading()>
                <p class="loading-hint">"Loading..."</p>
            </Show>

            {move || failure().map(|message| view! {
                <div class="fetch-error">
                    <p>{format!("Could not load items: {message}")}</p>
                    <button class="btn secondary" on:click=move |_| ctx.reload()>
                        "Retry"
                    </button>
                </div>
            })}

            <Show when=move || !loading() && failure().is_none()>
                <Show
                    when=move || !state.items().get().is_empty()
                    fallback=|| view! { <p class="empty-hint">"No items registered yet."</p> }
                >
                    <div class="item-grid">
                        <For
                            each=move || state.items().get()
                            key=|item| (item.id, item.updated_at, item.stock, item.available)
                            children=move |item| view! { <ItemCard item=item on_edit=on_edit /> }
                        />
                    </div>
                </Show>
            </Show>

            {move || {
                let target = match modal.get() {
                    ModalState::Closed => return None,
                    ModalState::Create => None,
                    ModalState::Edit(item) => Some(item),
                };
                Some(view! {
                    <div class="modal-backdrop" on:click=move |_| set_modal.set(ModalState::Closed)>
                        <div class="modal" on:click=|ev| ev.stop_propagation()>
                            <ItemForm
                                target=target
                                on_close=move |()| set_modal.set(ModalState::Closed)
                            />
                        </div>
                    </div>
                })
            }}
        </div>
    }
}
