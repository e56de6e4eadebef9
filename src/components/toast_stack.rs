//! Toast Stack Component
//!
//! Renders the active notices from the app context.

use leptos::prelude::*;

use crate::context::{use_app_context, NoticeKind};

#[component]
pub fn ToastStack() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <div class="toast-stack">
            <For
                each=move || ctx.notices.get()
                key=|notice| notice.id
                children=move |notice| {
                    let class = match notice.kind {
                        NoticeKind::Success => "toast success",
                        NoticeKind::Error => "toast error",
                        NoticeKind::Info => "toast info",
                    };
                    let id = notice.id;
                    view! {
                        <div class=class>
                            <span class="toast-text">{notice.text.clone()}</span>
                            <button class="toast-dismiss" on:click=move |_| ctx.dismiss(id)>
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
