//! Application Context
//!
//! Shared UI state provided via the Leptos context API.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::config::NOTICE_TTL_MS;
use crate::models::{Loadable, RentalStatus};

/// Top-level views, switched by the nav bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Rentals,
    Items,
}

impl Page {
    pub fn label(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Rentals => "Rentals",
            Page::Items => "Items",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// A dismissable toast.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u32,
    pub kind: NoticeKind,
    pub text: String,
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to reload collections from the gateway - read
    pub reload_trigger: ReadSignal<u32>,
    set_reload_trigger: WriteSignal<u32>,
    /// Current page - read
    pub page: ReadSignal<Page>,
    set_page: WriteSignal<Page>,
    /// Status preset applied when jumping to the rentals page - read
    pub rental_preset: ReadSignal<Option<RentalStatus>>,
    set_rental_preset: WriteSignal<Option<RentalStatus>>,
    /// Push-channel connectivity, shown in the nav bar
    pub push_connected: ReadSignal<bool>,
    pub set_push_connected: WriteSignal<bool>,
    /// Outcome of the latest rental list fetch
    pub rentals_load: RwSignal<Loadable>,
    /// Outcome of the latest item list fetch
    pub items_load: RwSignal<Loadable>,
    /// Active toasts - read
    pub notices: ReadSignal<Vec<Notice>>,
    set_notices: WriteSignal<Vec<Notice>>,
    next_notice_id: StoredValue<u32>,
}

impl AppContext {
    pub fn new() -> Self {
        let (reload_trigger, set_reload_trigger) = signal(0u32);
        let (page, set_page) = signal(Page::Dashboard);
        let (rental_preset, set_rental_preset) = signal(None::<RentalStatus>);
        let (push_connected, set_push_connected) = signal(false);
        let (notices, set_notices) = signal(Vec::<Notice>::new());
        Self {
            reload_trigger,
            set_reload_trigger,
            page,
            set_page,
            rental_preset,
            set_rental_preset,
            push_connected,
            set_push_connected,
            rentals_load: RwSignal::new(Loadable::Loading),
            items_load: RwSignal::new(Loadable::Loading),
            notices,
            set_notices,
            next_notice_id: StoredValue::new(0),
        }
    }

    /// Trigger a refetch of both collections.
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    pub fn go(&self, page: Page) {
        self.set_page.set(page);
    }

    /// Jump to the rentals page with a status filter preset (e.g. the
    /// overdue quick action).
    pub fn go_rentals(&self, preset: Option<RentalStatus>) {
        self.set_rental_preset.set(preset);
        self.set_page.set(Page::Rentals);
    }

    pub fn notify_success(&self, text: impl Into<String>) {
        self.push_notice(NoticeKind::Success, text.into());
    }

    pub fn notify_error(&self, text: impl Into<String>) {
        self.push_notice(NoticeKind::Error, text.into());
    }

    pub fn notify_info(&self, text: impl Into<String>) {
        self.push_notice(NoticeKind::Info, text.into());
    }

    pub fn dismiss(&self, id: u32) {
        self.set_notices.update(|list| list.retain(|n| n.id != id));
    }

    fn push_notice(&self, kind: NoticeKind, text: String) {
        let mut id = 0;
        self.next_notice_id.update_value(|next| {
            *next += 1;
            id = *next;
        });
        self.set_notices
            .update(|list| list.push(Notice { id, kind, text }));

        // Self-dismiss; a manual dismiss earlier makes this a no-op.
        let set_notices = self.set_notices;
        Timeout::new(NOTICE_TTL_MS, move || {
            set_notices.update(|list| list.retain(|n| n.id != id));
        })
        .forget();
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
