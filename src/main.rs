//! Lenddesk Frontend Entry Point

mod api;
mod app;
mod cache;
mod components;
mod config;
mod context;
mod models;
mod push;
mod stats;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
