//! Todo Board Frontend Entry Point

mod api;
mod app;
mod board;
mod components;
mod config;
mod context;
mod error;
mod models;
mod notify;
mod session;
mod sync;

use app::App;
use leptos::prelude::*;
use log::Level;

fn main() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { Level::Debug } else { Level::Info };
    _ = console_log::init_with_level(level);
    mount_to_body(App);
}
