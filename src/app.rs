//! Todo Board App
//!
//! Builds the synchronizer, provides it via context and starts the initial load.

use leptos::prelude::*;

use crate::api::HttpTodoApi;
use crate::components::{NewTodoForm, TodoList};
use crate::config::ClientConfig;
use crate::context::AppContext;
use crate::notify::AlertNotifier;
use crate::sync::Synchronizer;

#[component]
pub fn App() -> impl IntoView {
    let config = ClientConfig::from_window();
    log::info!("[APP] remote store at {}", config.base_url);

    let ctx = AppContext::new(Synchronizer::new(HttpTodoApi::new(config), AlertNotifier));
    provide_context(ctx);

    // Load todos and users once the page is mounted
    Effect::new(move |_| ctx.initialize());

    view! {
        <main class="app">
            <h1>"Todo list"</h1>
            <NewTodoForm />
            <TodoList />
            <p class="item-count">{move || {
                ctx.version.track();
                format!("{} todos", ctx.sync().items().len())
            }}</p>
        </main>
    }
}
