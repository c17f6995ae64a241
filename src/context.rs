//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::HttpTodoApi;
use crate::board::ItemEvent;
use crate::models::SubmitForm;
use crate::notify::AlertNotifier;
use crate::sync::Synchronizer;

pub type BrowserSync = Synchronizer<HttpTodoApi, AlertNotifier>;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Bumped by the synchronizer whenever rows or options change
    pub version: ReadSignal<u32>,
    sync: StoredValue<BrowserSync, LocalStorage>,
}

impl AppContext {
    /// Wire the synchronizer's change observer to a version signal
    pub fn new(sync: BrowserSync) -> Self {
        let (version, set_version) = signal(0u32);
        sync.set_observer(move || set_version.update(|v| *v += 1));
        Self {
            version,
            sync: StoredValue::new_local(sync),
        }
    }

    pub fn sync(&self) -> BrowserSync {
        self.sync.get_value()
    }

    pub fn initialize(&self) {
        let sync = self.sync();
        spawn_local(async move { sync.initialize().await });
    }

    pub fn dispatch(&self, event: ItemEvent) {
        let sync = self.sync();
        spawn_local(async move { sync.handle(event).await });
    }

    pub fn submit(&self, form: SubmitForm) {
        let sync = self.sync();
        spawn_local(async move { sync.on_submit(form).await });
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
