//! Todo List Component
//!
//! Keyed list of rendered rows. Change and click events are delegated here
//! and turned into `ItemEvent`s from the row's `data-id` tag.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::board::ItemEvent;
use crate::components::TodoRow;
use crate::context::use_app_context;

/// Event target and the `data-id` of the row containing it, if any
fn row_target(ev: &web_sys::Event) -> Option<(web_sys::Element, Option<String>)> {
    let target = ev.target()?.dyn_into::<web_sys::Element>().ok()?;
    let tag = target
        .closest("li[data-id]")
        .ok()
        .flatten()
        .and_then(|row| row.get_attribute("data-id"));
    Some((target, tag))
}

#[component]
pub fn TodoList() -> impl IntoView {
    let ctx = use_app_context();

    let rows = move || {
        ctx.version.track();
        ctx.sync().items()
    };

    let on_change = move |ev: web_sys::Event| {
        let Some((target, tag)) = row_target(&ev) else { return };
        let checked = target
            .dyn_ref::<web_sys::HtmlInputElement>()
            .map(|input| input.checked());
        if let Some(event) = ItemEvent::from_change(tag.as_deref(), checked) {
            ctx.dispatch(event);
        }
    };

    let on_click = move |ev: web_sys::MouseEvent| {
        let Some((target, tag)) = row_target(&ev) else { return };
        let on_close = matches!(target.closest(".close"), Ok(Some(_)));
        if let Some(event) = ItemEvent::from_click(tag.as_deref(), on_close) {
            ctx.dispatch(event);
        }
    };

    view! {
        <ul id="todo-list" class="todo-list" on:change=on_change on:click=on_click>
            <For
                each=rows
                // Revision changes only when a row is rebuilt, so toggles keep their node
                key=|item| (item.id, item.revision)
                children=move |item| view! { <TodoRow item=item /> }
            />
        </ul>
    }
}
