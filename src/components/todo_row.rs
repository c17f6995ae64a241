//! Todo Row Component
//!
//! One `li` per rendered todo, tagged with `data-id`. The row has no
//! handlers of its own; the list routes events by the tag.

use leptos::prelude::*;

use crate::board::RenderedItem;

#[component]
pub fn TodoRow(item: RenderedItem) -> impl IntoView {
    let tag = item.tag();
    let owner_class = if item.owner.is_some() { "owner" } else { "owner missing" };
    let owner = item.owner.unwrap_or_default();

    view! {
        <li class="todo-item" data-id=tag>
            <input type="checkbox" prop:checked=item.completed />
            <div class="todo-item-inner">
                <p>{item.title}</p>
                <p>"by " <strong class=owner_class>{owner}</strong></p>
            </div>
            <span class="close">"×"</span>
        </li>
    }
}
