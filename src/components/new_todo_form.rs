//! New Todo Form Component
//!
//! Owner selector and title input. Fields are left as typed after a submit.

use leptos::html;
use leptos::prelude::*;

use crate::context::use_app_context;
use crate::models::SubmitForm;

#[component]
pub fn NewTodoForm() -> impl IntoView {
    let ctx = use_app_context();
    let user_ref = NodeRef::<html::Select>::new();
    let todo_ref = NodeRef::<html::Input>::new();

    let users = move || {
        ctx.version.track();
        ctx.sync().user_options()
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = SubmitForm {
            user: user_ref.get().map(|select| select.value()).unwrap_or_default(),
            todo: todo_ref.get().map(|input| input.value()).unwrap_or_default(),
        };
        ctx.submit(form);
    };

    view! {
        <form id="form" class="new-todo-form" on:submit=on_submit>
            <select id="user-todo" name="user" required node_ref=user_ref>
                <option value="" disabled selected>"Select user"</option>
                <For
                    each=users
                    key=|user| user.id
                    children=|user| view! { <option value=user.id.to_string()>{user.name}</option> }
                />
            </select>
            <input type="text" name="todo" placeholder="New todo" required node_ref=todo_ref />
            <button type="submit">"Add"</button>
        </form>
    }
}
