//! View Synchronizer
//!
//! Owns the session collections and the rendered list, and routes row and
//! form gestures to the remote store. Rows are patched one at a time; nothing
//! re-renders the whole list after startup.

use std::cell::RefCell;
use std::rc::Rc;

use futures_util::future::join;

use crate::api::{ApiResult, TodoApi};
use crate::board::{ItemEvent, RenderedItem, RenderedList};
use crate::error::{SyncError, SyncResult};
use crate::models::{SubmitForm, Todo, TodoDraft, TodoId, User, UserId};
use crate::notify::Notifier;
use crate::session::SessionState;

#[derive(Default)]
struct ViewState {
    session: SessionState,
    list: RenderedList,
    initialized: bool,
}

struct Inner<A, N> {
    api: A,
    notifier: N,
    state: RefCell<ViewState>,
    observer: RefCell<Option<Rc<dyn Fn()>>>,
}

/// Cheap to clone; clones share the same state
pub struct Synchronizer<A, N> {
    inner: Rc<Inner<A, N>>,
}

impl<A, N> Clone for Synchronizer<A, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A: TodoApi, N: Notifier> Synchronizer<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            inner: Rc::new(Inner {
                api,
                notifier,
                state: RefCell::new(ViewState::default()),
                observer: RefCell::new(None),
            }),
        }
    }

    #[cfg(test)]
    pub fn api(&self) -> &A {
        &self.inner.api
    }

    #[cfg(test)]
    pub fn notifier(&self) -> &N {
        &self.inner.notifier
    }

    /// Called after every change to the rendered rows or user options
    pub fn set_observer(&self, observer: impl Fn() + 'static) {
        *self.inner.observer.borrow_mut() = Some(Rc::new(observer));
    }

    // ========================
    // Snapshots
    // ========================

    /// Rendered rows, top first
    pub fn items(&self) -> Vec<RenderedItem> {
        self.inner.state.borrow().list.items().cloned().collect()
    }

    #[cfg(test)]
    pub fn item(&self, id: TodoId) -> Option<RenderedItem> {
        self.inner.state.borrow().list.get(id).cloned()
    }

    /// Users in the order received, for the owner selector
    pub fn user_options(&self) -> Vec<User> {
        self.inner
            .state
            .borrow()
            .session
            .users()
            .map(<[User]>::to_vec)
            .unwrap_or_default()
    }

    /// Todos as fetched at startup
    #[cfg(test)]
    pub fn session_todos(&self) -> Option<Vec<Todo>> {
        self.inner.state.borrow().session.todos().map(<[Todo]>::to_vec)
    }

    #[cfg(test)]
    pub fn accepts(&self, event: &ItemEvent) -> bool {
        self.inner.state.borrow().list.accepts(event)
    }

    // ========================
    // Operations
    // ========================

    /// Fetch todos and users together, then paint both once
    pub async fn initialize(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.initialized {
                log::warn!("[SYNC] initialize called twice, ignoring");
                return;
            }
            state.initialized = true;
        }

        let (todos, users) = join(self.inner.api.list_todos(), self.inner.api.list_users()).await;
        let todos = self.settle(todos);
        let users = self.settle(users);

        let users_loaded = {
            let mut state = self.inner.state.borrow_mut();
            state.session = SessionState::new(todos.clone(), users);
            log::info!(
                "[SYNC] loaded {} todos, {} users",
                state.session.todos().map_or(0, <[Todo]>::len),
                state.session.users().map_or(0, <[User]>::len)
            );
            state.session.users_loaded()
        };

        for todo in todos.into_iter().flatten() {
            match self.insert(todo) {
                Err(e) if users_loaded => self.report(&e),
                Err(e) => log::debug!("[SYNC] {} (users not loaded)", e),
                Ok(()) => {}
            }
        }
        self.changed();
    }

    /// Paint one todo at the top of the list
    ///
    /// The row is inserted even when its owner is unknown; the lookup
    /// failure is returned so the caller can report it.
    pub fn render(&self, todo: Todo) -> SyncResult<()> {
        let result = self.insert(todo);
        self.changed();
        result
    }

    /// Dispatch a row gesture
    pub async fn handle(&self, event: ItemEvent) {
        match event {
            ItemEvent::Toggle { id, checked } => self.on_toggle(id, checked).await,
            ItemEvent::Dismiss { id } => self.on_dismiss(id).await,
        }
    }

    /// Checkbox changed. The row keeps the user's state even if the update fails.
    pub async fn on_toggle(&self, id: TodoId, checked: bool) {
        {
            let mut state = self.inner.state.borrow_mut();
            if !state.list.accepts(&ItemEvent::Toggle { id, checked }) {
                log::debug!("[SYNC] no change listener for todo {}", id);
                return;
            }
            state.list.set_checked(id, checked);
        }
        if let Err(e) = self.inner.api.set_completed(id, checked).await {
            self.report(&e.into());
        }
    }

    /// Dismiss clicked. The row's listeners are detached while the delete is
    /// in flight; the row goes away only once the server confirms, otherwise
    /// the listeners come back.
    pub async fn on_dismiss(&self, id: TodoId) {
        if !self.inner.state.borrow_mut().list.detach(id) {
            log::debug!("[SYNC] no click listener for todo {}", id);
            return;
        }
        match self.inner.api.delete_todo(id).await {
            Ok(()) => {
                let removed = self.inner.state.borrow_mut().list.remove(id);
                if removed.is_some() {
                    log::info!("[SYNC] removed todo {}", id);
                    self.changed();
                }
            }
            Err(e) => {
                self.inner.state.borrow_mut().list.reattach(id);
                self.report(&e.into());
            }
        }
    }

    /// New-todo form submitted
    pub async fn on_submit(&self, form: SubmitForm) {
        if let Err(e) = self.submit(form).await {
            self.report(&e);
        }
    }

    async fn submit(&self, form: SubmitForm) -> SyncResult<TodoId> {
        let user_id: UserId = form
            .user
            .trim()
            .parse()
            .map_err(|_| SyncError::InvalidSelection(form.user.clone()))?;
        let draft = TodoDraft::new(user_id, form.todo);
        let todo = self.inner.api.create_todo(&draft).await?;
        let id = todo.id;
        log::info!("[SYNC] created todo {}", id);
        self.render(todo)?;
        Ok(id)
    }

    // ========================
    // Internals
    // ========================

    /// Prepend a row. A row with the same id is replaced and the user is told.
    fn insert(&self, todo: Todo) -> SyncResult<()> {
        let id = todo.id;
        let (owner, replaced) = {
            let mut state = self.inner.state.borrow_mut();
            let owner = state.session.user_name(todo.user_id).map(str::to_string);
            let replaced = state.list.prepend(RenderedItem::new(todo, owner.as_ref().ok().cloned()));
            (owner, replaced)
        };
        if let Some(replaced) = replaced {
            log::warn!("[SYNC] todo {} ({:?}) was already rendered, replacing it", id, replaced.title);
            self.report(&SyncError::DuplicateId(id));
        }
        owner.map(|_| ())
    }

    fn settle<T>(&self, result: ApiResult<T>) -> Option<T> {
        result.map_err(|e| self.report(&e.into())).ok()
    }

    fn report(&self, err: &SyncError) {
        log::error!("[SYNC] {}", err);
        self.inner.notifier.notify(&err.to_string());
    }

    fn changed(&self) {
        let observer = self.inner.observer.borrow().clone();
        if let Some(observer) = observer {
            observer();
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use std::cell::Cell;

    // ========================
    // Fakes
    // ========================

    struct FakeApi {
        todos: ApiResult<Vec<Todo>>,
        users: ApiResult<Vec<User>>,
        next_id: Cell<TodoId>,
        /// Hand out this id on every create, like the demo service does
        fixed_id: Cell<Option<TodoId>>,
        update_status: Cell<Option<u16>>,
        delete_status: Cell<Option<u16>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn new(todos: ApiResult<Vec<Todo>>, users: ApiResult<Vec<User>>) -> Self {
            Self {
                todos,
                users,
                next_id: Cell::new(201),
                fixed_id: Cell::new(None),
                update_status: Cell::new(None),
                delete_status: Cell::new(None),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn record(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }
    }

    fn rejected(operation: &'static str, status: Option<u16>) -> ApiResult<()> {
        match status {
            Some(status) => Err(ApiError::ServerRejected { operation, status }),
            None => Ok(()),
        }
    }

    #[async_trait(?Send)]
    impl TodoApi for FakeApi {
        async fn list_todos(&self) -> ApiResult<Vec<Todo>> {
            self.record("list_todos".to_string());
            self.todos.clone()
        }

        async fn list_users(&self) -> ApiResult<Vec<User>> {
            self.record("list_users".to_string());
            self.users.clone()
        }

        async fn create_todo(&self, draft: &TodoDraft) -> ApiResult<Todo> {
            self.record(format!("create {}", draft.title));
            let id = self.fixed_id.get().unwrap_or_else(|| {
                let id = self.next_id.get();
                self.next_id.set(id + 1);
                id
            });
            Ok(Todo {
                id,
                user_id: draft.user_id,
                title: draft.title.clone(),
                completed: draft.completed,
            })
        }

        async fn set_completed(&self, id: TodoId, completed: bool) -> ApiResult<()> {
            self.record(format!("patch {} {}", id, completed));
            rejected("update todo", self.update_status.get())
        }

        async fn delete_todo(&self, id: TodoId) -> ApiResult<()> {
            self.record(format!("delete {}", id));
            // Stay in flight for one poll so overlapping gestures can run
            tokio::task::yield_now().await;
            rejected("delete todo", self.delete_status.get())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    type TestSync = Synchronizer<FakeApi, RecordingNotifier>;

    fn todo(id: TodoId, user_id: UserId, title: &str, completed: bool) -> Todo {
        Todo { id, user_id, title: title.to_string(), completed }
    }

    fn user(id: UserId, name: &str) -> User {
        User { id, name: name.to_string() }
    }

    fn sync_with(todos: ApiResult<Vec<Todo>>, users: ApiResult<Vec<User>>) -> TestSync {
        Synchronizer::new(FakeApi::new(todos, users), RecordingNotifier::default())
    }

    async fn started(todos: Vec<Todo>, users: Vec<User>) -> TestSync {
        let sync = sync_with(Ok(todos), Ok(users));
        sync.initialize().await;
        sync
    }

    fn alerts(sync: &TestSync) -> Vec<String> {
        sync.notifier().messages.borrow().clone()
    }

    fn ids(sync: &TestSync) -> Vec<TodoId> {
        sync.items().iter().map(|item| item.id).collect()
    }

    fn form(user: &str, title: &str) -> SubmitForm {
        SubmitForm { user: user.to_string(), todo: title.to_string() }
    }

    // ========================
    // Startup
    // ========================

    #[tokio::test]
    async fn test_initial_render_shows_title_and_owner() {
        let sync = started(vec![todo(1, 1, "A", false)], vec![user(1, "Leanne")]).await;

        let items = sync.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "A");
        assert_eq!(items[0].owner.as_deref(), Some("Leanne"));
        assert!(!items[0].completed);
        assert_eq!(items[0].tag(), "1");
        assert_eq!(sync.user_options(), vec![user(1, "Leanne")]);
        assert!(alerts(&sync).is_empty());
    }

    #[tokio::test]
    async fn test_initial_render_is_newest_first() {
        let sync = started(
            vec![todo(1, 1, "A", false), todo(2, 2, "B", true), todo(3, 1, "C", false)],
            vec![user(2, "Ervin"), user(1, "Leanne")],
        )
        .await;

        assert_eq!(ids(&sync), vec![3, 2, 1]);
        let names: Vec<_> = sync.user_options().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Ervin", "Leanne"]);
        assert!(sync.item(2).unwrap().completed);
    }

    #[tokio::test]
    async fn test_failed_todo_fetch_still_loads_users() {
        let sync = sync_with(
            Err(ApiError::Network("offline".to_string())),
            Ok(vec![user(1, "Leanne")]),
        );
        sync.initialize().await;

        assert!(sync.items().is_empty());
        assert_eq!(sync.user_options().len(), 1);
        assert_eq!(alerts(&sync), vec!["Network error: offline".to_string()]);
        assert!(sync.session_todos().is_none());
    }

    #[tokio::test]
    async fn test_failed_user_fetch_renders_without_owners() {
        let sync = sync_with(
            Ok(vec![todo(1, 1, "A", false), todo(2, 1, "B", false)]),
            Err(ApiError::ServerRejected { operation: "load users", status: 503 }),
        );
        sync.initialize().await;

        assert_eq!(ids(&sync), vec![2, 1]);
        assert!(sync.items().iter().all(|item| item.owner.is_none()));
        assert_eq!(alerts(&sync).len(), 1);
        assert!(sync.user_options().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_owner_is_reported() {
        let sync = started(vec![todo(1, 9, "A", false)], vec![user(1, "Leanne")]).await;

        assert_eq!(sync.item(1).unwrap().owner, None);
        assert_eq!(alerts(&sync), vec![SyncError::Lookup(9).to_string()]);
    }

    #[tokio::test]
    async fn test_initialize_runs_once() {
        let sync = started(vec![todo(1, 1, "A", false)], vec![user(1, "Leanne")]).await;
        sync.initialize().await;

        assert_eq!(sync.items().len(), 1);
        assert_eq!(sync.api().calls(), vec!["list_todos", "list_users"]);
    }

    // ========================
    // Submit
    // ========================

    #[tokio::test]
    async fn test_submit_adds_one_item_on_top() {
        let sync = started(vec![todo(1, 1, "A", false)], vec![user(1, "Leanne")]).await;

        sync.on_submit(form("1", "New")).await;

        assert_eq!(ids(&sync), vec![201, 1]);
        let top = &sync.items()[0];
        assert_eq!(top.tag(), "201");
        assert_eq!(top.title, "New");
        assert_eq!(top.owner.as_deref(), Some("Leanne"));
        assert!(!top.completed);
        assert!(alerts(&sync).is_empty());
    }

    #[tokio::test]
    async fn test_fetched_plus_submitted_items_have_unique_tags() {
        let sync = started(
            vec![todo(1, 1, "A", false), todo(2, 1, "B", false)],
            vec![user(1, "Leanne")],
        )
        .await;

        for title in ["x", "y", "z"] {
            sync.on_submit(form("1", title)).await;
        }

        let mut tags: Vec<String> = sync.items().iter().map(RenderedItem::tag).collect();
        assert_eq!(tags.len(), 5);
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), 5);
        assert_eq!(ids(&sync), vec![203, 202, 201, 2, 1]);
    }

    #[tokio::test]
    async fn test_invalid_selection_skips_request() {
        let sync = started(vec![], vec![user(1, "Leanne")]).await;

        sync.on_submit(form("", "New")).await;

        assert!(sync.items().is_empty());
        assert_eq!(alerts(&sync).len(), 1);
        assert!(!sync.api().calls().iter().any(|c| c.starts_with("create")));
    }

    #[tokio::test]
    async fn test_session_todos_stay_as_fetched() {
        let sync = started(vec![todo(1, 1, "A", false)], vec![user(1, "Leanne")]).await;

        sync.on_submit(form("1", "New")).await;
        sync.on_dismiss(1).await;

        assert_eq!(sync.session_todos(), Some(vec![todo(1, 1, "A", false)]));
        assert_eq!(ids(&sync), vec![201]);
    }

    // ========================
    // Toggle / dismiss
    // ========================

    #[tokio::test]
    async fn test_failed_toggle_keeps_user_state() {
        let sync = started(vec![todo(1, 1, "A", false)], vec![user(1, "Leanne")]).await;
        sync.api().update_status.set(Some(500));

        sync.handle(ItemEvent::Toggle { id: 1, checked: true }).await;

        assert!(sync.item(1).unwrap().completed);
        assert_eq!(alerts(&sync).len(), 1);
        assert!(sync.api().calls().contains(&"patch 1 true".to_string()));
    }

    #[tokio::test]
    async fn test_toggle_does_not_rerender() {
        let sync = started(vec![todo(1, 1, "A", false)], vec![user(1, "Leanne")]).await;
        let renders = Rc::new(Cell::new(0));
        let counter = Rc::clone(&renders);
        sync.set_observer(move || counter.set(counter.get() + 1));
        let revision = sync.item(1).unwrap().revision;

        sync.on_toggle(1, true).await;

        assert_eq!(renders.get(), 0);
        assert_eq!(sync.item(1).unwrap().revision, revision);
        assert!(alerts(&sync).is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_dismiss_removes_and_detaches() {
        let sync = started(
            vec![todo(1, 1, "A", false), todo(2, 1, "B", false)],
            vec![user(1, "Leanne")],
        )
        .await;
        let renders = Rc::new(Cell::new(0));
        let counter = Rc::clone(&renders);
        sync.set_observer(move || counter.set(counter.get() + 1));

        sync.handle(ItemEvent::Dismiss { id: 1 }).await;
        assert_eq!(ids(&sync), vec![2]);
        assert_eq!(renders.get(), 1);

        let calls_before = sync.api().calls().len();
        assert!(!sync.accepts(&ItemEvent::Toggle { id: 1, checked: true }));
        sync.handle(ItemEvent::Toggle { id: 1, checked: true }).await;
        sync.handle(ItemEvent::Dismiss { id: 1 }).await;
        assert_eq!(sync.api().calls().len(), calls_before);
        assert!(alerts(&sync).is_empty());
    }

    #[tokio::test]
    async fn test_rejected_dismiss_keeps_item() {
        let sync = started(vec![todo(1, 1, "A", false)], vec![user(1, "Leanne")]).await;
        sync.api().delete_status.set(Some(500));
        let before = sync.items();

        sync.on_dismiss(1).await;

        assert_eq!(sync.items(), before);
        assert_eq!(alerts(&sync).len(), 1);
        assert!(sync.accepts(&ItemEvent::Dismiss { id: 1 }));
    }

    #[tokio::test]
    async fn test_gestures_refused_while_delete_in_flight() {
        let sync = started(vec![todo(1, 1, "A", false)], vec![user(1, "Leanne")]).await;

        join(
            sync.on_dismiss(1),
            join(sync.on_dismiss(1), sync.on_toggle(1, true)),
        )
        .await;

        assert_eq!(sync.api().calls().iter().filter(|c| c.starts_with("delete")).count(), 1);
        assert!(!sync.api().calls().iter().any(|c| c.starts_with("patch")));
        assert!(sync.items().is_empty());
        assert!(alerts(&sync).is_empty());
    }

    #[tokio::test]
    async fn test_rejected_dismiss_reattaches_listeners() {
        let sync = started(vec![todo(1, 1, "A", false)], vec![user(1, "Leanne")]).await;
        sync.api().delete_status.set(Some(503));

        sync.on_dismiss(1).await;
        sync.api().delete_status.set(None);
        sync.on_toggle(1, true).await;
        sync.on_dismiss(1).await;

        assert!(sync.api().calls().contains(&"patch 1 true".to_string()));
        assert!(sync.items().is_empty());
        assert_eq!(alerts(&sync).len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_server_id_replaces_row_and_alerts() {
        let sync = started(vec![todo(1, 1, "A", false)], vec![user(1, "Leanne")]).await;
        sync.api().fixed_id.set(Some(201));

        sync.on_submit(form("1", "first")).await;
        assert!(alerts(&sync).is_empty());
        sync.on_submit(form("1", "second")).await;

        assert_eq!(ids(&sync), vec![201, 1]);
        assert_eq!(sync.item(201).unwrap().title, "second");
        assert_eq!(alerts(&sync), vec![SyncError::DuplicateId(201).to_string()]);
    }

    #[tokio::test]
    async fn test_render_reports_lookup_but_keeps_row() {
        let sync = started(vec![], vec![user(1, "Leanne")]).await;

        let result = sync.render(todo(50, 4, "orphan", true));

        assert_eq!(result, Err(SyncError::Lookup(4)));
        assert_eq!(sync.item(50).unwrap().owner, None);
        assert!(sync.item(50).unwrap().completed);
    }
}
