//! Rendered List
//!
//! Identity index of the rendered todo rows, newest first. Each row is tagged
//! with its todo id; events carry only that tag and are routed through the
//! index. A row's listeners are detached while its delete is in flight and
//! the row is dropped once the delete is confirmed.

use std::collections::{HashMap, VecDeque};

use crate::models::{Todo, TodoId};

/// One rendered todo row
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedItem {
    pub id: TodoId,
    pub title: String,
    /// None when the owner could not be resolved
    pub owner: Option<String>,
    pub completed: bool,
    /// Bumped every time the row is (re)built; part of the view key
    pub revision: u64,
}

impl RenderedItem {
    pub fn new(todo: Todo, owner: Option<String>) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            owner,
            completed: todo.completed,
            revision: 0,
        }
    }

    /// Value of the row's `data-id` attribute
    pub fn tag(&self) -> String {
        self.id.to_string()
    }
}

/// Listeners registered on a row: checkbox change and dismiss click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listeners {
    pub change: bool,
    pub click: bool,
}

impl Listeners {
    fn attached() -> Self {
        Self { change: true, click: true }
    }

    fn detached() -> Self {
        Self { change: false, click: false }
    }
}

/// A gesture on a rendered row, identified by the row tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEvent {
    Toggle { id: TodoId, checked: bool },
    Dismiss { id: TodoId },
}

impl ItemEvent {
    pub fn id(&self) -> TodoId {
        match self {
            ItemEvent::Toggle { id, .. } | ItemEvent::Dismiss { id } => *id,
        }
    }

    /// A `change` bubbling up to the list. Only checkboxes inside a tagged
    /// row produce an event.
    pub fn from_change(row_tag: Option<&str>, checked: Option<bool>) -> Option<Self> {
        let id = parse_tag(row_tag?)?;
        Some(ItemEvent::Toggle { id, checked: checked? })
    }

    /// A `click` bubbling up to the list. Only clicks on the close glyph
    /// dismiss; clicks on the checkbox or text are ignored.
    pub fn from_click(row_tag: Option<&str>, on_close: bool) -> Option<Self> {
        if !on_close {
            return None;
        }
        parse_tag(row_tag?).map(|id| ItemEvent::Dismiss { id })
    }
}

fn parse_tag(tag: &str) -> Option<TodoId> {
    tag.trim().parse().ok()
}

#[derive(Debug, Clone)]
struct Slot {
    item: RenderedItem,
    listeners: Listeners,
}

#[derive(Debug, Clone, Default)]
pub struct RenderedList {
    order: VecDeque<TodoId>,
    slots: HashMap<TodoId, Slot>,
    next_revision: u64,
}

impl RenderedList {
    #[cfg(test)]
    pub fn get(&self, id: TodoId) -> Option<&RenderedItem> {
        self.slots.get(&id).map(|slot| &slot.item)
    }

    /// Rows in display order, top first
    pub fn items(&self) -> impl Iterator<Item = &RenderedItem> {
        self.order.iter().filter_map(|id| self.slots.get(id)).map(|slot| &slot.item)
    }

    /// Insert a row at the top with fresh listeners.
    /// A row already carrying the same id is replaced and returned.
    pub fn prepend(&mut self, mut item: RenderedItem) -> Option<RenderedItem> {
        let replaced = self.remove(item.id);
        self.next_revision += 1;
        item.revision = self.next_revision;
        self.order.push_front(item.id);
        self.slots.insert(
            item.id,
            Slot {
                item,
                listeners: Listeners::attached(),
            },
        );
        replaced
    }

    /// Detach both listeners; the row stays visible. Returns false if the
    /// row is unknown or already detached.
    pub fn detach(&mut self, id: TodoId) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) if slot.listeners != Listeners::detached() => {
                slot.listeners = Listeners::detached();
                true
            }
            _ => false,
        }
    }

    /// Re-register the listeners of a detached row
    pub fn reattach(&mut self, id: TodoId) {
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.listeners = Listeners::attached();
        }
    }

    /// Drop the row from the list
    pub fn remove(&mut self, id: TodoId) -> Option<RenderedItem> {
        let slot = self.slots.remove(&id)?;
        self.order.retain(|other| *other != id);
        Some(slot.item)
    }

    pub fn listeners(&self, id: TodoId) -> Option<Listeners> {
        self.slots.get(&id).map(|slot| slot.listeners)
    }

    /// Whether a live listener exists for the event
    pub fn accepts(&self, event: &ItemEvent) -> bool {
        match (self.listeners(event.id()), event) {
            (Some(listeners), ItemEvent::Toggle { .. }) => listeners.change,
            (Some(listeners), ItemEvent::Dismiss { .. }) => listeners.click,
            (None, _) => false,
        }
    }

    /// Record the checkbox state of a row. Returns false for unknown ids.
    pub fn set_checked(&mut self, id: TodoId, checked: bool) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.item.completed = checked;
                true
            }
            None => false,
        }
    }
}
