use crate::item_store::ItemStore;
use crate::model::normalize_for_search;
use crate::navigation::NavigationIndex;
use crate::observable::{Observable, SubscriptionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Forward,
    Backward,
}

#[derive(Debug)]
pub struct ActivationController {
    active: Observable<Option<String>>,
    type_ahead: String,
}

impl Default for ActivationController {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivationController {
    pub fn new() -> Self {
        Self::with_active(Observable::new(None))
    }

    pub fn with_active(active: Observable<Option<String>>) -> Self {
        Self {
            active,
            type_ahead: String::new(),
        }
    }

    pub fn active_identity(&self) -> Option<&str> {
        self.active.get().as_deref()
    }

    pub fn is_activated(&self, identity: &str) -> bool {
        self.active_identity() == Some(identity)
    }

    pub fn nav_cursor(&self, store: &ItemStore, nav: &NavigationIndex) -> Option<usize> {
        let position = store.position(self.active_identity()?)?;
        nav.cursor_of(position)
    }

    pub fn activate(&mut self, store: &ItemStore, identity: &str) -> bool {
        match store.get(identity) {
            Some(item) if !item.disabled => self.active.set(Some(item.identity.clone())),
            Some(_) => {
                tracing::debug!(identity, "ignoring activation of disabled item");
                false
            }
            None => {
                tracing::debug!(identity, "ignoring activation of unknown item");
                false
            }
        }
    }

    pub fn deactivate(&mut self) -> bool {
        self.active.set(None)
    }

    pub fn release(&mut self, identity: &str) -> bool {
        if self.is_activated(identity) {
            return self.active.set(None);
        }
        false
    }

    pub fn activate_first(&mut self, store: &ItemStore, nav: &NavigationIndex) -> bool {
        self.activate_cursor(store, nav, 0)
    }

    pub fn activate_last(&mut self, store: &ItemStore, nav: &NavigationIndex) -> bool {
        match nav.len().checked_sub(1) {
            Some(last) => self.activate_cursor(store, nav, last),
            None => false,
        }
    }

    pub fn activate_next(&mut self, store: &ItemStore, nav: &NavigationIndex) -> bool {
        self.step(store, nav, Step::Forward)
    }

    pub fn activate_prev(&mut self, store: &ItemStore, nav: &NavigationIndex) -> bool {
        self.step(store, nav, Step::Backward)
    }

    /// A buffer of one repeated character cycles through items starting with
    /// it; a longer prefix is matched starting at the active item itself.
    pub fn activate_by_key(&mut self, store: &ItemStore, nav: &NavigationIndex, key: char) -> bool {
        self.type_ahead.push(key);
        if nav.is_empty() {
            return false;
        }

        let buffer = normalize_for_search(&self.type_ahead);
        let mut chars = buffer.chars();
        let repeated = match chars.next() {
            Some(first) => chars.all(|c| c == first),
            None => return false,
        };
        let (needle, offset) = if repeated {
            (buffer.chars().take(1).collect::<String>(), 1)
        } else {
            (buffer, 0)
        };

        let len = nav.len();
        let start = match self.nav_cursor(store, nav) {
            Some(cursor) => cursor + offset,
            None => 0,
        };

        let found = (0..len)
            .map(|step| (start + step) % len)
            .find(|&cursor| {
                nav.position_at(cursor)
                    .and_then(|position| store.at(position))
                    .is_some_and(|item| item.searchable().starts_with(&needle))
            });

        match found {
            Some(cursor) => self.activate_cursor(store, nav, cursor),
            None => false,
        }
    }

    pub fn reset_type_ahead(&mut self) {
        self.type_ahead.clear();
    }

    pub fn type_ahead_buffer(&self) -> &str {
        &self.type_ahead
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Option<String>) + 'static,
    {
        self.active.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.active.unsubscribe(id)
    }

    fn step(&mut self, store: &ItemStore, nav: &NavigationIndex, step: Step) -> bool {
        let len = nav.len();
        if len == 0 {
            return false;
        }

        let Some(cursor) = self.nav_cursor(store, nav) else {
            return match step {
                Step::Forward => self.activate_first(store, nav),
                Step::Backward => self.activate_last(store, nav),
            };
        };

        let target = match step {
            Step::Forward => (cursor + 1) % len,
            Step::Backward => (cursor + len - 1) % len,
        };
        self.activate_cursor(store, nav, target)
    }

    fn activate_cursor(&mut self, store: &ItemStore, nav: &NavigationIndex, cursor: usize) -> bool {
        let Some(item) = nav.position_at(cursor).and_then(|position| store.at(position)) else {
            return false;
        };
        let identity = item.identity.clone();
        self.activate(store, &identity)
    }
}
