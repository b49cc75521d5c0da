//! Observers run synchronously inside [`Observable::set`], and only when the
//! value changes.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<T> = Box<dyn FnMut(&T)>;

pub struct Observable<T> {
    value: T,
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer<T>)>,
}

impl<T: PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            next_id: 0,
            observers: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Stores `value` and notifies observers. Returns whether the value changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        for (_, observer) in &mut self.observers {
            observer(&self.value);
        }
        true
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

/// Source of the cells an engine publishes. Hosts with their own reactive
/// layer implement this to wire observers in at construction time.
pub trait ObservableFactory {
    fn pending(&self, initial: bool) -> Observable<bool> {
        Observable::new(initial)
    }

    fn active(&self, initial: Option<String>) -> Observable<Option<String>> {
        Observable::new(initial)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlainObservables;

impl ObservableFactory for PlainObservables {}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("observers", &self.observers.len())
            .finish()
    }
}
