//! Mutations only schedule a rebuild; the host runs it by calling
//! [`OptionCollection::flush`] once its current turn is over. Reads that depend
//! on derived state rebuild inline when needed.

use serde::{Deserialize, Serialize};

use crate::activation::ActivationController;
use crate::item_store::ItemStore;
use crate::model::Item;
use crate::navigation::NavigationIndex;
use crate::observable::{ObservableFactory, PlainObservables, SubscriptionId};
use crate::scheduler::RebuildScheduler;
use crate::search::{Matcher, Ranking, SearchIndex};

pub const DEFAULT_SEARCH_THRESHOLD: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationOrder {
    #[default]
    Insertion,
    Explicit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search_threshold: usize,
    pub presentation_order: PresentationOrder,
    pub type_ahead: bool,
    pub ranking: Ranking,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_threshold: DEFAULT_SEARCH_THRESHOLD,
            presentation_order: PresentationOrder::Insertion,
            type_ahead: true,
            ranking: Ranking::Presentation,
        }
    }
}

#[derive(Debug)]
pub struct OptionCollection {
    config: EngineConfig,
    store: ItemStore,
    index: SearchIndex,
    matcher: Matcher,
    nav: NavigationIndex,
    activation: ActivationController,
    scheduler: RebuildScheduler,
    dirty: bool,
}

impl Default for OptionCollection {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl OptionCollection {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_observables(config, &PlainObservables)
    }

    /// Builds the engine with `pending` and the active identity taken from
    /// `factory`, so observers can be attached before the first mutation.
    pub fn with_observables(config: EngineConfig, factory: &dyn ObservableFactory) -> Self {
        let matcher = Matcher::new(config.ranking);
        Self {
            config,
            store: ItemStore::new(),
            index: SearchIndex::default(),
            matcher,
            nav: NavigationIndex::default(),
            activation: ActivationController::with_active(factory.active(None)),
            scheduler: RebuildScheduler::with_pending(factory.pending(false)),
            dirty: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn add(&mut self, identity: &str, value: &str, disabled: bool) {
        if self.store.add(identity, value, disabled) {
            self.invalidate();
        } else {
            tracing::debug!(identity, "duplicate identity ignored");
        }
    }

    pub fn forget(&mut self, identity: &str) {
        if self.store.forget(identity).is_none() {
            return;
        }
        self.activation.release(identity);
        self.invalidate();
    }

    pub fn set_disabled(&mut self, identity: &str, disabled: bool) {
        if !self.store.set_disabled(identity, disabled) {
            return;
        }
        if disabled {
            self.activation.release(identity);
        }
        self.invalidate();
    }

    pub fn set_presentation_order(&mut self, identities: &[String]) {
        if self.config.presentation_order != PresentationOrder::Explicit {
            tracing::warn!("set_presentation_order ignored: engine uses insertion order");
            return;
        }
        if self.store.set_presentation_order(identities) {
            self.invalidate();
        }
    }

    pub fn get(&self, identity: &str) -> Option<&Item> {
        self.store.get(identity)
    }

    pub fn all(&self) -> Vec<Item> {
        self.store.all()
    }

    pub fn size(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn pending(&self) -> bool {
        self.scheduler.pending()
    }

    pub fn flush(&mut self) -> bool {
        let Some(ticket) = self.scheduler.begin() else {
            return false;
        };
        self.ensure_fresh();
        self.scheduler.finish(ticket);
        tracing::debug!(
            items = self.store.len(),
            navigable = self.nav.len(),
            cycle = self.scheduler.completed(),
            "rebuild cycle complete"
        );
        true
    }

    pub fn rebuild_count(&self) -> u64 {
        self.scheduler.completed()
    }

    pub fn on_pending_change<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&bool) + 'static,
    {
        self.scheduler.subscribe(observer)
    }

    pub fn unsubscribe_pending(&mut self, id: SubscriptionId) -> bool {
        self.scheduler.unsubscribe(id)
    }

    pub fn activate(&mut self, identity: &str) {
        self.ensure_fresh();
        self.activation.activate(&self.store, identity);
    }

    pub fn deactivate(&mut self) {
        self.activation.deactivate();
    }

    pub fn is_activated(&self, identity: &str) -> bool {
        self.activation.is_activated(identity)
    }

    pub fn active_identity(&self) -> Option<&str> {
        self.activation.active_identity()
    }

    pub fn active_item(&self) -> Option<&Item> {
        self.store.get(self.activation.active_identity()?)
    }

    pub fn nav_cursor(&mut self) -> Option<usize> {
        self.ensure_fresh();
        self.activation.nav_cursor(&self.store, &self.nav)
    }

    pub fn activate_first(&mut self) {
        self.ensure_fresh();
        self.activation.activate_first(&self.store, &self.nav);
    }

    pub fn activate_last(&mut self) {
        self.ensure_fresh();
        self.activation.activate_last(&self.store, &self.nav);
    }

    pub fn activate_next(&mut self) {
        self.ensure_fresh();
        self.activation.activate_next(&self.store, &self.nav);
    }

    pub fn activate_prev(&mut self) {
        self.ensure_fresh();
        self.activation.activate_prev(&self.store, &self.nav);
    }

    pub fn activate_by_key(&mut self, key: char) {
        if !self.config.type_ahead {
            tracing::debug!("type-ahead disabled; key ignored");
            return;
        }
        self.ensure_fresh();
        self.activation.activate_by_key(&self.store, &self.nav, key);
    }

    pub fn reset_type_ahead(&mut self) {
        self.activation.reset_type_ahead();
    }

    pub fn on_active_change<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Option<String>) + 'static,
    {
        self.activation.subscribe(observer)
    }

    pub fn unsubscribe_active(&mut self, id: SubscriptionId) -> bool {
        self.activation.unsubscribe(id)
    }

    pub fn search(&mut self, query: &str) -> Vec<Item> {
        self.ensure_fresh();
        let identities = self.matcher.search(&self.store, &self.index, query);
        let candidates = self.matcher.candidates(&self.store);
        self.nav = NavigationIndex::build(&self.store, candidates.as_deref());
        identities
            .iter()
            .filter_map(|identity| self.store.get(identity).cloned())
            .collect()
    }

    pub fn last_query(&self) -> &str {
        self.matcher.last_query()
    }

    pub fn navigation(&mut self) -> Vec<Item> {
        self.ensure_fresh();
        self.nav
            .positions()
            .iter()
            .filter_map(|&position| self.store.at(position).cloned())
            .collect()
    }

    pub fn search_index_built(&mut self) -> bool {
        self.ensure_fresh();
        self.index.is_built()
    }

    fn invalidate(&mut self) {
        self.dirty = true;
        if self.scheduler.mark() {
            tracing::trace!("rebuild scheduled");
        }
    }

    fn ensure_fresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.index.rebuild(&self.store, self.config.search_threshold);
        self.matcher.refresh(&self.store, &self.index);
        let candidates = self.matcher.candidates(&self.store);
        self.nav = NavigationIndex::build(&self.store, candidates.as_deref());
        self.dirty = false;
    }
}
