use serde::{Deserialize, Serialize};

use crate::item_store::ItemStore;
use crate::model::normalize_for_search;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ranking {
    #[default]
    Presentation,
    /// Matches that start with the query first, then the rest; both groups in
    /// presentation order.
    PrefixFirst,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    identity: String,
    normalized: String,
}

/// Only materialized for collections at or above the threshold.
#[derive(Debug, Default, Clone)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
    built: bool,
}

impl SearchIndex {
    pub fn rebuild(&mut self, store: &ItemStore, threshold: usize) {
        self.entries.clear();
        self.built = store.len() >= threshold;
        if !self.built {
            return;
        }

        self.entries.reserve(store.len());
        self.entries.extend(store.iter().map(|item| IndexEntry {
            identity: item.identity.clone(),
            normalized: item.searchable().to_string(),
        }));
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn scan(&self, store: &ItemStore, needle: &str) -> Vec<String> {
        if self.built {
            return self
                .entries
                .iter()
                .filter(|entry| entry.normalized.contains(needle))
                .map(|entry| entry.identity.clone())
                .collect();
        }

        store
            .iter()
            .filter(|item| item.searchable().contains(needle))
            .map(|item| item.identity.clone())
            .collect()
    }
}

#[derive(Debug, Default, Clone)]
pub struct Matcher {
    ranking: Ranking,
    last_query: String,
    last_results: Option<Vec<String>>,
}

impl Matcher {
    pub fn new(ranking: Ranking) -> Self {
        Self {
            ranking,
            last_query: String::new(),
            last_results: None,
        }
    }

    pub fn search(&mut self, store: &ItemStore, index: &SearchIndex, query: &str) -> Vec<String> {
        let needle = normalize_for_search(query);
        if needle.is_empty() {
            self.clear();
            return store.iter().map(|item| item.identity.clone()).collect();
        }

        let results = match self.last_results.as_ref() {
            Some(previous) if !self.last_query.is_empty() && needle.starts_with(&self.last_query) => {
                tracing::trace!(query = %needle, from = previous.len(), "narrowing previous results");
                previous
                    .iter()
                    .filter(|identity| {
                        store
                            .get(identity)
                            .is_some_and(|item| item.searchable().contains(&needle))
                    })
                    .cloned()
                    .collect()
            }
            _ => index.scan(store, &needle),
        };

        let ranked = self.rank(store, &results, &needle);
        self.last_query = needle;
        self.last_results = Some(results);
        ranked
    }

    pub fn refresh(&mut self, store: &ItemStore, index: &SearchIndex) {
        if self.last_query.is_empty() {
            return;
        }
        self.last_results = Some(index.scan(store, &self.last_query));
    }

    pub fn clear(&mut self) {
        self.last_query.clear();
        self.last_results = None;
    }

    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    /// Cached results in the order `search` reports them; `None` when no query
    /// is active or it matched nothing, meaning navigation is unrestricted.
    pub fn candidates(&self, store: &ItemStore) -> Option<Vec<String>> {
        if self.last_query.is_empty() {
            return None;
        }
        match self.last_results.as_ref() {
            Some(results) if !results.is_empty() => {
                Some(self.rank(store, results, &self.last_query))
            }
            _ => None,
        }
    }

    fn rank(&self, store: &ItemStore, results: &[String], needle: &str) -> Vec<String> {
        match self.ranking {
            Ranking::Presentation => results.to_vec(),
            Ranking::PrefixFirst => {
                let (prefixed, rest): (Vec<&String>, Vec<&String>) =
                    results.iter().partition(|identity| {
                        store
                            .get(identity)
                            .is_some_and(|item| item.searchable().starts_with(needle))
                    });
                prefixed.into_iter().chain(rest).cloned().collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Matcher, Ranking, SearchIndex};
    use crate::item_store::ItemStore;

    fn fruit() -> ItemStore {
        let mut store = ItemStore::new();
        for name in ["Apple", "Banana", "Cherry", "Apricot", "Blueberry"] {
            store.add(&name.to_lowercase(), name, false);
        }
        store
    }

    fn indexed(store: &ItemStore, threshold: usize) -> SearchIndex {
        let mut index = SearchIndex::default();
        index.rebuild(store, threshold);
        index
    }

    #[test]
    fn threshold_gates_index_construction() {
        let store = fruit();
        assert!(!indexed(&store, 500).is_built());
        assert!(indexed(&store, 5).is_built());
        assert_eq!(indexed(&store, 0).len(), 5);
    }

    #[test]
    fn indexed_and_direct_scans_agree() {
        let store = fruit();
        let mut direct = Matcher::new(Ranking::Presentation);
        let mut table = Matcher::new(Ranking::Presentation);

        for query in ["a", "an", "rr", "berry", "zzz"] {
            direct.clear();
            table.clear();
            assert_eq!(
                direct.search(&store, &indexed(&store, 500), query),
                table.search(&store, &indexed(&store, 0), query),
                "query {query}"
            );
        }
    }

    #[test]
    fn prefix_first_ranking_is_stable() {
        let store = fruit();
        let index = indexed(&store, 500);
        let mut matcher = Matcher::new(Ranking::PrefixFirst);

        assert_eq!(matcher.search(&store, &index, "b"), vec!["banana", "blueberry"]);
        assert_eq!(matcher.search(&store, &index, "a"), vec!["apple", "apricot", "banana"]);
        assert_eq!(matcher.search(&store, &index, "r"), vec!["cherry", "apricot", "blueberry"]);
    }

    #[test]
    fn candidates_follow_ranked_order() {
        let store = fruit();
        let index = indexed(&store, 500);
        let mut matcher = Matcher::new(Ranking::PrefixFirst);

        let shown = matcher.search(&store, &index, "r");
        assert_eq!(matcher.candidates(&store).unwrap(), shown);

        let shown = matcher.search(&store, &index, "a");
        assert_eq!(shown, vec!["apple", "apricot", "banana"]);
        assert_eq!(matcher.candidates(&store).unwrap(), shown);
    }

    #[test]
    fn candidates_require_active_query_with_results() {
        let store = fruit();
        let index = indexed(&store, 500);
        let mut matcher = Matcher::new(Ranking::Presentation);
        assert!(matcher.candidates(&store).is_none());

        matcher.search(&store, &index, "ap");
        assert_eq!(matcher.candidates(&store).unwrap(), vec!["apple", "apricot"]);

        matcher.search(&store, &index, "zzz");
        assert!(matcher.candidates(&store).is_none());
        assert_eq!(matcher.last_query(), "zzz");
    }

    #[test]
    fn refresh_picks_up_new_items() {
        let mut store = fruit();
        let mut index = indexed(&store, 500);
        let mut matcher = Matcher::new(Ranking::Presentation);
        matcher.search(&store, &index, "app");

        store.add("pineapple", "Pineapple", false);
        store.forget("apple");
        index.rebuild(&store, 500);
        matcher.refresh(&store, &index);

        assert_eq!(matcher.candidates(&store).unwrap(), vec!["pineapple"]);
    }
}
