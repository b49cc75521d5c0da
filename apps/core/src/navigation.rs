use crate::item_store::ItemStore;

/// Keyboard-reachable store positions, in the order the list is shown.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NavigationIndex {
    positions: Vec<usize>,
}

impl NavigationIndex {
    /// `candidates` is the shown result order when a filter is active; without
    /// one the store is walked in presentation order.
    pub fn build(store: &ItemStore, candidates: Option<&[String]>) -> Self {
        let positions = match candidates {
            Some(ordered) => ordered
                .iter()
                .filter_map(|identity| {
                    let position = store.position(identity)?;
                    let item = store.at(position)?;
                    (!item.disabled).then_some(position)
                })
                .collect(),
            None => store
                .iter()
                .enumerate()
                .filter(|(_, item)| !item.disabled)
                .map(|(position, _)| position)
                .collect(),
        };
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position_at(&self, cursor: usize) -> Option<usize> {
        self.positions.get(cursor).copied()
    }

    pub fn cursor_of(&self, position: usize) -> Option<usize> {
        self.positions.iter().position(|&candidate| candidate == position)
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
}
