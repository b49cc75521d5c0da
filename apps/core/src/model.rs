use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// A selectable option. `identity` is the only handle callers use to refer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub identity: String,
    pub value: String,
    pub disabled: bool,
    searchable: String,
}

impl Item {
    pub fn new(identity: &str, value: &str) -> Self {
        Self::from_owned(identity.to_string(), value.to_string(), false)
    }

    pub fn from_owned(identity: String, value: String, disabled: bool) -> Self {
        let searchable = normalize_for_search(&value);
        Self {
            identity,
            value,
            disabled,
            searchable,
        }
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn searchable(&self) -> &str {
        &self.searchable
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDto {
    pub identity: String,
    pub value: String,
    pub disabled: bool,
}

impl From<&Item> for ItemDto {
    fn from(value: &Item) -> Self {
        Self {
            identity: value.identity.clone(),
            value: value.value.clone(),
            disabled: value.disabled,
        }
    }
}

impl From<Item> for ItemDto {
    fn from(value: Item) -> Self {
        Self {
            identity: value.identity,
            value: value.value,
            disabled: value.disabled,
        }
    }
}

/// Lowercase, NFD-decompose and drop combining diacritical marks (U+0300..=U+036F).
pub fn normalize_for_search(input: &str) -> String {
    input
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .collect()
}

fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::{normalize_for_search, Item};

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(normalize_for_search("Café"), "cafe");
        assert_eq!(normalize_for_search("ÀÉÎÕÜ"), "aeiou");
        assert_eq!(normalize_for_search("Crème Brûlée"), "creme brulee");
    }

    #[test]
    fn keeps_non_latin_letters_and_spacing() {
        assert_eq!(normalize_for_search("Straße"), "straße");
        assert_eq!(normalize_for_search("  Tab\tBar "), "  tab\tbar ");
    }

    #[test]
    fn decomposed_input_matches_precomposed() {
        assert_eq!(normalize_for_search("e\u{0301}"), normalize_for_search("\u{00E9}"));
    }

    #[test]
    fn item_precomputes_searchable_value() {
        let item = Item::new("c", "Crème");
        assert_eq!(item.searchable(), "creme");
        assert!(!item.disabled);
        assert!(item.with_disabled(true).disabled);
    }
}
