use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category name to the ordered list of items distributable in it.
///
/// Item lists never contain duplicates: adding an existing item is a no-op,
/// and duplicates in a stored document are dropped on load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct CategoryRegistry(BTreeMap<String, Vec<String>>);

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    pub fn contains_item(&self, category: &str, item: &str) -> bool {
        self.items(category)
            .is_some_and(|items| items.iter().any(|i| i == item))
    }

    /// Items of `category`, or `None` if the category does not exist.
    pub fn items(&self, category: &str) -> Option<&[String]> {
        self.0.get(category).map(Vec::as_slice)
    }

    /// Insert an empty category. Returns `false` if it already existed.
    pub fn add_category(&mut self, category: &str) -> bool {
        if self.contains(category) {
            return false;
        }
        self.0.insert(category.to_string(), Vec::new());
        true
    }

    /// Remove a category and its item list. Returns `true` if it existed.
    pub fn remove_category(&mut self, category: &str) -> bool {
        self.0.remove(category).is_some()
    }

    /// Append `item` to an existing category.
    ///
    /// Returns `None` if the category does not exist, `Some(false)` if the
    /// item was already listed.
    pub fn add_item(&mut self, category: &str, item: &str) -> Option<bool> {
        let items = self.0.get_mut(category)?;
        if items.iter().any(|i| i == item) {
            return Some(false);
        }
        items.push(item.to_string());
        Some(true)
    }

    /// Remove `item` from `category`. Returns `true` if it was listed.
    pub fn remove_item(&mut self, category: &str, item: &str) -> bool {
        match self.0.get_mut(category) {
            Some(items) => {
                let before = items.len();
                items.retain(|i| i != item);
                items.len() != before
            }
            None => false,
        }
    }

    /// Category names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Vec<String>>> for CategoryRegistry {
    fn from(mut map: BTreeMap<String, Vec<String>>) -> Self {
        for items in map.values_mut() {
            let mut seen = Vec::with_capacity(items.len());
            items.retain(|i| {
                if seen.contains(i) {
                    false
                } else {
                    seen.push(i.clone());
                    true
                }
            });
        }
        Self(map)
    }
}

impl From<CategoryRegistry> for BTreeMap<String, Vec<String>> {
    fn from(registry: CategoryRegistry) -> Self {
        registry.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_category_idempotent() {
        let mut reg = CategoryRegistry::new();
        assert!(reg.add_category("Clothing"));
        assert!(!reg.add_category("Clothing"));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.items("Clothing"), Some(&[][..]));
    }

    #[test]
    fn add_item_idempotent_and_ordered() {
        let mut reg = CategoryRegistry::new();
        reg.add_category("Clothing");
        assert_eq!(reg.add_item("Clothing", "Coat"), Some(true));
        assert_eq!(reg.add_item("Clothing", "Boots"), Some(true));
        assert_eq!(reg.add_item("Clothing", "Coat"), Some(false));
        assert_eq!(reg.items("Clothing").unwrap(), ["Coat", "Boots"]);
    }

    #[test]
    fn add_item_missing_category() {
        let mut reg = CategoryRegistry::new();
        assert_eq!(reg.add_item("Food", "Rice"), None);
        assert!(!reg.contains("Food"));
    }

    #[test]
    fn remove_item_and_category() {
        let mut reg = CategoryRegistry::new();
        reg.add_category("Clothing");
        reg.add_item("Clothing", "Coat");
        assert!(reg.contains_item("Clothing", "Coat"));
        assert!(reg.remove_item("Clothing", "Coat"));
        assert!(!reg.remove_item("Clothing", "Coat"));
        assert!(!reg.remove_item("Food", "Coat"));
        assert!(reg.remove_category("Clothing"));
        assert!(!reg.remove_category("Clothing"));
        assert!(reg.is_empty());
    }

    #[test]
    fn load_drops_duplicates() {
        let reg: CategoryRegistry =
            serde_json::from_value(json!({"Clothing": ["Coat", "Hat", "Coat"]})).unwrap();
        assert_eq!(reg.items("Clothing").unwrap(), ["Coat", "Hat"]);
        assert_eq!(
            serde_json::to_value(&reg).unwrap(),
            json!({"Clothing": ["Coat", "Hat"]})
        );
    }
}
