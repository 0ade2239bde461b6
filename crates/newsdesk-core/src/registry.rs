use std::collections::HashMap;

use newsdesk_models::{Desk, Identified, User};

/// Fetched records in server order, indexed by id.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    items: Vec<T>,
    by_id: HashMap<String, usize>,
}

pub type DeskRegistry = Registry<Desk>;
pub type UserDirectory = Registry<User>;

impl<T: Identified> Registry<T> {
    /// Build from a fetched page. A duplicated id resolves to its last occurrence.
    pub fn from_items(items: Vec<T>) -> Self {
        let by_id = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.id().to_string(), pos))
            .collect();
        Self { items, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.by_id.get(id).map(|&pos| &self.items[pos])
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            by_id: HashMap::new(),
        }
    }
}
