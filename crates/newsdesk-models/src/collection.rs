use serde::{Deserialize, Serialize};

/// Paging metadata returned next to collection items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub max_results: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// One page of a REST collection (`{"_items": [...], "_meta": {...}}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection<T> {
    #[serde(rename = "_items", default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, meta: None }
    }

    /// Returns the server-side total when it exceeds what this page holds.
    pub fn truncated_total(&self) -> Option<u64> {
        let total = self.meta.as_ref()?.total?;
        (total > self.items.len() as u64).then_some(total)
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
