use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Identified, Links};

/// A staff user as returned by the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            display_name: None,
            links: None,
            extra: Map::new(),
        }
    }

    /// Display name, falling back to the username and then the id.
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or(&self.id)
    }

    pub fn self_href(&self) -> Option<&str> {
        self.links.as_ref().and_then(Links::self_href)
    }
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}
