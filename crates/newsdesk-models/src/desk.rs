use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Identified, Links};

/// Reference from a desk to one of its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskMember {
    pub user: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeskMember {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            extra: Map::new(),
        }
    }
}

/// An editorial work queue. Created server-side, read-only to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Desk {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered member references; order is preserved by the membership index.
    #[serde(default)]
    pub members: Vec<DeskMember>,
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Desk {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            members: Vec::new(),
            links: None,
            extra: Map::new(),
        }
    }

    pub fn with_members<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = users.into_iter().map(DeskMember::new).collect();
        self
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.user.as_str())
    }
}

impl Identified for Desk {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_unknown_fields() {
        let raw = r#"{
            "_id": "d1",
            "name": "Politics",
            "desk_type": "authoring",
            "members": [{"user": "u1", "role": "editor"}, {"user": "u2"}]
        }"#;
        let desk: Desk = serde_json::from_str(raw).unwrap();
        assert_eq!(desk.member_ids().collect::<Vec<_>>(), vec!["u1", "u2"]);
        assert_eq!(desk.extra.get("desk_type"), Some(&Value::from("authoring")));
        assert_eq!(desk.members[0].extra.get("role"), Some(&Value::from("editor")));
    }

    #[test]
    fn minimal_desk_decodes() {
        let desk: Desk = serde_json::from_str(r#"{"_id": "d9"}"#).unwrap();
        assert_eq!(desk.id, "d9");
        assert!(desk.name.is_empty());
        assert!(desk.members.is_empty());
    }
}
