use std::collections::HashMap;

use newsdesk_models::User;

use crate::registry::{DeskRegistry, UserDirectory};

/// Desk id -> resolved member records, in the desk's member order.
/// Rebuilt from scratch whenever desks and users are reloaded.
#[derive(Debug, Clone, Default)]
pub struct MembershipIndex {
    desks: HashMap<String, Vec<User>>,
}

impl MembershipIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve every desk's member references against the user directory.
    /// References to users missing from the directory are skipped.
    pub fn build(desks: &DeskRegistry, users: &UserDirectory) -> Self {
        // A repeated user id resolves to its first occurrence in the page.
        let mut first_seen: HashMap<&str, &User> = HashMap::with_capacity(users.len());
        for user in users.items() {
            first_seen.entry(user.id.as_str()).or_insert(user);
        }

        let mut index = HashMap::with_capacity(desks.len());
        let mut unresolved = 0usize;
        for desk in desks.items() {
            let mut members = Vec::with_capacity(desk.members.len());
            for user_id in desk.member_ids() {
                match first_seen.get(user_id) {
                    Some(&user) => members.push(user.clone()),
                    None => {
                        unresolved += 1;
                        tracing::debug!(desk = %desk.id, user = %user_id, "skipping unknown desk member");
                    }
                }
            }
            index.insert(desk.id.clone(), members);
        }
        tracing::info!(desks = index.len(), unresolved, "membership index built");
        Self { desks: index }
    }

    /// Members of `desk_id`; `None` if the desk was not indexed.
    pub fn members(&self, desk_id: &str) -> Option<&[User]> {
        self.desks.get(desk_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.desks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.desks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_models::Desk;

    fn ids(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn resolves_known_member() {
        let desks = DeskRegistry::from_items(vec![Desk::new("d1", "News").with_members(["u1"])]);
        let users = UserDirectory::from_items(vec![User::new("u1")]);
        let index = MembershipIndex::build(&desks, &users);
        assert_eq!(index.members("d1"), Some(&[User::new("u1")][..]));
    }

    #[test]
    fn drops_unknown_member() {
        let desks = DeskRegistry::from_items(vec![Desk::new("d1", "News").with_members(["u2"])]);
        let users = UserDirectory::from_items(vec![User::new("u1")]);
        let index = MembershipIndex::build(&desks, &users);
        assert_eq!(index.members("d1"), Some(&[][..]));
    }

    #[test]
    fn keeps_member_order_and_skips_gaps() {
        let desks = DeskRegistry::from_items(vec![
            Desk::new("d1", "News").with_members(["u3", "ghost", "u1", "u2"]),
            Desk::new("d2", "Sport"),
        ]);
        let users = UserDirectory::from_items(vec![User::new("u1"), User::new("u2"), User::new("u3")]);
        let index = MembershipIndex::build(&desks, &users);

        assert_eq!(ids(index.members("d1").unwrap()), vec!["u3", "u1", "u2"]);
        assert_eq!(index.members("d2").map(<[User]>::len), Some(0));
        assert!(index.members("d3").is_none());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn repeated_user_id_resolves_to_first_record() {
        let mut first = User::new("u1");
        first.username = Some("first".into());
        let mut second = User::new("u1");
        second.username = Some("second".into());

        let desks = DeskRegistry::from_items(vec![Desk::new("d1", "News").with_members(["u1"])]);
        let users = UserDirectory::from_items(vec![first, second]);
        let index = MembershipIndex::build(&desks, &users);

        let members = index.members("d1").unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name(), "first");
        assert_eq!(users.get("u1").map(User::name), Some("second"));
    }
}
