//! The static roster: who can be nominated, and what the group calls them.

use crate::UserId;
use std::collections::BTreeMap;

/// Built-in members, used when the configuration does not override them.
const DEFAULT_MEMBERS: [(&str, &str); 3] = [
    ("@Amao62626", "生毛"),
    ("@maxbillchung", "澄澄兒"),
    ("@yanglin1112", "暘暘兒"),
];

/// Mapping from username to display name.
///
/// Membership in this map is the only authorization check for being a vote
/// target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    members: BTreeMap<UserId, String>,
}

impl Roster {
    /// Build a roster from `(username, display name)` pairs.
    pub fn new<I, U, N>(members: I) -> Self
    where
        I: IntoIterator<Item = (U, N)>,
        U: AsRef<str>,
        N: Into<String>,
    {
        Self {
            members: members
                .into_iter()
                .map(|(user, name)| (UserId::new(user), name.into()))
                .collect(),
        }
    }

    /// Whether the user is a roster member.
    pub fn contains(&self, user: &UserId) -> bool {
        self.members.contains_key(user)
    }

    /// Resolve a raw username (with or without `@`) to a member id.
    pub fn resolve(&self, raw: &str) -> Option<UserId> {
        let user = UserId::new(raw);
        self.contains(&user).then_some(user)
    }

    /// The display name for a user, falling back to the `@username` itself
    /// for non-members.
    pub fn display_name(&self, user: &UserId) -> String {
        self.members
            .get(user)
            .cloned()
            .unwrap_or_else(|| user.to_string())
    }

    /// Iterate over `(user, display name)` pairs in username order.
    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &str)> {
        self.members.iter().map(|(user, name)| (user, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_MEMBERS)
    }
}
