use crate::identity::Identity;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// Process-wide configuration of privileged voters. Read-mostly;
/// writes invalidate and replace the cached set.
pub struct SpecialUsers {
    users: RwLock<HashSet<Identity>>,
}

impl SpecialUsers {
    pub fn new(users: impl IntoIterator<Item = Identity>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().collect()),
        }
    }

    pub async fn is_special(&self, identity: &Identity) -> bool {
        self.users.read().await.contains(identity)
    }

    pub async fn set(&self, users: impl IntoIterator<Item = Identity>) {
        *self.users.write().await = users.into_iter().collect();
    }
}

impl Default for SpecialUsers {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trimmed_case_insensitive_membership() {
        let special = SpecialUsers::new([Identity::new("Admin", "NA1")]);
        assert!(special.is_special(&Identity::new("admin", "na1")).await);
        assert!(!special.is_special(&Identity::new("player", "na1")).await);
    }
}
