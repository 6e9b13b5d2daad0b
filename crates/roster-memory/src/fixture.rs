//! TOML fixtures for seeding a [`MemoryStore`].
//!
//! ```toml
//! [[lists]]
//! name = "eng"
//! title = "Engineering"
//! owners = [{ name = "leads", kind = "list" }]
//! membership_requires = { roles = ["employee"] }
//! grants = { roles = ["dev"], traits = { env = ["staging"] } }
//!
//! [[members]]
//! access_list = "eng"
//! name = "alice"
//! expires = "2030-01-01T00:00:00Z"
//!
//! [[users]]
//! name = "alice"
//! roles = ["employee"]
//!
//! [[locks]]
//! name = "offboarding"
//! target = { user = "mallory" }
//! ```

use std::path::Path;

use roster_core::{AccessList, AccessListMember, Lock, Result, User};
use serde::{Deserialize, Serialize};

use crate::MemoryStore;

/// A self-contained set of lists, members, users and locks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    /// List definitions.
    #[serde(default)]
    pub lists: Vec<AccessList>,
    /// Member entries, loaded after all lists.
    #[serde(default)]
    pub members: Vec<AccessListMember>,
    /// Principals available for evaluation.
    #[serde(default)]
    pub users: Vec<User>,
    /// Locks.
    #[serde(default)]
    pub locks: Vec<Lock>,
}

impl Fixture {
    /// Parses a fixture document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a fixture file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Finds a user by name.
    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|u| u.name == name)
    }

    /// Writes every list, member and lock into `store`.
    ///
    /// # Errors
    ///
    /// Fails on the first member entry the store rejects.
    pub async fn populate(&self, store: &MemoryStore) -> Result<()> {
        for list in &self.lists {
            store.upsert_access_list(list.clone()).await;
        }
        for member in &self.members {
            store.upsert_member(member.clone()).await?;
        }
        for lock in &self.locks {
            store.upsert_lock(lock.clone()).await;
        }
        log::info!(
            "Loaded fixture: {} lists, {} members, {} users, {} locks",
            self.lists.len(),
            self.members.len(),
            self.users.len(),
            self.locks.len()
        );
        Ok(())
    }

    /// Builds a fresh store holding this fixture.
    pub async fn into_store(&self) -> Result<MemoryStore> {
        let store = MemoryStore::new();
        self.populate(&store).await?;
        Ok(store)
    }
}
