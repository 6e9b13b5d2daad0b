//! In-memory access list store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use roster_core::{
    AccessList, AccessListMember, AccessListReader, Clock, Error, Lock, LockSource, LockTarget,
    Page, Result, SystemClock,
};
use tokio::sync::RwLock;

/// Page size used when a caller asks for zero.
pub const DEFAULT_PAGE_SIZE: usize = 200;

#[derive(Default)]
struct State {
    lists: BTreeMap<String, AccessList>,
    /// Member entries per list, in insertion order.
    members: BTreeMap<String, Vec<AccessListMember>>,
    locks: BTreeMap<String, Lock>,
}

impl State {
    /// Returns the stored definition with back-references filled in from the
    /// current edges.
    fn resolved(&self, name: &str) -> Option<AccessList> {
        let mut list = self.lists.get(name)?.clone();

        list.member_of = self
            .members
            .iter()
            .filter(|(_, entries)| entries.iter().any(|m| m.is_list() && m.name == name))
            .map(|(parent, _)| parent.clone())
            .collect();

        list.owner_of = self
            .lists
            .values()
            .filter(|owned| owned.owners.iter().any(|o| o.is_list() && o.name == name))
            .map(|owned| owned.name.clone())
            .collect();

        Some(list)
    }
}

/// An [`AccessListReader`] and [`LockSource`] backed by process memory.
pub struct MemoryStore {
    state: RwLock<State>,
    clock: Arc<dyn Clock>,
    default_page_size: usize,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("default_page_size", &self.default_page_size)
            .finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Creates an empty store using the system clock for lock expiry.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            clock: Arc::new(SystemClock),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Uses `clock` to decide which locks are in force.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Page size used when a caller asks for zero.
    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size.max(1);
        self
    }

    /// Inserts or replaces a list definition.
    ///
    /// Stored `member_of` and `owner_of` values are ignored; they are derived
    /// from member entries and owners on read.
    pub async fn upsert_access_list(&self, access_list: AccessList) {
        let mut state = self.state.write().await;
        log::debug!("Upserting access list '{}'", access_list.name);
        state.lists.insert(access_list.name.clone(), access_list);
    }

    /// Removes a list and its member entries.
    pub async fn delete_access_list(&self, name: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if state.lists.remove(name).is_none() {
            return Err(Error::not_found("access list", name));
        }
        state.members.remove(name);
        Ok(())
    }

    /// Inserts a member entry, or replaces the entry with the same name in
    /// place.
    ///
    /// # Errors
    ///
    /// Fails if the entry has an empty name or its list does not exist.
    pub async fn upsert_member(&self, member: AccessListMember) -> Result<()> {
        if member.name.is_empty() {
            return Err(Error::validation("member name must not be empty"));
        }

        let mut state = self.state.write().await;
        if !state.lists.contains_key(&member.access_list) {
            return Err(Error::not_found("access list", member.access_list));
        }

        let entries = state.members.entry(member.access_list.clone()).or_default();
        match entries.iter_mut().find(|m| m.name == member.name) {
            Some(existing) => *existing = member,
            None => entries.push(member),
        }
        Ok(())
    }

    /// Removes a member entry.
    pub async fn delete_member(&self, access_list: &str, name: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let entries = state
            .members
            .get_mut(access_list)
            .ok_or_else(|| Error::not_found("access list member", name))?;
        let before = entries.len();
        entries.retain(|m| m.name != name);
        if entries.len() == before {
            return Err(Error::not_found("access list member", name));
        }
        Ok(())
    }

    /// Inserts or replaces a lock.
    pub async fn upsert_lock(&self, lock: Lock) {
        let mut state = self.state.write().await;
        log::debug!("Upserting lock '{}'", lock.name);
        state.locks.insert(lock.name.clone(), lock);
    }

    /// Removes a lock.
    pub async fn delete_lock(&self, name: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .locks
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("lock", name))
    }

    /// Names of all stored lists, sorted.
    pub async fn list_names(&self) -> Vec<String> {
        self.state.read().await.lists.keys().cloned().collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccessListReader for MemoryStore {
    async fn list_access_list_members(
        &self,
        access_list: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<Page<AccessListMember>> {
        let state = self.state.read().await;
        if !state.lists.contains_key(access_list) {
            return Err(Error::not_found("access list", access_list));
        }

        let entries = state
            .members
            .get(access_list)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let start = match page_token {
            None | Some("") => 0,
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| Error::backend(format!("invalid page token '{token}'")))?,
        };
        let size = if page_size == 0 {
            self.default_page_size
        } else {
            page_size
        };

        let end = start.saturating_add(size).min(entries.len());
        let items = entries.get(start..end).unwrap_or_default().to_vec();
        let next_token = (end < entries.len()).then(|| end.to_string());

        Ok(Page { items, next_token })
    }

    async fn get_access_list(&self, name: &str) -> Result<AccessList> {
        self.state
            .read()
            .await
            .resolved(name)
            .ok_or_else(|| Error::not_found("access list", name))
    }
}

#[async_trait]
impl LockSource for MemoryStore {
    async fn get_locks(&self, in_force_only: bool, target: &LockTarget) -> Result<Vec<Lock>> {
        let now = self.clock.now();
        let state = self.state.read().await;
        Ok(state
            .locks
            .values()
            .filter(|lock| lock.target.matches(target))
            .filter(|lock| !in_force_only || lock.is_in_force_at(now))
            .cloned()
            .collect())
    }
}
