//! Common test utilities and harness for roster-hierarchy integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use roster_core::{
    AccessList, AccessListMember, AccessListReader, Error, FixedClock, Lock, LockSource,
    LockTarget, Page, Result,
};
use roster_hierarchy::Hierarchy;
use roster_memory::MemoryStore;

/// The instant every harness clock starts at.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// Test harness wiring a memory store, a fixed clock and a resolver.
pub struct TestHarness {
    /// Backing store, also used as the lock source.
    pub store: Arc<MemoryStore>,
    /// Clock shared by the store and the resolver.
    pub clock: Arc<FixedClock>,
}

impl TestHarness {
    /// Creates an empty harness with the clock at [`t0`].
    pub fn new() -> Self {
        let clock = Arc::new(FixedClock::new(t0()));
        let store = Arc::new(MemoryStore::new().with_clock(clock.clone()));
        Self { store, clock }
    }

    /// A resolver with the harness clock and the store as lock source.
    pub fn hierarchy(&self) -> Hierarchy<MemoryStore> {
        Hierarchy::new(self.store.clone())
            .with_clock(self.clock.clone())
            .with_lock_source(self.store.clone())
    }

    /// Stores `list` and returns it.
    pub async fn put(&self, list: AccessList) -> AccessList {
        self.store.upsert_access_list(list.clone()).await;
        list
    }

    /// Stores empty lists with the given names.
    pub async fn lists(&self, names: &[&str]) {
        for name in names {
            self.store.upsert_access_list(AccessList::new(*name)).await;
        }
    }

    /// Adds a user entry.
    pub async fn add_user(&self, list: &str, user: &str) {
        self.store
            .upsert_member(AccessListMember::user(list, user))
            .await
            .unwrap();
    }

    /// Adds a member entry as given.
    pub async fn add(&self, member: AccessListMember) {
        self.store.upsert_member(member).await.unwrap();
    }

    /// Nests `child` under `parent`.
    pub async fn nest(&self, parent: &str, child: &str) {
        self.store
            .upsert_member(AccessListMember::list(parent, child))
            .await
            .unwrap();
    }

    /// Locks `user`.
    pub async fn lock(&self, lock: Lock) {
        self.store.upsert_lock(lock).await;
    }

    /// Reads `name` back with derived back-references.
    pub async fn get(&self, name: &str) -> AccessList {
        self.store.get_access_list(name).await.unwrap()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Reader that delegates to a store but fails `get_access_list` for chosen
/// names with a backend error.
pub struct FlakyReader {
    inner: Arc<MemoryStore>,
    broken: HashSet<String>,
}

impl FlakyReader {
    pub fn new(inner: Arc<MemoryStore>, broken: &[&str]) -> Self {
        Self {
            inner,
            broken: broken.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl AccessListReader for FlakyReader {
    async fn list_access_list_members(
        &self,
        access_list: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<Page<AccessListMember>> {
        self.inner
            .list_access_list_members(access_list, page_size, page_token)
            .await
    }

    async fn get_access_list(&self, name: &str) -> Result<AccessList> {
        if self.broken.contains(name) {
            return Err(Error::backend(format!("backend unavailable for '{name}'")));
        }
        self.inner.get_access_list(name).await
    }
}

/// Reader that records every member page request.
pub struct RecordingReader {
    inner: Arc<MemoryStore>,
    pub page_calls: AtomicUsize,
    pub page_sizes: Mutex<Vec<usize>>,
}

impl RecordingReader {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            page_calls: AtomicUsize::new(0),
            page_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessListReader for RecordingReader {
    async fn list_access_list_members(
        &self,
        access_list: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<Page<AccessListMember>> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.page_sizes.lock().unwrap().push(page_size);
        self.inner
            .list_access_list_members(access_list, page_size, page_token)
            .await
    }

    async fn get_access_list(&self, name: &str) -> Result<AccessList> {
        self.inner.get_access_list(name).await
    }
}

/// Lock source that always fails.
pub struct BrokenLocks;

#[async_trait]
impl LockSource for BrokenLocks {
    async fn get_locks(&self, _in_force_only: bool, _target: &LockTarget) -> Result<Vec<Lock>> {
        Err(Error::backend("lock service unreachable"))
    }
}
