//! Collaborator traits the engine reads through.
//!
//! The engine never owns storage. Every read goes through an
//! [`AccessListReader`], lock lookups through a [`LockSource`], and every
//! expiry decision through a [`Clock`], so callers decide where data lives
//! and tests decide what time it is.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::types::{AccessList, AccessListMember, Lock, LockTarget, Page};
use crate::Result;

/// Read access to stored access lists and their member entries.
///
/// # Errors
///
/// Implementations must report a missing list as [`Error::NotFound`]
/// so the engine can treat it as an empty membership.
///
/// [`Error::NotFound`]: crate::Error::NotFound
#[async_trait]
pub trait AccessListReader: Send + Sync {
    /// Fetch one page of the direct member entries of `access_list`.
    ///
    /// `page_size` of zero lets the backend choose. `page_token` is `None`
    /// for the first page and the previous page's `next_token` afterwards.
    async fn list_access_list_members(
        &self,
        access_list: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<Page<AccessListMember>>;

    /// Fetch an access list definition by name.
    async fn get_access_list(&self, name: &str) -> Result<AccessList>;
}

/// Lookup of locks targeting a principal.
#[async_trait]
pub trait LockSource: Send + Sync {
    /// Return the locks matching `target`.
    ///
    /// With `in_force_only`, lapsed locks are omitted.
    async fn get_locks(&self, in_force_only: bool, target: &LockTarget) -> Result<Vec<Lock>>;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Creates a clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
