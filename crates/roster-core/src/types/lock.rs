//! Locks that bar a principal from any assignment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a lock applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LockTarget {
    /// Locked user name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl LockTarget {
    /// Targets a single user.
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            user: Some(name.into()),
        }
    }

    /// Returns `true` if this lock target satisfies the `query` filter.
    ///
    /// Every field set on the query must equal the lock's. An empty query
    /// matches every lock; a lock with no user matches no user query.
    pub fn matches(&self, query: &LockTarget) -> bool {
        match &query.user {
            Some(wanted) => self.user.as_deref() == Some(wanted.as_str()),
            None => true,
        }
    }
}

/// A lock record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    /// Lock name.
    pub name: String,
    /// Locked target.
    pub target: LockTarget,
    /// Operator message.
    #[serde(default)]
    pub message: String,
    /// When the lock stops being in force. `None` never lapses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
}

impl Lock {
    /// Creates a lock on a user.
    pub fn on_user(name: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: LockTarget::user(user),
            message: String::new(),
            expires: None,
        }
    }

    /// Returns `true` while the lock is in force at `now`.
    pub fn is_in_force_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_none_or(|expires| now < expires)
    }
}
