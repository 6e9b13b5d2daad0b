//! Access list member entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an entry names a principal or another access list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipKind {
    /// A leaf principal.
    #[default]
    User,
    /// A nested access list.
    List,
}

impl MembershipKind {
    /// Returns `true` for nested list entries.
    pub fn is_list(&self) -> bool {
        matches!(self, MembershipKind::List)
    }
}

/// A member entry under an access list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessListMember {
    /// Name of the access list this entry belongs to.
    pub access_list: String,
    /// Principal name, or nested list name for `MembershipKind::List`.
    pub name: String,
    /// Entry kind.
    #[serde(default)]
    pub kind: MembershipKind,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// When the membership lapses. `None` never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
}

impl AccessListMember {
    /// Creates a user member of `access_list`.
    pub fn user(access_list: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            access_list: access_list.into(),
            name: name.into(),
            kind: MembershipKind::User,
            description: String::new(),
            expires: None,
        }
    }

    /// Creates a nested-list member of `access_list`.
    pub fn list(access_list: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: MembershipKind::List,
            ..Self::user(access_list, name)
        }
    }

    /// Sets the expiry.
    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns `true` if this entry is a nested list.
    pub fn is_list(&self) -> bool {
        self.kind.is_list()
    }

    /// Returns `true` once `now` has reached the expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| now >= expires)
    }
}
