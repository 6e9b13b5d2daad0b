//! Access lists and their owners.

use serde::{Deserialize, Serialize};

use super::member::MembershipKind;
use super::policy::{Grants, Requires};

/// Why an owner currently fails to qualify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibleStatus {
    /// Not evaluated.
    #[default]
    Unspecified,
    /// Meets every requirement.
    Eligible,
    /// Missing required roles or traits.
    MissingRequirements,
    /// Assignment has expired.
    Expired,
    /// The named user does not exist.
    UserNotExist,
}

/// An owner entry on an access list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Principal name, or nested list name for `MembershipKind::List`.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Entry kind.
    #[serde(default)]
    pub kind: MembershipKind,
    /// Last recorded eligibility status.
    #[serde(default)]
    pub ineligible_status: IneligibleStatus,
}

impl Owner {
    /// Creates a user owner.
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind: MembershipKind::User,
            ineligible_status: IneligibleStatus::Unspecified,
        }
    }

    /// Creates an owner that is itself an access list.
    pub fn list(name: impl Into<String>) -> Self {
        Self {
            kind: MembershipKind::List,
            ..Self::user(name)
        }
    }

    /// Returns `true` if this owner is a nested list.
    pub fn is_list(&self) -> bool {
        self.kind.is_list()
    }
}

/// A named policy container.
///
/// `member_of` and `owner_of` are back-references maintained by the storage
/// layer: the names of lists that include this list as a member or owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessList {
    /// Unique name.
    pub name: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Owners, in declaration order.
    #[serde(default)]
    pub owners: Vec<Owner>,
    /// Policy a member must satisfy.
    #[serde(default)]
    pub membership_requires: Requires,
    /// Policy an owner must satisfy.
    #[serde(default)]
    pub ownership_requires: Requires,
    /// Conferred on members.
    #[serde(default)]
    pub grants: Grants,
    /// Conferred on owners.
    #[serde(default)]
    pub owner_grants: Grants,
    /// Lists that contain this list as a member.
    #[serde(default)]
    pub member_of: Vec<String>,
    /// Lists that contain this list as an owner.
    #[serde(default)]
    pub owner_of: Vec<String>,
}

impl AccessList {
    /// Creates an empty access list.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Appends an owner.
    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owners.push(owner);
        self
    }

    /// Sets the membership requirements.
    pub fn with_membership_requires(mut self, requires: Requires) -> Self {
        self.membership_requires = requires;
        self
    }

    /// Sets the ownership requirements.
    pub fn with_ownership_requires(mut self, requires: Requires) -> Self {
        self.ownership_requires = requires;
        self
    }

    /// Sets the member grants.
    pub fn with_grants(mut self, grants: Grants) -> Self {
        self.grants = grants;
        self
    }

    /// Sets the owner grants.
    pub fn with_owner_grants(mut self, grants: Grants) -> Self {
        self.owner_grants = grants;
        self
    }

    /// Name used in user-facing messages: the title, or the name if untitled.
    pub fn display_name(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }
}
