//! Relationship and assignment enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which back-edge an ancestor walk follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Follow `member_of` edges.
    #[default]
    Member,
    /// Follow `owner_of` edges (one hop) reached through `member_of` edges.
    Owner,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipKind::Member => write!(f, "member"),
            RelationshipKind::Owner => write!(f, "owner"),
        }
    }
}

impl std::str::FromStr for RelationshipKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "member" => Ok(RelationshipKind::Member),
            "owner" => Ok(RelationshipKind::Owner),
            other => Err(crate::Error::config(format!(
                "unknown relationship kind '{other}' (expected 'member' or 'owner')"
            ))),
        }
    }
}

/// Outcome of a membership or ownership evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentType {
    /// No valid assignment was found.
    #[default]
    Unspecified,
    /// The principal is listed directly on the access list.
    Explicit,
    /// The principal qualifies through a nested access list.
    Inherited,
}

impl AssignmentType {
    /// Returns `true` for `Explicit` and `Inherited`.
    pub fn is_assigned(&self) -> bool {
        !matches!(self, AssignmentType::Unspecified)
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentType::Unspecified => write!(f, "unspecified"),
            AssignmentType::Explicit => write!(f, "explicit"),
            AssignmentType::Inherited => write!(f, "inherited"),
        }
    }
}
