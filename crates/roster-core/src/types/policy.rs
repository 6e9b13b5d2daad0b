//! Eligibility requirements and conferred grants.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Multi-valued trait map: trait key to trait values.
pub type Traits = BTreeMap<String, Vec<String>>;

/// Eligibility policy a principal must satisfy to hold an assignment.
///
/// All roles and all trait values are required (AND semantics).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requires {
    /// Roles the principal must hold.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Trait values the principal must hold, per key.
    #[serde(default)]
    pub traits: Traits,
}

impl Requires {
    /// Creates an empty policy, which every principal satisfies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Adds a required trait value.
    pub fn with_trait(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.traits.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Returns `true` if the policy requires nothing.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.traits.is_empty()
    }
}

/// Roles and traits conferred on qualifying principals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grants {
    /// Granted roles.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Granted trait values, per key.
    #[serde(default)]
    pub traits: Traits,
}

impl Grants {
    /// Creates an empty grant set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a granted role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Adds a granted trait value.
    pub fn with_trait(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.traits.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Returns `true` if nothing is granted.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.traits.is_empty()
    }
}
