//! Principals evaluated against access lists.

use serde::{Deserialize, Serialize};

use super::policy::Traits;

/// Anything that can be evaluated for membership or ownership.
pub trait Principal: Send + Sync {
    /// Principal name, matched against member and owner entries.
    fn name(&self) -> &str;

    /// Roles held by the principal.
    fn roles(&self) -> &[String];

    /// Traits held by the principal.
    fn traits(&self) -> &Traits;
}

/// A user principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User name.
    pub name: String,
    /// Roles held.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Traits held.
    #[serde(default)]
    pub traits: Traits,
}

impl User {
    /// Creates a user with no roles or traits.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds a role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Adds a trait value.
    pub fn with_trait(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.traits.entry(key.into()).or_default().push(value.into());
        self
    }
}

impl Principal for User {
    fn name(&self) -> &str {
        &self.name
    }

    fn roles(&self) -> &[String] {
        &self.roles
    }

    fn traits(&self) -> &Traits {
        &self.traits
    }
}
