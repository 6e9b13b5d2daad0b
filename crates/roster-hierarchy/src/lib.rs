#![doc = include_str!("../README.md")]

//! # Modules
//!
//! - [`members`]: flattened nested membership
//! - [`owners`]: flattened ownership, including owner lists
//! - [`ancestors`]: transitive parents via `member_of` / `owner_of`
//! - [`grants`]: roles and traits inherited from ancestors
//! - [`requirements`]: eligibility policy evaluation
//! - [`assignment`]: `is_member` / `is_owner` decisions
//! - [`depth`]: nesting depth and edit validation
//!
//! All operations hang off [`Hierarchy`], which holds the collaborators and
//! nothing else. Visited sets live for one call only, so a `Hierarchy` can be
//! shared freely across tasks.

use std::fmt;
use std::sync::Arc;

use roster_core::{AccessListReader, Clock, HierarchyConfig, LockSource, SystemClock};

pub mod ancestors;
pub mod assignment;
pub mod depth;
mod fetch;
pub mod grants;
pub mod members;
pub mod owners;
pub mod requirements;

pub use grants::merge_grants;
pub use requirements::meets_requirements;

/// Access list hierarchy resolver.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use roster_hierarchy::Hierarchy;
///
/// let hierarchy = Hierarchy::new(Arc::new(store))
///     .with_lock_source(Arc::new(locks));
///
/// let list = hierarchy.reader().get_access_list("engineering").await?;
/// let assignment = hierarchy.is_member(&user, &list).await?;
/// ```
pub struct Hierarchy<R: ?Sized> {
    reader: Arc<R>,
    locks: Option<Arc<dyn LockSource>>,
    clock: Arc<dyn Clock>,
    config: HierarchyConfig,
}

impl<R> Hierarchy<R>
where
    R: AccessListReader + ?Sized,
{
    /// Creates a resolver over `reader` with the system clock, no lock
    /// source, and default configuration.
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            reader,
            locks: None,
            clock: Arc::new(SystemClock),
            config: HierarchyConfig::default(),
        }
    }

    /// Consults `locks` before every top-level membership or ownership check.
    pub fn with_lock_source(mut self, locks: Arc<dyn LockSource>) -> Self {
        self.locks = Some(locks);
        self
    }

    /// Uses `clock` for expiry decisions.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: HierarchyConfig) -> Self {
        self.config = config;
        self
    }

    /// The underlying reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// The active configuration.
    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }
}

impl<R: ?Sized> Clone for Hierarchy<R> {
    fn clone(&self) -> Self {
        Self {
            reader: Arc::clone(&self.reader),
            locks: self.locks.clone(),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<R: ?Sized> fmt::Debug for Hierarchy<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hierarchy")
            .field("locks", &self.locks.is_some())
            .field("config", &self.config)
            .finish()
    }
}
