//! Everything a command needs: the fixture, the store and the resolver.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use roster_core::{AccessList, AccessListReader, Clock, FixedClock, RosterConfig, SystemClock, User};
use roster_hierarchy::Hierarchy;
use roster_memory::{Fixture, MemoryStore};

/// Options shared by every fixture-backed command.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Freeze the clock at this instant.
    pub now: Option<DateTime<Utc>>,
    /// Skip the lock check.
    pub no_locks: bool,
}

pub struct Session {
    fixture: Fixture,
    hierarchy: Hierarchy<MemoryStore>,
}

impl Session {
    /// Loads `path` and wires up a resolver over it.
    pub async fn open(path: &Path, config: &RosterConfig, options: &SessionOptions) -> Result<Self> {
        let fixture = Fixture::load(path)
            .with_context(|| format!("Failed to load fixture {}", path.display()))?;
        Self::from_fixture(fixture, config, options).await
    }

    pub async fn from_fixture(
        fixture: Fixture,
        config: &RosterConfig,
        options: &SessionOptions,
    ) -> Result<Self> {
        let clock: Arc<dyn Clock> = match options.now {
            Some(now) => Arc::new(FixedClock::new(now)),
            None => Arc::new(SystemClock),
        };

        let store = Arc::new(MemoryStore::new().with_clock(Arc::clone(&clock)));
        fixture.populate(&store).await?;

        let mut hierarchy = Hierarchy::new(Arc::clone(&store))
            .with_clock(clock)
            .with_config(config.hierarchy.clone());
        if !options.no_locks {
            hierarchy = hierarchy.with_lock_source(store);
        }

        Ok(Self { fixture, hierarchy })
    }

    pub fn hierarchy(&self) -> &Hierarchy<MemoryStore> {
        &self.hierarchy
    }

    pub async fn list(&self, name: &str) -> Result<AccessList> {
        Ok(self.hierarchy.reader().get_access_list(name).await?)
    }

    /// The fixture's user of that name, or a user with no roles or traits.
    pub fn user(&self, name: &str) -> User {
        self.fixture
            .user(name)
            .cloned()
            .unwrap_or_else(|| User::new(name))
    }
}
