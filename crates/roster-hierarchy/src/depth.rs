//! Nesting depth and pre-mutation validation.
//!
//! The resolver itself never enforces a depth limit. Callers use these checks
//! before adding an edge so the stored graph stays within
//! [`HierarchyConfig::max_nesting_depth`](roster_core::HierarchyConfig).

use std::collections::HashSet;

use futures::future::{BoxFuture, FutureExt};
use roster_core::{AccessList, AccessListReader, Error, RelationshipKind, Result};
use tracing::debug;

use crate::Hierarchy;

impl<R> Hierarchy<R>
where
    R: AccessListReader + ?Sized,
{
    /// Longest chain of nested-list member edges below `access_list`.
    pub async fn max_depth_downward(&self, access_list: &str) -> Result<usize> {
        let mut seen = HashSet::new();
        self.depth_downward(access_list, &mut seen).await
    }

    /// Longest chain of `member_of` edges above `access_list`.
    ///
    /// # Errors
    ///
    /// Fails if any parent named in a `member_of` set cannot be loaded.
    pub async fn max_depth_upward(&self, access_list: &AccessList) -> Result<usize> {
        let mut seen = HashSet::new();
        self.depth_upward(access_list, &mut seen).await
    }

    /// Checks that `child` may be added as a nested member of `parent`.
    ///
    /// Rejects self-membership, a missing child, an edge that would close a
    /// cycle, and an edge that would push the longest chain through it past
    /// the configured maximum nesting depth.
    pub async fn validate_member_addition(&self, parent: &AccessList, child: &str) -> Result<()> {
        if parent.name == child {
            return Err(Error::validation(format!(
                "access list '{}' cannot be a member of itself",
                parent.name
            )));
        }

        let child_list = self.reader.get_access_list(child).await?;

        let ancestors = self.ancestors_for(parent, RelationshipKind::Member).await?;
        if ancestors.iter().any(|ancestor| ancestor.name == child) {
            return Err(Error::validation(format!(
                "adding '{child}' to '{}' would create a membership cycle",
                parent.name
            )));
        }

        let up = self.max_depth_upward(parent).await?;
        let down = self.max_depth_downward(&child_list.name).await?;
        let depth = up + 1 + down;
        debug!(parent = %parent.name, child, depth, "validated nesting depth");
        if depth > self.config.max_nesting_depth {
            return Err(Error::validation(format!(
                "adding '{child}' to '{}' would nest {depth} levels deep, the maximum is {}",
                parent.name, self.config.max_nesting_depth
            )));
        }

        Ok(())
    }

    /// Checks that `owner_list` may be added as an owner of `parent`.
    pub async fn validate_owner_addition(&self, parent: &AccessList, owner_list: &str) -> Result<()> {
        if parent.name == owner_list {
            return Err(Error::validation(format!(
                "access list '{}' cannot own itself",
                parent.name
            )));
        }
        self.reader.get_access_list(owner_list).await?;
        Ok(())
    }

    fn depth_downward<'a>(
        &'a self,
        access_list: &'a str,
        seen: &'a mut HashSet<String>,
    ) -> BoxFuture<'a, Result<usize>> {
        async move {
            if !seen.insert(access_list.to_string()) {
                return Ok(0);
            }

            let mut max_depth = 0;
            for member in self.fetch_members(access_list).await? {
                if !member.is_list() {
                    continue;
                }
                let depth = self.depth_downward(&member.name, seen).await? + 1;
                max_depth = max_depth.max(depth);
            }

            seen.remove(access_list);
            Ok(max_depth)
        }
        .boxed()
    }

    fn depth_upward<'a>(
        &'a self,
        access_list: &'a AccessList,
        seen: &'a mut HashSet<String>,
    ) -> BoxFuture<'a, Result<usize>> {
        async move {
            if !seen.insert(access_list.name.clone()) {
                return Ok(0);
            }

            let mut max_depth = 0;
            for parent_name in &access_list.member_of {
                let parent = self.reader.get_access_list(parent_name).await?;
                let depth = self.depth_upward(&parent, seen).await? + 1;
                max_depth = max_depth.max(depth);
            }

            seen.remove(&access_list.name);
            Ok(max_depth)
        }
        .boxed()
    }
}
