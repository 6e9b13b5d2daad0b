//! Flattened membership.

use std::collections::HashSet;

use futures::future::{BoxFuture, FutureExt};
use roster_core::{AccessListMember, AccessListReader, Result};
use tracing::debug;

use crate::Hierarchy;

impl<R> Hierarchy<R>
where
    R: AccessListReader + ?Sized,
{
    /// Returns the leaf members of `access_list`, descending into nested lists.
    ///
    /// Entries are not checked for expiry or requirements; use
    /// [`is_member`](Hierarchy::is_member) for a validated answer. A list is
    /// expanded at most once per call, which cuts cycles. A principal reached
    /// through two different nested lists appears once per list.
    pub async fn members_for(&self, access_list: &str) -> Result<Vec<AccessListMember>> {
        let mut visited = HashSet::new();
        self.collect_members(access_list, &mut visited).await
    }

    fn collect_members<'a>(
        &'a self,
        access_list: &'a str,
        visited: &'a mut HashSet<String>,
    ) -> BoxFuture<'a, Result<Vec<AccessListMember>>> {
        async move {
            if !visited.insert(access_list.to_string()) {
                debug!(access_list, "already expanded, skipping");
                return Ok(Vec::new());
            }

            let direct = self.fetch_members(access_list).await?;
            let mut members = Vec::with_capacity(direct.len());
            for member in direct {
                if !member.is_list() {
                    members.push(member);
                    continue;
                }
                let nested = self.collect_members(&member.name, visited).await?;
                members.extend(nested);
            }

            Ok(members)
        }
        .boxed()
    }
}
