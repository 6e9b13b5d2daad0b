//! Transitive parent lists.
//!
//! Membership ancestors follow `member_of` edges to any depth. Ownership
//! ancestors are the lists owned (one `owner_of` hop) by the list itself or by
//! any of its membership ancestors: a member of an owner list owns what that
//! list owns, but an owner of an owner list is not thereby an owner.
//!
//! The origin is dropped from membership ancestors when a cycle leads back to
//! it. A list that names itself as an owner stays among its own ownership
//! ancestors and so inherits its own owner grants.
//!
//! NOTE: `owner_of` is followed for exactly one hop. Making it transitive
//! changes who owns what and needs a policy decision first.

use std::collections::{BTreeMap, HashSet};

use futures::future::{BoxFuture, FutureExt};
use roster_core::{AccessList, AccessListReader, RelationshipKind, Result};
use tracing::debug;

use crate::Hierarchy;

impl<R> Hierarchy<R>
where
    R: AccessListReader + ?Sized,
{
    /// Returns the ancestors of `access_list` for the given relationship.
    ///
    /// Ancestors are deduplicated by name and sorted by name. The list itself
    /// is never its own membership ancestor, even when a cycle leads back to
    /// it.
    pub async fn ancestors_for(
        &self,
        access_list: &AccessList,
        kind: RelationshipKind,
    ) -> Result<Vec<AccessList>> {
        let mut visited = HashSet::new();
        let mut ancestors = BTreeMap::new();
        self.collect_ancestors(access_list, kind, &mut visited, &mut ancestors)
            .await?;
        if kind == RelationshipKind::Member {
            ancestors.remove(&access_list.name);
        }
        Ok(ancestors.into_values().collect())
    }

    fn collect_ancestors<'a>(
        &'a self,
        access_list: &'a AccessList,
        kind: RelationshipKind,
        visited: &'a mut HashSet<String>,
        ancestors: &'a mut BTreeMap<String, AccessList>,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            if !visited.insert(access_list.name.clone()) {
                debug!(access_list = %access_list.name, "ancestor walk revisited list");
                return Ok(());
            }

            if kind == RelationshipKind::Owner {
                for parent_name in &access_list.owner_of {
                    let parent = self.reader.get_access_list(parent_name).await?;
                    ancestors.insert(parent_name.clone(), parent);
                }
            }

            for parent_name in &access_list.member_of {
                let parent = self.reader.get_access_list(parent_name).await?;
                if kind == RelationshipKind::Member {
                    ancestors.insert(parent_name.clone(), parent.clone());
                }
                self.collect_ancestors(&parent, kind, visited, ancestors)
                    .await?;
            }

            Ok(())
        }
        .boxed()
    }
}
