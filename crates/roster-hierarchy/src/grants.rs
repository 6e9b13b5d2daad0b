//! Grants inherited from ancestor lists.

use std::collections::{BTreeMap, BTreeSet};

use roster_core::{AccessList, AccessListReader, Grants, RelationshipKind, Result};

use crate::Hierarchy;

impl<R> Hierarchy<R>
where
    R: AccessListReader + ?Sized,
{
    /// Returns the grants `access_list` inherits from its ancestors.
    ///
    /// Membership ancestors contribute their member grants; ownership
    /// ancestors contribute their owner grants. The result is deduplicated
    /// and sorted, so it does not depend on the order ancestors are visited.
    pub async fn inherited_grants(&self, access_list: &AccessList) -> Result<Grants> {
        let member_ancestors = self
            .ancestors_for(access_list, RelationshipKind::Member)
            .await?;
        let owner_ancestors = self
            .ancestors_for(access_list, RelationshipKind::Owner)
            .await?;

        let contributions = member_ancestors
            .iter()
            .map(|ancestor| &ancestor.grants)
            .chain(owner_ancestors.iter().map(|ancestor| &ancestor.owner_grants));

        Ok(merge_grants(contributions))
    }
}

/// Merges grant sets into one sorted, deduplicated set.
///
/// Trait keys that end up with no values are omitted.
pub fn merge_grants<'a, I>(grants: I) -> Grants
where
    I: IntoIterator<Item = &'a Grants>,
{
    let mut roles: BTreeSet<&str> = BTreeSet::new();
    let mut traits: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for grant in grants {
        roles.extend(grant.roles.iter().map(String::as_str));
        for (key, values) in &grant.traits {
            for value in values {
                traits.entry(key.as_str()).or_default().insert(value.as_str());
            }
        }
    }

    Grants {
        roles: roles.into_iter().map(str::to_string).collect(),
        traits: traits
            .into_iter()
            .map(|(key, values)| {
                (
                    key.to_string(),
                    values.into_iter().map(str::to_string).collect(),
                )
            })
            .collect(),
    }
}
