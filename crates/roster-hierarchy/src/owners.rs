//! Flattened ownership.

use std::collections::{BTreeMap, HashSet};

use roster_core::{AccessList, AccessListReader, IneligibleStatus, MembershipKind, Owner, Result};
use tracing::debug;

use crate::Hierarchy;

impl<R> Hierarchy<R>
where
    R: AccessListReader + ?Sized,
{
    /// Returns the effective owners of `access_list`.
    ///
    /// User owners are returned as declared. Each owner list contributes its
    /// flattened members (see [`members_for`](Hierarchy::members_for)) as
    /// synthetic user owners with a cleared eligibility status. Owners are
    /// deduplicated by name, the last entry for a name winning, and returned
    /// sorted by name.
    pub async fn owners_for(&self, access_list: &AccessList) -> Result<Vec<Owner>> {
        let mut owners: BTreeMap<String, Owner> = BTreeMap::new();
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(access_list.name.clone());

        for owner in &access_list.owners {
            if !owner.is_list() {
                owners.insert(owner.name.clone(), owner.clone());
                continue;
            }

            if !visited.insert(owner.name.clone()) {
                debug!(owner_list = %owner.name, "owner list already expanded");
                continue;
            }

            for member in self.members_for(&owner.name).await? {
                owners.insert(member.name.clone(), member_as_owner(member.name, member.description));
            }
        }

        Ok(owners.into_values().collect())
    }
}

fn member_as_owner(name: String, description: String) -> Owner {
    Owner {
        name,
        description,
        kind: MembershipKind::User,
        ineligible_status: IneligibleStatus::Unspecified,
    }
}
