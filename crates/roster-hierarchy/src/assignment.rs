//! Membership and ownership decisions for a single principal.
//!
//! A check scans the list's direct entries in backend order. A failed path
//! records a denial and scanning continues; the first eligible path wins. When
//! no path succeeds the last recorded denial is returned, or
//! [`AssignmentType::Unspecified`] if nothing matched at all.
//!
//! Each check keeps the lists on the current path for cycle detection and a
//! memo of every nested list's finished outcome. An outcome is memoised only
//! when no cycle cut back to a list above it shaped the result, so a shared
//! sub-list is scanned once per check however many branches reach it.

use std::collections::{HashMap, HashSet};

use futures::future::{BoxFuture, FutureExt};
use roster_core::{
    AccessList, AccessListReader, AssignmentType, Error, LockTarget, Principal, Result,
};
use tracing::{debug, warn};

use crate::requirements::meets_requirements;
use crate::Hierarchy;

impl<R> Hierarchy<R>
where
    R: AccessListReader + ?Sized,
{
    /// Decides whether `principal` is a member of `access_list`.
    ///
    /// # Errors
    ///
    /// - [`Error::Locked`] if the principal holds an active lock. No other
    ///   evaluation happens.
    /// - [`Error::AccessDenied`] (or a backend error met along a nested path)
    ///   if a matching entry exists but no path is eligible.
    /// - Backend errors from the lock source or from fetching the top-level
    ///   member pages.
    pub async fn is_member<P>(&self, principal: &P, access_list: &AccessList) -> Result<AssignmentType>
    where
        P: Principal + ?Sized,
    {
        self.ensure_not_locked(principal).await?;
        let mut walk = Walk::default();
        let assignment = self.member_assignment(principal, access_list, &mut walk).await?;
        debug!(
            principal = principal.name(),
            access_list = %access_list.name,
            %assignment,
            "membership evaluated"
        );
        Ok(assignment)
    }

    /// Decides whether `principal` is an owner of `access_list`.
    ///
    /// A principal owns a list if it is named as a user owner, or if it is a
    /// member (explicit or inherited) of a list named as an owner. Either way
    /// the list's ownership requirements must also be met.
    ///
    /// # Errors
    ///
    /// As for [`is_member`](Hierarchy::is_member).
    pub async fn is_owner<P>(&self, principal: &P, access_list: &AccessList) -> Result<AssignmentType>
    where
        P: Principal + ?Sized,
    {
        self.ensure_not_locked(principal).await?;

        let mut walk = Walk::default();
        let mut denial: Option<Error> = None;

        for owner in &access_list.owners {
            if !owner.is_list() {
                if owner.name != principal.name() {
                    continue;
                }
                if !meets_requirements(
                    principal.roles(),
                    principal.traits(),
                    &access_list.ownership_requires,
                ) {
                    denial = Some(ownership_denied(principal, access_list));
                    continue;
                }
                return Ok(AssignmentType::Explicit);
            }

            match self.nested_assignment(principal, &owner.name, &mut walk).await {
                Ok(assignment) if assignment.is_assigned() => {
                    if !meets_requirements(
                        principal.roles(),
                        principal.traits(),
                        &access_list.ownership_requires,
                    ) {
                        denial = Some(ownership_denied(principal, access_list));
                        continue;
                    }
                    return Ok(AssignmentType::Inherited);
                }
                Ok(_) => {}
                Err(e) => denial = Some(e),
            }
        }

        match denial {
            Some(e) => Err(e),
            None => Ok(AssignmentType::Unspecified),
        }
    }

    async fn ensure_not_locked<P>(&self, principal: &P) -> Result<()>
    where
        P: Principal + ?Sized,
    {
        let Some(locks) = &self.locks else {
            return Ok(());
        };

        let active = locks
            .get_locks(true, &LockTarget::user(principal.name()))
            .await?;
        if let Some(lock) = active.first() {
            debug!(principal = principal.name(), lock = %lock.name, "principal is locked");
            return Err(Error::locked(principal.name()));
        }
        Ok(())
    }

    /// Membership of `principal` in the list called `name`, reached from a
    /// parent list.
    ///
    /// Memoised outcomes are replayed without touching the reader. A list
    /// already on the path is cut and reads as unassigned.
    fn nested_assignment<'a, P>(
        &'a self,
        principal: &'a P,
        name: &'a str,
        walk: &'a mut Walk,
    ) -> BoxFuture<'a, Result<AssignmentType>>
    where
        P: Principal + ?Sized,
    {
        async move {
            if let Some(settled) = walk.settled.get(name) {
                debug!(access_list = name, "reusing settled membership outcome");
                return replay(settled);
            }
            if walk.path.contains(name) {
                debug!(access_list = name, "membership cycle, skipping");
                walk.cuts.insert(name.to_string());
                return Ok(AssignmentType::Unspecified);
            }

            let nested = match self.reader.get_access_list(name).await {
                Ok(list) => list,
                Err(e) => {
                    warn!(nested_list = name, error = %e, "failed to load nested list");
                    return Err(e);
                }
            };
            self.member_assignment(principal, &nested, walk).await
        }
        .boxed()
    }

    /// Scans `access_list` with it pushed on the path, then settles the
    /// outcome unless a cycle cut to a list above it was taken.
    fn member_assignment<'a, P>(
        &'a self,
        principal: &'a P,
        access_list: &'a AccessList,
        walk: &'a mut Walk,
    ) -> BoxFuture<'a, Result<AssignmentType>>
    where
        P: Principal + ?Sized,
    {
        async move {
            if !walk.path.insert(access_list.name.clone()) {
                walk.cuts.insert(access_list.name.clone());
                return Ok(AssignmentType::Unspecified);
            }
            let outer_cuts = std::mem::take(&mut walk.cuts);

            let result = self.scan_members(principal, access_list, walk).await;

            walk.path.remove(&access_list.name);
            walk.cuts.remove(&access_list.name);
            if walk.cuts.is_empty() {
                walk.settled.insert(access_list.name.clone(), replay(&result));
            }
            walk.cuts.extend(outer_cuts);
            result
        }
        .boxed()
    }

    fn scan_members<'a, P>(
        &'a self,
        principal: &'a P,
        access_list: &'a AccessList,
        walk: &'a mut Walk,
    ) -> BoxFuture<'a, Result<AssignmentType>>
    where
        P: Principal + ?Sized,
    {
        async move {
            let members = self.fetch_members(&access_list.name).await?;
            let now = self.clock.now();
            let mut denial: Option<Error> = None;

            for member in &members {
                if !member.is_list() {
                    if member.name != principal.name() {
                        continue;
                    }
                    if !meets_requirements(
                        principal.roles(),
                        principal.traits(),
                        &access_list.membership_requires,
                    ) {
                        denial = Some(membership_denied(principal, access_list));
                        continue;
                    }
                    if member.is_expired_at(now) {
                        denial = Some(membership_expired(principal, access_list));
                        continue;
                    }
                    return Ok(AssignmentType::Explicit);
                }

                match self.nested_assignment(principal, &member.name, walk).await {
                    Ok(assignment) if assignment.is_assigned() => {
                        if !meets_requirements(
                            principal.roles(),
                            principal.traits(),
                            &access_list.membership_requires,
                        ) {
                            denial = Some(membership_denied(principal, access_list));
                            continue;
                        }
                        if member.is_expired_at(now) {
                            denial = Some(membership_expired(principal, access_list));
                            continue;
                        }
                        return Ok(AssignmentType::Inherited);
                    }
                    Ok(_) => {}
                    Err(e) => denial = Some(e),
                }
            }

            match denial {
                Some(e) => Err(e),
                None => Ok(AssignmentType::Unspecified),
            }
        }
        .boxed()
    }
}

/// Per-check traversal state.
#[derive(Default)]
struct Walk {
    /// Lists between the top-level call and the current one.
    path: HashSet<String>,
    /// Path lists cut by the scans since the innermost open list was entered.
    cuts: HashSet<String>,
    /// Finished outcomes that do not depend on the path they were reached by.
    settled: HashMap<String, Result<AssignmentType>>,
}

/// Copies an outcome. A backend error keeps its message but not its source.
fn replay(outcome: &Result<AssignmentType>) -> Result<AssignmentType> {
    match outcome {
        Ok(assignment) => Ok(*assignment),
        Err(Error::NotFound { kind, name }) => Err(Error::not_found(*kind, name.clone())),
        Err(Error::AccessDenied { message }) => Err(Error::access_denied(message.clone())),
        Err(Error::Locked { principal }) => Err(Error::locked(principal.clone())),
        Err(Error::Backend { message, .. }) => Err(Error::backend(message.clone())),
        Err(e) => Err(Error::backend(e.to_string())),
    }
}

fn membership_denied<P: Principal + ?Sized>(principal: &P, access_list: &AccessList) -> Error {
    Error::access_denied(format!(
        "User '{}' does not meet the membership requirements for Access List '{}'",
        principal.name(),
        access_list.display_name()
    ))
}

fn membership_expired<P: Principal + ?Sized>(principal: &P, access_list: &AccessList) -> Error {
    Error::access_denied(format!(
        "User '{}'s membership in Access List '{}' has expired",
        principal.name(),
        access_list.display_name()
    ))
}

fn ownership_denied<P: Principal + ?Sized>(principal: &P, access_list: &AccessList) -> Error {
    Error::access_denied(format!(
        "User '{}' does not meet the ownership requirements for Access List '{}'",
        principal.name(),
        access_list.display_name()
    ))
}
