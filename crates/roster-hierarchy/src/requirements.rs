//! Eligibility policy evaluation.

use roster_core::{Requires, Traits};

/// Returns `true` if `roles` and `traits` satisfy every part of `requires`.
///
/// Every required role must be held. For every required trait key the
/// principal must hold that key, and every listed value under it. An empty
/// policy is always met.
pub fn meets_requirements(roles: &[String], traits: &Traits, requires: &Requires) -> bool {
    if !requires.roles.iter().all(|role| roles.contains(role)) {
        return false;
    }

    requires.traits.iter().all(|(key, required)| {
        traits
            .get(key)
            .is_some_and(|held| required.iter().all(|value| held.contains(value)))
    })
}
