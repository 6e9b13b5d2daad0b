//! Membership and ownership decisions: locks, requirements, expiry and
//! alternative paths.

use std::sync::Arc;

use chrono::Duration;
use roster_core::{
    AccessList, AccessListMember, AssignmentType, Error, Lock, Owner, Requires, User,
};
use roster_hierarchy::Hierarchy;

use crate::common::{BrokenLocks, FlakyReader, RecordingReader, TestHarness, t0};

#[tokio::test]
async fn test_lock_wins_over_valid_membership() {
    let h = TestHarness::new();
    let eng = h.put(AccessList::new("eng").with_owner(Owner::user("alice"))).await;
    h.add_user("eng", "alice").await;
    h.lock(Lock::on_user("incident-42", "alice")).await;

    let alice = User::new("alice");
    let err = h.hierarchy().is_member(&alice, &eng).await.unwrap_err();
    assert!(err.is_locked());
    assert!(err.is_access_denied());
    assert!(!err.is_retryable());

    let err = h.hierarchy().is_owner(&alice, &eng).await.unwrap_err();
    assert!(err.is_locked());
}

#[tokio::test]
async fn test_lock_applies_even_without_membership() {
    let h = TestHarness::new();
    let eng = h.put(AccessList::new("eng")).await;
    h.lock(Lock::on_user("offboarding", "mallory")).await;

    let err = h
        .hierarchy()
        .is_member(&User::new("mallory"), &eng)
        .await
        .unwrap_err();
    assert!(err.is_locked());
}

#[tokio::test]
async fn test_lapsed_lock_is_ignored() {
    let h = TestHarness::new();
    let eng = h.put(AccessList::new("eng")).await;
    h.add_user("eng", "alice").await;
    h.lock(Lock {
        expires: Some(t0() - Duration::minutes(5)),
        ..Lock::on_user("old", "alice")
    })
    .await;

    let result = h.hierarchy().is_member(&User::new("alice"), &eng).await.unwrap();
    assert_eq!(result, AssignmentType::Explicit);
}

#[tokio::test]
async fn test_lock_on_someone_else_is_ignored() {
    let h = TestHarness::new();
    let eng = h.put(AccessList::new("eng")).await;
    h.add_user("eng", "alice").await;
    h.lock(Lock::on_user("other", "bob")).await;

    let result = h.hierarchy().is_member(&User::new("alice"), &eng).await.unwrap();
    assert_eq!(result, AssignmentType::Explicit);
}

#[tokio::test]
async fn test_lock_source_failure_propagates() {
    let h = TestHarness::new();
    let eng = h.put(AccessList::new("eng")).await;
    h.add_user("eng", "alice").await;

    let hierarchy = Hierarchy::new(h.store.clone()).with_lock_source(Arc::new(BrokenLocks));
    let err = hierarchy
        .is_member(&User::new("alice"), &eng)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Backend { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_no_lock_source_skips_lock_check() {
    let h = TestHarness::new();
    let eng = h.put(AccessList::new("eng")).await;
    h.add_user("eng", "alice").await;
    h.lock(Lock::on_user("incident", "alice")).await;

    let hierarchy = Hierarchy::new(h.store.clone()).with_clock(h.clock.clone());
    let result = hierarchy.is_member(&User::new("alice"), &eng).await.unwrap();
    assert_eq!(result, AssignmentType::Explicit);
}

#[tokio::test]
async fn test_expiry_past_future_and_unset() {
    let h = TestHarness::new();
    let eng = h.put(AccessList::new("eng")).await;
    h.add(AccessListMember::user("eng", "past").with_expires(t0() - Duration::days(1)))
        .await;
    h.add(AccessListMember::user("eng", "future").with_expires(t0() + Duration::days(1)))
        .await;
    h.add_user("eng", "forever").await;

    let hierarchy = h.hierarchy();
    let err = hierarchy
        .is_member(&User::new("past"), &eng)
        .await
        .unwrap_err();
    assert!(err.is_access_denied());
    assert!(err.to_string().contains("'past's membership in Access List 'eng' has expired"));

    for name in ["future", "forever"] {
        let result = hierarchy.is_member(&User::new(name), &eng).await.unwrap();
        assert_eq!(result, AssignmentType::Explicit, "{name}");
    }
}

#[tokio::test]
async fn test_expiry_follows_the_clock() {
    let h = TestHarness::new();
    let eng = h.put(AccessList::new("eng")).await;
    h.add(AccessListMember::user("eng", "temp").with_expires(t0() + Duration::hours(8)))
        .await;

    let hierarchy = h.hierarchy();
    let temp = User::new("temp");
    assert!(hierarchy.is_member(&temp, &eng).await.is_ok());

    h.clock.advance(Duration::hours(9));
    assert!(hierarchy.is_member(&temp, &eng).await.is_err());
}

#[tokio::test]
async fn test_failing_path_does_not_hide_later_success() {
    // eng lists the nested "vip" list first, whose policy alice fails, then
    // alice directly.
    let h = TestHarness::new();
    let eng = h.put(AccessList::new("eng")).await;
    h.put(AccessList::new("vip").with_membership_requires(Requires::new().with_role("vip")))
        .await;
    h.nest("eng", "vip").await;
    h.add_user("vip", "alice").await;
    h.add_user("eng", "alice").await;

    let result = h.hierarchy().is_member(&User::new("alice"), &eng).await.unwrap();
    assert_eq!(result, AssignmentType::Explicit);
}

#[tokio::test]
async fn test_expired_direct_entry_falls_back_to_nested_path() {
    let h = TestHarness::new();
    let eng = h.put(AccessList::new("eng")).await;
    h.lists(&["sre"]).await;
    h.add(AccessListMember::user("eng", "bob").with_expires(t0() - Duration::hours(1)))
        .await;
    h.nest("eng", "sre").await;
    h.add_user("sre", "bob").await;

    let result = h.hierarchy().is_member(&User::new("bob"), &eng).await.unwrap();
    assert_eq!(result, AssignmentType::Inherited);
}

#[tokio::test]
async fn test_outer_requirements_apply_to_inherited_members() {
    let h = TestHarness::new();
    let eng = h
        .put(
            AccessList::new("eng")
                .with_title("Engineering")
                .with_membership_requires(Requires::new().with_trait("dept", "eng")),
        )
        .await;
    h.lists(&["sre"]).await;
    h.nest("eng", "sre").await;
    h.add_user("sre", "bob").await;

    let hierarchy = h.hierarchy();
    let err = hierarchy
        .is_member(&User::new("bob"), &eng)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("'Engineering'"));

    let bob = User::new("bob").with_trait("dept", "eng");
    assert_eq!(
        hierarchy.is_member(&bob, &eng).await.unwrap(),
        AssignmentType::Inherited
    );
}

#[tokio::test]
async fn test_last_denial_is_reported() {
    let h = TestHarness::new();
    let eng = h
        .put(AccessList::new("eng").with_membership_requires(Requires::new().with_role("staff")))
        .await;
    h.add(AccessListMember::user("eng", "carl").with_expires(t0() + Duration::days(1)))
        .await;
    h.lists(&["contractors"]).await;
    h.nest("eng", "contractors").await;
    h.add(AccessListMember::user("contractors", "carl").with_expires(t0() - Duration::days(1)))
        .await;

    // The direct entry fails on requirements; the nested one on expiry,
    // and that is the last denial recorded.
    let carl = User::new("carl").with_role("staff");
    let staffless = User::new("carl");
    let err = h.hierarchy().is_member(&staffless, &eng).await.unwrap_err();
    assert!(err.to_string().contains("has expired"));

    let err = h.hierarchy().is_member(&carl, &eng).await;
    assert_eq!(err.unwrap(), AssignmentType::Explicit);
}

#[tokio::test]
async fn test_reader_error_on_nested_list_is_recorded_as_denial() {
    let h = TestHarness::new();
    let eng = h.put(AccessList::new("eng")).await;
    h.lists(&["broken", "sre"]).await;
    h.nest("eng", "broken").await;
    h.add_user("broken", "bob").await;

    let reader = Arc::new(FlakyReader::new(h.store.clone(), &["broken"]));
    let hierarchy = Hierarchy::new(reader);

    let err = hierarchy
        .is_member(&User::new("bob"), &eng)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Backend { .. }));

    // A later healthy path still wins.
    h.nest("eng", "sre").await;
    h.add_user("sre", "bob").await;
    assert_eq!(
        hierarchy.is_member(&User::new("bob"), &eng).await.unwrap(),
        AssignmentType::Inherited
    );
}

#[tokio::test]
async fn test_membership_cycle_terminates() {
    let h = TestHarness::new();
    h.lists(&["a", "b", "c"]).await;
    h.nest("a", "b").await;
    h.nest("b", "c").await;
    h.nest("c", "a").await;
    h.add_user("c", "cy").await;

    let a = h.get("a").await;
    let hierarchy = h.hierarchy();
    assert_eq!(
        hierarchy.is_member(&User::new("cy"), &a).await.unwrap(),
        AssignmentType::Inherited
    );
    assert_eq!(
        hierarchy.is_member(&User::new("nobody"), &a).await.unwrap(),
        AssignmentType::Unspecified
    );
}

#[tokio::test]
async fn test_shared_sublist_is_evaluated_on_each_branch() {
    // root -> left -> shared (expired edge), root -> right -> shared.
    let h = TestHarness::new();
    let root = h.put(AccessList::new("root")).await;
    h.lists(&["left", "right", "shared"]).await;
    h.nest("root", "left").await;
    h.nest("root", "right").await;
    h.add(AccessListMember::list("left", "shared").with_expires(t0() - Duration::days(1)))
        .await;
    h.nest("right", "shared").await;
    h.add_user("shared", "sam").await;

    let result = h.hierarchy().is_member(&User::new("sam"), &root).await.unwrap();
    assert_eq!(result, AssignmentType::Inherited);
}

/// Builds `top -> (aN, bN) -> mN` for `layers` layers, each `mN` parenting
/// the next layer. Returns the number of lists created.
async fn layered_diamonds(h: &TestHarness, layers: usize) -> usize {
    h.lists(&["top"]).await;
    let mut parent = "top".to_string();
    for i in 0..layers {
        let (a, b, m) = (format!("a{i}"), format!("b{i}"), format!("m{i}"));
        h.lists(&[a.as_str(), b.as_str(), m.as_str()]).await;
        h.nest(&parent, &a).await;
        h.nest(&parent, &b).await;
        h.nest(&a, &m).await;
        h.nest(&b, &m).await;
        parent = m;
    }
    1 + 3 * layers
}

#[tokio::test]
async fn test_layered_diamonds_scan_each_list_once() {
    let h = TestHarness::new();
    let lists = layered_diamonds(&h, 12).await;
    let top = h.get("top").await;

    let reader = Arc::new(RecordingReader::new(h.store.clone()));
    let hierarchy = Hierarchy::new(reader.clone()).with_clock(h.clock.clone());
    let result = hierarchy.is_member(&User::new("nobody"), &top).await.unwrap();
    assert_eq!(result, AssignmentType::Unspecified);
    assert_eq!(reader.calls(), lists);

    h.add_user("m11", "deep").await;
    let result = hierarchy.is_member(&User::new("deep"), &top).await.unwrap();
    assert_eq!(result, AssignmentType::Inherited);
}

#[tokio::test]
async fn test_owner_lists_share_settled_outcomes() {
    let h = TestHarness::new();
    layered_diamonds(&h, 6).await;
    let eng = h
        .put(
            AccessList::new("eng")
                .with_owner(Owner::list("a0"))
                .with_owner(Owner::list("b0")),
        )
        .await;

    let reader = Arc::new(RecordingReader::new(h.store.clone()));
    let hierarchy = Hierarchy::new(reader.clone()).with_clock(h.clock.clone());
    let result = hierarchy.is_owner(&User::new("nobody"), &eng).await.unwrap();
    assert_eq!(result, AssignmentType::Unspecified);
    // a0, b0 and everything below m0, each once.
    assert_eq!(reader.calls(), 2 + 1 + 3 * 5);
}

#[tokio::test]
async fn test_cycle_cut_outcome_is_not_reused() {
    // root -> x (expired edge), root -> y; x -> y, x -> u; y -> x.
    // Reached through x, y only sees x cut by the cycle. Reached directly
    // from root, y inherits u through x.
    let h = TestHarness::new();
    let root = h.put(AccessList::new("root")).await;
    h.lists(&["x", "y"]).await;
    h.add(AccessListMember::list("root", "x").with_expires(t0() - Duration::days(1)))
        .await;
    h.nest("root", "y").await;
    h.nest("x", "y").await;
    h.add_user("x", "u").await;
    h.nest("y", "x").await;

    let result = h.hierarchy().is_member(&User::new("u"), &root).await.unwrap();
    assert_eq!(result, AssignmentType::Inherited);
}

#[tokio::test]
async fn test_inherited_ownership_through_nested_owner_list() {
    let h = TestHarness::new();
    h.lists(&["leads", "staff"]).await;
    h.nest("leads", "staff").await;
    h.add_user("staff", "erin").await;
    let eng = h
        .put(
            AccessList::new("eng")
                .with_owner(Owner::list("leads"))
                .with_ownership_requires(Requires::new().with_role("manager")),
        )
        .await;

    let hierarchy = h.hierarchy();
    let err = hierarchy
        .is_owner(&User::new("erin"), &eng)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ownership requirements"));

    let manager = User::new("erin").with_role("manager");
    assert_eq!(
        hierarchy.is_owner(&manager, &eng).await.unwrap(),
        AssignmentType::Inherited
    );
}

#[tokio::test]
async fn test_owner_list_failure_does_not_block_direct_owner() {
    let h = TestHarness::new();
    let eng = h
        .put(
            AccessList::new("eng")
                .with_owner(Owner::list("ghost"))
                .with_owner(Owner::user("zoe")),
        )
        .await;

    let hierarchy = h.hierarchy();
    assert_eq!(
        hierarchy.is_owner(&User::new("zoe"), &eng).await.unwrap(),
        AssignmentType::Explicit
    );
    let err = hierarchy
        .is_owner(&User::new("yan"), &eng)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_empty_list_is_unspecified_without_error() {
    let h = TestHarness::new();
    let empty = h.put(AccessList::new("empty")).await;
    let hierarchy = h.hierarchy();
    assert_eq!(
        hierarchy.is_member(&User::new("anyone"), &empty).await.unwrap(),
        AssignmentType::Unspecified
    );
    assert_eq!(
        hierarchy.is_owner(&User::new("anyone"), &empty).await.unwrap(),
        AssignmentType::Unspecified
    );
}
