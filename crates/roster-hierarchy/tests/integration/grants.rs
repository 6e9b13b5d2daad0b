//! Ancestors and inherited grants.

use roster_core::{AccessList, Grants, Owner, RelationshipKind};

use crate::common::TestHarness;

fn names(lists: &[AccessList]) -> Vec<&str> {
    lists.iter().map(|l| l.name.as_str()).collect()
}

#[tokio::test]
async fn test_two_cycle_ancestors_are_exactly_the_other_list() {
    let h = TestHarness::new();
    h.lists(&["a", "b"]).await;
    h.nest("b", "a").await;
    h.nest("a", "b").await;

    let a = h.get("a").await;
    let ancestors = h
        .hierarchy()
        .ancestors_for(&a, RelationshipKind::Member)
        .await
        .unwrap();
    assert_eq!(names(&ancestors), vec!["b"]);
}

#[tokio::test]
async fn test_owner_ancestors_through_member_parents() {
    // team is a member of dept; dept owns budget and payroll; team owns wiki.
    let h = TestHarness::new();
    h.lists(&["team", "dept"]).await;
    h.nest("dept", "team").await;
    h.put(AccessList::new("budget").with_owner(Owner::list("dept"))).await;
    h.put(AccessList::new("payroll").with_owner(Owner::list("dept"))).await;
    h.put(AccessList::new("wiki").with_owner(Owner::list("team"))).await;

    let team = h.get("team").await;
    let hierarchy = h.hierarchy();

    let owner = hierarchy
        .ancestors_for(&team, RelationshipKind::Owner)
        .await
        .unwrap();
    assert_eq!(names(&owner), vec!["budget", "payroll", "wiki"]);

    let member = hierarchy
        .ancestors_for(&team, RelationshipKind::Member)
        .await
        .unwrap();
    assert_eq!(names(&member), vec!["dept"]);
}

#[tokio::test]
async fn test_grants_are_sorted_and_deduplicated() {
    let h = TestHarness::new();
    h.lists(&["leaf"]).await;
    h.put(AccessList::new("x").with_grants(Grants::new().with_role("b").with_role("a")))
        .await;
    h.put(AccessList::new("y").with_grants(Grants::new().with_role("a").with_role("c")))
        .await;
    h.nest("x", "leaf").await;
    h.nest("y", "leaf").await;

    let leaf = h.get("leaf").await;
    let grants = h.hierarchy().inherited_grants(&leaf).await.unwrap();
    assert_eq!(grants.roles, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_grants_independent_of_edge_order() {
    async fn roles(order: [&str; 2]) -> Vec<String> {
        let h = TestHarness::new();
        h.lists(&["leaf"]).await;
        h.put(
            AccessList::new("x")
                .with_grants(Grants::new().with_role("b").with_trait("env", "prod")),
        )
        .await;
        h.put(
            AccessList::new("y")
                .with_grants(Grants::new().with_role("a").with_trait("env", "dev")),
        )
        .await;
        for parent in order {
            h.nest(parent, "leaf").await;
        }
        let leaf = h.get("leaf").await;
        let grants = h.hierarchy().inherited_grants(&leaf).await.unwrap();
        assert_eq!(grants.traits["env"], vec!["dev", "prod"]);
        grants.roles
    }

    assert_eq!(roles(["x", "y"]).await, roles(["y", "x"]).await);
}

#[tokio::test]
async fn test_owner_grants_flow_to_owner_list_members_only() {
    let h = TestHarness::new();
    h.lists(&["admins"]).await;
    h.put(
        AccessList::new("prod")
            .with_owner(Owner::list("admins"))
            .with_grants(Grants::new().with_role("prod-reader"))
            .with_owner_grants(Grants::new().with_role("prod-admin")),
    )
    .await;

    let admins = h.get("admins").await;
    let grants = h.hierarchy().inherited_grants(&admins).await.unwrap();
    assert_eq!(grants.roles, vec!["prod-admin"]);
}

#[tokio::test]
async fn test_root_list_inherits_nothing() {
    let h = TestHarness::new();
    let root = h.put(AccessList::new("root")).await;
    let grants = h.hierarchy().inherited_grants(&root).await.unwrap();
    assert!(grants.is_empty());
}
