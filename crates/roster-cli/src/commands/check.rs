//! Assignment checks and edit validation.

use anyhow::Result;
use roster_core::AssignmentType;
use serde_json::{Value, json};

use crate::session::Session;

pub async fn is_member(session: &Session, user: &str, list: &str) -> Result<Value> {
    let access_list = session.list(list).await?;
    let assignment = session
        .hierarchy()
        .is_member(&session.user(user), &access_list)
        .await?;
    Ok(assignment_json(user, list, assignment))
}

pub async fn is_owner(session: &Session, user: &str, list: &str) -> Result<Value> {
    let access_list = session.list(list).await?;
    let assignment = session
        .hierarchy()
        .is_owner(&session.user(user), &access_list)
        .await?;
    Ok(assignment_json(user, list, assignment))
}

pub async fn validate_member(session: &Session, parent: &str, child: &str) -> Result<Value> {
    let parent_list = session.list(parent).await?;
    session
        .hierarchy()
        .validate_member_addition(&parent_list, child)
        .await?;
    Ok(json!({ "parent": parent, "member": child, "valid": true }))
}

pub async fn validate_owner(session: &Session, parent: &str, owner: &str) -> Result<Value> {
    let parent_list = session.list(parent).await?;
    session
        .hierarchy()
        .validate_owner_addition(&parent_list, owner)
        .await?;
    Ok(json!({ "parent": parent, "owner": owner, "valid": true }))
}

fn assignment_json(user: &str, list: &str, assignment: AssignmentType) -> Value {
    json!({
        "user": user,
        "access_list": list,
        "assignment": assignment,
        "assigned": assignment.is_assigned(),
    })
}
