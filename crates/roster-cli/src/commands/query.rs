//! Read-only hierarchy queries: members, owners, ancestors, grants, depth.

use anyhow::Result;
use roster_core::RelationshipKind;
use serde_json::{Value, json};

use crate::session::Session;

pub async fn members(session: &Session, list: &str) -> Result<Value> {
    let members = session.hierarchy().members_for(list).await?;
    Ok(serde_json::to_value(members)?)
}

pub async fn owners(session: &Session, list: &str) -> Result<Value> {
    let access_list = session.list(list).await?;
    let owners = session.hierarchy().owners_for(&access_list).await?;
    Ok(serde_json::to_value(owners)?)
}

pub async fn ancestors(session: &Session, list: &str, kind: RelationshipKind) -> Result<Value> {
    let access_list = session.list(list).await?;
    let ancestors = session.hierarchy().ancestors_for(&access_list, kind).await?;
    let names: Vec<&str> = ancestors.iter().map(|a| a.name.as_str()).collect();
    Ok(json!(names))
}

pub async fn grants(session: &Session, list: &str) -> Result<Value> {
    let access_list = session.list(list).await?;
    let grants = session.hierarchy().inherited_grants(&access_list).await?;
    Ok(serde_json::to_value(grants)?)
}

pub async fn depth(session: &Session, list: &str) -> Result<Value> {
    let access_list = session.list(list).await?;
    let upward = session.hierarchy().max_depth_upward(&access_list).await?;
    let downward = session.hierarchy().max_depth_downward(list).await?;
    Ok(json!({
        "access_list": list,
        "upward": upward,
        "downward": downward,
    }))
}
