#![doc = include_str!("../README.md")]

//! Roster Core
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy and Result alias
//! - [`types`]: Access lists, members, owners, grants, principals, locks
//! - [`traits`]: Storage, lock and clock collaborators
//! - [`config`]: Engine and logging configuration

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key types at crate root for convenience
pub use config::{HierarchyConfig, LogConfig, RosterConfig};
pub use error::{Error, Result};
pub use traits::{AccessListReader, Clock, FixedClock, LockSource, SystemClock};
pub use types::{
    AccessList, AccessListMember, AssignmentType, Grants, IneligibleStatus, Lock, LockTarget,
    MembershipKind, Owner, Page, Principal, RelationshipKind, Requires, Traits, User,
};
