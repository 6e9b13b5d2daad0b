//! Access list data model.

mod access_list;
mod kinds;
mod lock;
mod member;
mod page;
mod policy;
mod principal;
mod proptests;

pub use access_list::{AccessList, IneligibleStatus, Owner};
pub use kinds::{AssignmentType, RelationshipKind};
pub use lock::{Lock, LockTarget};
pub use member::{AccessListMember, MembershipKind};
pub use page::Page;
pub use policy::{Grants, Requires, Traits};
pub use principal::{Principal, User};
