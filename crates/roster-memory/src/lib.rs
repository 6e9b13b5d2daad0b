#![doc = include_str!("../README.md")]

//! # Modules
//!
//! - [`store`]: `MemoryStore`, an in-process reader and lock source
//! - [`fixture`]: TOML fixture loading

pub mod fixture;
pub mod store;

pub use fixture::Fixture;
pub use store::{DEFAULT_PAGE_SIZE, MemoryStore};
