//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`LinkRecord`] - A stored short link
//! - [`LinkTargets`] - The deduplicated URL fields of a link
//! - [`LinkMetadata`] - Open Graph display fields
//! - [`LinkFields`] - Everything a caller supplies on creation
//! - [`NewLink`] - Insert payload handed to the store

pub mod link;

pub use link::{LinkFields, LinkMetadata, LinkRecord, LinkTargets, NewLink, Platform};
