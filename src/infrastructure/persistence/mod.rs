//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, lookup and lifecycle updates

pub mod pg_link_repository;

pub use pg_link_repository::PgLinkRepository;
