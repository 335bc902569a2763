//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository,
//! cache and notification calls. Services consume traits and provide a clean
//! API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and resolution
pub mod services;
