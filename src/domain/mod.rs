//! Domain layer containing business entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`access_event`] - Access event model for webhooks
//! - [`notifier`] - Outbound webhook trait
//! - [`notification_worker`] - Bounded queue and background delivery
//!
//! # Notification Flow
//!
//! 1. [`crate::application::services::LinkService::resolve`] finds a link
//! 2. An [`access_event::AccessEvent`] is queued without waiting
//! 3. [`notification_worker::run_notification_worker`] delivers it with its own timeout
//! 4. Failures are logged, never retried, never seen by the visitor

pub mod access_event;
pub mod entities;
pub mod notification_worker;
pub mod notifier;
pub mod repositories;
