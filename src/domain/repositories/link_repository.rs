//! Repository trait for link storage.

use crate::domain::entities::{LinkRecord, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for stored links.
///
/// The store is the source of truth. Implementations must distinguish "not
/// found" (`Ok(None)`) from failure (`Err`), and must be safe to share across
/// concurrent requests.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link and returns it with its assigned id.
    ///
    /// The insert is atomic with respect to the fingerprint: if a live link
    /// with the same fingerprint already exists, nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the fingerprint is already taken.
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    /// Returns [`AppError::Internal`] on other database errors.
    async fn insert(&self, new_link: NewLink) -> Result<LinkRecord, AppError>;

    /// Finds the live (not soft-deleted) link with the given fingerprint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on database errors.
    async fn find_by_fingerprint(&self, fingerprint: &str)
    -> Result<Option<LinkRecord>, AppError>;

    /// Finds a link by id, including inactive and soft-deleted ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<LinkRecord>, AppError>;

    /// Sets the active flag. Returns `Ok(false)` if no live link has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on database errors.
    async fn set_active(&self, id: i64, active: bool) -> Result<bool, AppError>;

    /// Soft-deletes a link by setting `deleted_at = now()`.
    ///
    /// Returns `Ok(false)` if not found or already deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on database errors.
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError>;

    /// Round-trips to the store for health checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot answer.
    async fn ping(&self) -> Result<(), AppError>;
}
