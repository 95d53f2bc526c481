//! Storage abstraction for the tournament catalog.
//!
//! Backends (`PgCatalogStore`, `MemoryCatalogStore`) implement this trait so
//! the api crate doesn't depend on any specific database engine or schema
//! details.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    NewTournament, NewUser, RegistrationOutcome, TournamentPatch, TournamentRecord, UserRecord,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

/// How many times a registration re-reads and re-tries its conditional
/// update before giving up with `Conflict`. The counter can change at most
/// `spots` times, so any bound >= spots terminates with a definite answer
/// for small tournaments; larger ones may surface `Conflict` to the caller.
pub const MAX_CAS_ATTEMPTS: u32 = 3;

/// Window over a list query; `None` at the call site means "everything".
#[derive(Debug, Clone, Copy)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("capacity exceeded")]
    CapacityExceeded,
    #[error("conflict")]
    Conflict,
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Backend(other.to_string()),
        }
    }
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    // --- users ---

    async fn create_user(&self, params: NewUser) -> Result<UserRecord, StoreError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Batch lookup for resolving participant sets; unknown ids are skipped.
    async fn get_users(&self, ids: &[Uuid]) -> Result<Vec<UserRecord>, StoreError>;

    // --- tournament catalog ---

    async fn create_tournament(
        &self,
        params: NewTournament,
    ) -> Result<TournamentRecord, StoreError>;

    async fn get_tournament(&self, id: Uuid) -> Result<Option<TournamentRecord>, StoreError>;

    /// Soonest date first. `None` fetches the whole catalog; explicit
    /// pagination is clamped by callers.
    async fn list_tournaments(
        &self,
        page: Option<LimitOffset>,
    ) -> Result<Vec<TournamentRecord>, StoreError>;

    async fn update_tournament(
        &self,
        id: Uuid,
        patch: TournamentPatch,
    ) -> Result<TournamentRecord, StoreError>;

    /// Hard delete. Deleting an id that no longer exists is a no-op.
    async fn delete_tournament(&self, id: Uuid) -> Result<(), StoreError>;

    // --- registration ---

    /// Adds `user_id` to the participant set and bumps the used-spot counter
    /// as one conditional transaction. Either both change or neither does.
    ///
    /// Outcomes: `Registered` on success, `AlreadyRegistered` when the user
    /// holds a spot (no-op), `CapacityExceeded` when the tournament is full,
    /// `Conflict` when the optimistic retries are exhausted.
    async fn register_participant(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> Result<RegistrationOutcome, StoreError>;
}
