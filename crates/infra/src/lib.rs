pub mod db;
pub mod models;
pub mod projection;
pub mod store;

pub use models::{
    NewTournament, NewUser, RegistrationOutcome, TournamentPatch, TournamentRecord, UserRecord,
};
pub use store::{CatalogStore, LimitOffset, MemoryCatalogStore, PgCatalogStore, StoreError};
