use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub auth_provider: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub id: Uuid,
    pub game_title: String,
    pub date: NaiveDate,
    pub location: String,
    pub spots: i32,
    pub used_spots: i32,
    pub prize_pool: String,
    pub details: Option<String>,
    pub participants: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when provisioning a profile; id and created_at are
/// generated by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub auth_provider: String,
    pub password_hash: Option<String>,
}

/// Fields accepted when an admin creates a tournament. The store seeds
/// used_spots = 0, an empty participant set and the creation timestamp;
/// callers cannot supply them.
#[derive(Debug, Clone)]
pub struct NewTournament {
    pub game_title: String,
    pub date: NaiveDate,
    pub location: String,
    pub spots: i32,
    pub prize_pool: String,
    pub details: Option<String>,
}

/// Editable fields for an admin update. id, created_at, used_spots and the
/// participant set are structurally absent, so an edit can never touch them.
#[derive(Debug, Clone)]
pub struct TournamentPatch {
    pub game_title: String,
    pub date: NaiveDate,
    pub location: String,
    pub spots: i32,
    pub prize_pool: String,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The caller took one spot; counts are post-registration.
    Registered { used_spots: i32, spots: i32 },
    /// The caller was already in the participant set; nothing changed.
    AlreadyRegistered,
}

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";
