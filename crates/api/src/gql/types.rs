use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, Enum, Error, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use infra::models::{ROLE_ADMIN, ROLE_USER};
use infra::{projection, TournamentRecord, UserRecord};

use crate::gql::loaders::UserLoader;
use crate::gql::scalars::SpotCount;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum Role {
    User,
    Admin,
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        if role == ROLE_ADMIN {
            Role::Admin
        } else {
            Role::User
        }
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Admin => ROLE_ADMIN,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub auth_provider: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(row: UserRecord) -> Self {
        Self {
            id: row.id.into(),
            email: row.email,
            display_name: row.display_name,
            role: Role::from(row.role),
            auth_provider: row.auth_provider,
            created_at: row.created_at,
        }
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Tournament {
    pub id: ID,
    pub game_title: String,
    pub date: NaiveDate,
    pub location: String,
    pub spots: i32,
    pub used_spots: i32,
    pub prize_pool: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
    #[graphql(skip)]
    pub participant_ids: Vec<Uuid>,
}

impl From<TournamentRecord> for Tournament {
    fn from(row: TournamentRecord) -> Self {
        Self {
            id: row.id.into(),
            game_title: row.game_title,
            date: row.date,
            location: row.location,
            spots: row.spots,
            used_spots: row.used_spots,
            prize_pool: row.prize_pool,
            details: row.details,
            created_at: row.created_at,
            participant_ids: row.participants,
        }
    }
}

#[ComplexObject]
impl Tournament {
    /// Spots still open for registration.
    async fn available_spots(&self) -> i32 {
        (self.spots - self.used_spots).max(0)
    }

    async fn participants(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let loader = ctx.data::<DataLoader<UserLoader>>()?;

        let mut users = Vec::with_capacity(self.participant_ids.len());
        let loaded = loader.load_many(self.participant_ids.iter().copied()).await?;
        for uid in &self.participant_ids {
            // A participant whose profile vanished is skipped, not an error.
            if let Some(row) = loaded.get(uid) {
                users.push(User::from(row.clone()));
            }
        }

        Ok(users)
    }
}

#[derive(SimpleObject, Clone)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(SimpleObject, Clone)]
pub struct AdminStats {
    pub total_tournaments: i64,
    pub total_spots: i64,
    pub used_spots: i64,
    pub available_spots: i64,
    pub total_prize_pool: f64,
}

impl From<projection::CatalogStats> for AdminStats {
    fn from(stats: projection::CatalogStats) -> Self {
        Self {
            total_tournaments: stats.total_tournaments,
            total_spots: stats.total_spots,
            used_spots: stats.used_spots,
            available_spots: stats.available_spots,
            total_prize_pool: stats.total_prize_pool,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum RegistrationStatus {
    /// The caller took one of the remaining spots.
    Registered,
    /// The caller already held a spot; nothing changed.
    AlreadyRegistered,
}

#[derive(SimpleObject)]
pub struct RegistrationResult {
    pub status: RegistrationStatus,
    pub tournament: Tournament,
}

#[derive(SimpleObject, Clone)]
pub struct RegistrationEvent {
    pub tournament_id: ID,
    pub user_id: ID,
    pub game_title: String,
    pub used_spots: i32,
    pub spots: i32,
}

#[derive(InputObject)]
pub struct SignUpInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(InputObject)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

#[derive(InputObject)]
pub struct CreateTournamentInput {
    pub game_title: String,
    pub date: NaiveDate,
    pub location: String,
    pub spots: SpotCount,
    pub prize_pool: Option<String>,
    pub details: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateTournamentInput {
    pub game_title: String,
    pub date: NaiveDate,
    pub location: String,
    pub spots: SpotCount,
    pub prize_pool: Option<String>,
    pub details: Option<String>,
}

#[derive(InputObject)]
pub struct RegisterForTournamentInput {
    pub tournament_id: ID,
}

pub fn parse_id(id: &ID) -> Result<Uuid> {
    Uuid::parse_str(id.as_str()).map_err(|e| Error::new(format!("Invalid id: {}", e)))
}
