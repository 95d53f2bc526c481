use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::db::Db;
use crate::models::{
    NewTournament, NewUser, RegistrationOutcome, TournamentPatch, TournamentRecord, UserRecord,
};
use crate::store::{CatalogStore, LimitOffset, StoreError, MAX_CAS_ATTEMPTS};

const TOURNAMENT_COLUMNS: &str = "id, game_title, date, location, spots, used_spots, prize_pool, details, participants, created_at";
const USER_COLUMNS: &str =
    "id, email, display_name, role, auth_provider, password_hash, created_at";

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: Db,
}

impl PgCatalogStore {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    async fn fetch_tournament(&self, id: Uuid) -> Result<Option<TournamentRecord>, StoreError> {
        let row = sqlx::query_as::<_, TournamentRecord>(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::db::ping(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, params: NewUser) -> Result<UserRecord, StoreError> {
        let row = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (id, email, display_name, role, auth_provider, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (email) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&params.email)
        .bind(&params.display_name)
        .bind(&params.role)
        .bind(&params.auth_provider)
        .bind(&params.password_hash)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(StoreError::AlreadyExists)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_users(&self, ids: &[Uuid]) -> Result<Vec<UserRecord>, StoreError> {
        let rows = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create_tournament(
        &self,
        params: NewTournament,
    ) -> Result<TournamentRecord, StoreError> {
        let row = sqlx::query_as::<_, TournamentRecord>(&format!(
            r#"
            INSERT INTO tournaments
                (id, game_title, date, location, spots, used_spots, prize_pool, details, participants, created_at)
            VALUES ($1, $2, $3, $4, $5, 0, $6, $7, '{{}}', $8)
            RETURNING {TOURNAMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&params.game_title)
        .bind(params.date)
        .bind(&params.location)
        .bind(params.spots)
        .bind(&params.prize_pool)
        .bind(&params.details)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_tournament(&self, id: Uuid) -> Result<Option<TournamentRecord>, StoreError> {
        self.fetch_tournament(id).await
    }

    async fn list_tournaments(
        &self,
        page: Option<LimitOffset>,
    ) -> Result<Vec<TournamentRecord>, StoreError> {
        let rows = match page {
            Some(p) => {
                sqlx::query_as::<_, TournamentRecord>(&format!(
                    r#"
                    SELECT {TOURNAMENT_COLUMNS}
                    FROM tournaments
                    ORDER BY date ASC, created_at ASC
                    LIMIT $1 OFFSET $2
                    "#
                ))
                .bind(p.limit)
                .bind(p.offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TournamentRecord>(&format!(
                    "SELECT {TOURNAMENT_COLUMNS} FROM tournaments ORDER BY date ASC, created_at ASC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    async fn update_tournament(
        &self,
        id: Uuid,
        patch: TournamentPatch,
    ) -> Result<TournamentRecord, StoreError> {
        // used_spots, participants and created_at are deliberately not in the
        // SET list; registration is the only writer of the first two.
        let row = sqlx::query_as::<_, TournamentRecord>(&format!(
            r#"
            UPDATE tournaments
            SET game_title = $2, date = $3, location = $4, spots = $5, prize_pool = $6, details = $7
            WHERE id = $1
            RETURNING {TOURNAMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&patch.game_title)
        .bind(patch.date)
        .bind(&patch.location)
        .bind(patch.spots)
        .bind(&patch.prize_pool)
        .bind(&patch.details)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(StoreError::NotFound)
    }

    async fn delete_tournament(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM tournaments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn register_participant(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> Result<RegistrationOutcome, StoreError> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let current = self
                .fetch_tournament(tournament_id)
                .await?
                .ok_or(StoreError::NotFound)?;

            if current.participants.contains(&user_id) {
                return Ok(RegistrationOutcome::AlreadyRegistered);
            }
            if current.used_spots >= current.spots {
                return Err(StoreError::CapacityExceeded);
            }

            // Counter increment and participant append land in one statement,
            // conditioned on the counter still holding the value read above.
            // A concurrent registration invalidates the condition and we loop.
            let result = sqlx::query(
                r#"
                UPDATE tournaments
                SET used_spots = used_spots + 1,
                    participants = array_append(participants, $2)
                WHERE id = $1
                  AND used_spots = $3
                  AND NOT ($2 = ANY(participants))
                "#,
            )
            .bind(tournament_id)
            .bind(user_id)
            .bind(current.used_spots)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 1 {
                return Ok(RegistrationOutcome::Registered {
                    used_spots: current.used_spots + 1,
                    spots: current.spots,
                });
            }

            tracing::debug!(%tournament_id, %user_id, "registration CAS lost, retrying");
        }

        Err(StoreError::Conflict)
    }
}
