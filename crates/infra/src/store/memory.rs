//! In-memory catalog backend.
//!
//! Suitable for development and tests; a single-process map behind a
//! `tokio::sync::RwLock`. Registration follows the same optimistic
//! read-check-write protocol as the Postgres backend: the snapshot is
//! re-validated under the write lock and a changed counter sends the
//! attempt back around the loop.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    NewTournament, NewUser, RegistrationOutcome, TournamentPatch, TournamentRecord, UserRecord,
};
use crate::store::{CatalogStore, LimitOffset, StoreError, MAX_CAS_ATTEMPTS};

#[derive(Clone, Default)]
pub struct MemoryCatalogStore {
    users: Arc<RwLock<HashMap<Uuid, UserRecord>>>,
    tournaments: Arc<RwLock<HashMap<Uuid, TournamentRecord>>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, params: NewUser) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == params.email) {
            return Err(StoreError::AlreadyExists);
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            email: params.email,
            display_name: params.display_name,
            role: params.role,
            auth_provider: params.auth_provider,
            password_hash: params.password_hash,
            created_at: Utc::now(),
        };
        users.insert(record.id, record.clone());

        Ok(record)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn get_users(&self, ids: &[Uuid]) -> Result<Vec<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn create_tournament(
        &self,
        params: NewTournament,
    ) -> Result<TournamentRecord, StoreError> {
        let record = TournamentRecord {
            id: Uuid::new_v4(),
            game_title: params.game_title,
            date: params.date,
            location: params.location,
            spots: params.spots,
            used_spots: 0,
            prize_pool: params.prize_pool,
            details: params.details,
            participants: Vec::new(),
            created_at: Utc::now(),
        };

        self.tournaments
            .write()
            .await
            .insert(record.id, record.clone());

        Ok(record)
    }

    async fn get_tournament(&self, id: Uuid) -> Result<Option<TournamentRecord>, StoreError> {
        Ok(self.tournaments.read().await.get(&id).cloned())
    }

    async fn list_tournaments(
        &self,
        page: Option<LimitOffset>,
    ) -> Result<Vec<TournamentRecord>, StoreError> {
        let mut rows: Vec<TournamentRecord> =
            self.tournaments.read().await.values().cloned().collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

        if let Some(p) = page {
            rows = rows
                .into_iter()
                .skip(p.offset.max(0) as usize)
                .take(p.limit.max(0) as usize)
                .collect();
        }

        Ok(rows)
    }

    async fn update_tournament(
        &self,
        id: Uuid,
        patch: TournamentPatch,
    ) -> Result<TournamentRecord, StoreError> {
        let mut tournaments = self.tournaments.write().await;
        let record = tournaments.get_mut(&id).ok_or(StoreError::NotFound)?;

        record.game_title = patch.game_title;
        record.date = patch.date;
        record.location = patch.location;
        record.spots = patch.spots;
        record.prize_pool = patch.prize_pool;
        record.details = patch.details;

        Ok(record.clone())
    }

    async fn delete_tournament(&self, id: Uuid) -> Result<(), StoreError> {
        self.tournaments.write().await.remove(&id);
        Ok(())
    }

    async fn register_participant(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> Result<RegistrationOutcome, StoreError> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let snapshot = {
                let tournaments = self.tournaments.read().await;
                tournaments
                    .get(&tournament_id)
                    .cloned()
                    .ok_or(StoreError::NotFound)?
            };

            if snapshot.participants.contains(&user_id) {
                return Ok(RegistrationOutcome::AlreadyRegistered);
            }
            if snapshot.used_spots >= snapshot.spots {
                return Err(StoreError::CapacityExceeded);
            }

            let mut tournaments = self.tournaments.write().await;
            let record = tournaments
                .get_mut(&tournament_id)
                .ok_or(StoreError::NotFound)?;

            if record.used_spots != snapshot.used_spots {
                // Someone else took a spot between our read and write.
                continue;
            }
            if record.participants.contains(&user_id) {
                return Ok(RegistrationOutcome::AlreadyRegistered);
            }

            record.participants.push(user_id);
            record.used_spots += 1;

            return Ok(RegistrationOutcome::Registered {
                used_spots: record.used_spots,
                spots: record.spots,
            });
        }

        Err(StoreError::Conflict)
    }
}
