use async_graphql::{Context, Error, Object, Result};

use infra::models::ROLE_USER;
use infra::{CatalogStore, NewTournament, NewUser, RegistrationOutcome, StoreError, TournamentPatch};

use crate::auth::permissions::{current_actor, require_role};
use crate::auth::PasswordService;
use crate::gql::subscriptions::publish_registration_event;
use crate::gql::types::{
    parse_id, AuthPayload, CreateTournamentInput, RegisterForTournamentInput, RegistrationEvent,
    RegistrationResult, RegistrationStatus, Role, SignInInput, SignUpInput, Tournament,
    UpdateTournamentInput,
};
use crate::state::AppState;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create an account with email + password and provision the profile
    /// with the default role.
    async fn sign_up(&self, ctx: &Context<'_>, input: SignUpInput) -> Result<AuthPayload> {
        let state = ctx.data::<AppState>()?;

        if input.username.trim().is_empty() {
            return Err(Error::new("Username is required"));
        }
        if input.email.trim().is_empty() {
            return Err(Error::new("Email is required"));
        }
        PasswordService::validate_password_strength(&input.password)
            .map_err(|e| Error::new(e.to_string()))?;

        let password_hash =
            PasswordService::hash_password(&input.password).map_err(|e| Error::new(e.to_string()))?;

        let user = state
            .store
            .create_user(NewUser {
                email: input.email.trim().to_string(),
                display_name: input.username.trim().to_string(),
                role: ROLE_USER.to_string(),
                auth_provider: "password".to_string(),
                password_hash: Some(password_hash),
            })
            .await
            .map_err(|e| match e {
                StoreError::AlreadyExists => Error::new("An account with this email already exists"),
                other => Error::new(other.to_string()),
            })?;

        let token = state
            .jwt_service()
            .create_token(user.id, user.email.clone())
            .map_err(|e| Error::new(e.to_string()))?;

        Ok(AuthPayload {
            token,
            user: user.into(),
        })
    }

    /// Email + password sign-in.
    async fn sign_in(&self, ctx: &Context<'_>, input: SignInInput) -> Result<AuthPayload> {
        let state = ctx.data::<AppState>()?;

        let user = state
            .store
            .get_user_by_email(input.email.trim())
            .await
            .map_err(|e| Error::new(e.to_string()))?
            .ok_or_else(|| Error::new("No user found with this email"))?;

        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| Error::new("This account uses federated sign-in"))?;

        let valid = PasswordService::verify_password(&input.password, password_hash)
            .map_err(|e| Error::new(e.to_string()))?;
        if !valid {
            return Err(Error::new("Incorrect password"));
        }

        let token = state
            .jwt_service()
            .create_token(user.id, user.email.clone())
            .map_err(|e| Error::new(e.to_string()))?;

        Ok(AuthPayload {
            token,
            user: user.into(),
        })
    }

    /// Admin: add a tournament to the catalog. The usage counter, the
    /// participant set and the creation timestamp are seeded server-side.
    async fn create_tournament(
        &self,
        ctx: &Context<'_>,
        input: CreateTournamentInput,
    ) -> Result<Tournament> {
        require_role(ctx, Role::Admin).await?;
        let state = ctx.data::<AppState>()?;

        let params = NewTournament {
            game_title: required_text(&input.game_title, "gameTitle")?,
            date: input.date,
            location: required_text(&input.location, "location")?,
            spots: positive_spots(input.spots.0)?,
            prize_pool: default_prize_pool(input.prize_pool),
            details: input.details,
        };

        let row = state
            .store
            .create_tournament(params)
            .await
            .map_err(|e| Error::new(e.to_string()))?;

        Ok(row.into())
    }

    /// Admin: edit a tournament's listing fields. The usage counter, the
    /// participant set and the creation timestamp are not editable here;
    /// the input carries no such fields.
    async fn update_tournament(
        &self,
        ctx: &Context<'_>,
        id: async_graphql::ID,
        input: UpdateTournamentInput,
    ) -> Result<Tournament> {
        require_role(ctx, Role::Admin).await?;
        let state = ctx.data::<AppState>()?;
        let tournament_id = parse_id(&id)?;

        let patch = TournamentPatch {
            game_title: required_text(&input.game_title, "gameTitle")?,
            date: input.date,
            location: required_text(&input.location, "location")?,
            spots: positive_spots(input.spots.0)?,
            prize_pool: default_prize_pool(input.prize_pool),
            details: input.details,
        };

        let row = state
            .store
            .update_tournament(tournament_id, patch)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => {
                    Error::new("The tournament you're looking for doesn't exist.")
                }
                other => Error::new(other.to_string()),
            })?;

        Ok(row.into())
    }

    /// Admin: hard delete. Stale ids held elsewhere simply stop resolving.
    async fn delete_tournament(&self, ctx: &Context<'_>, id: async_graphql::ID) -> Result<bool> {
        require_role(ctx, Role::Admin).await?;
        let state = ctx.data::<AppState>()?;
        let tournament_id = parse_id(&id)?;

        state
            .store
            .delete_tournament(tournament_id)
            .await
            .map_err(|e| Error::new(e.to_string()))?;

        Ok(true)
    }

    /// Take one spot in a tournament for the authenticated actor. Counter
    /// increment and participant append happen as one conditional
    /// transaction in the store; registering twice is a no-op.
    async fn register_for_tournament(
        &self,
        ctx: &Context<'_>,
        input: RegisterForTournamentInput,
    ) -> Result<RegistrationResult> {
        let user = current_actor(ctx).await?;
        let state = ctx.data::<AppState>()?;
        let tournament_id = parse_id(&input.tournament_id)?;

        let outcome = state
            .store
            .register_participant(tournament_id, user.id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => {
                    Error::new("The tournament you're looking for doesn't exist.")
                }
                StoreError::CapacityExceeded => Error::new("This tournament is already full."),
                StoreError::Conflict => Error::new("Registration is busy, please try again."),
                other => Error::new(other.to_string()),
            })?;

        let row = state
            .store
            .get_tournament(tournament_id)
            .await
            .map_err(|e| Error::new(e.to_string()))?
            .ok_or_else(|| Error::new("The tournament you're looking for doesn't exist."))?;

        let status = match outcome {
            RegistrationOutcome::Registered { used_spots, spots } => {
                publish_registration_event(RegistrationEvent {
                    tournament_id: tournament_id.into(),
                    user_id: user.id.into(),
                    game_title: row.game_title.clone(),
                    used_spots,
                    spots,
                });
                RegistrationStatus::Registered
            }
            RegistrationOutcome::AlreadyRegistered => RegistrationStatus::AlreadyRegistered,
        };

        Ok(RegistrationResult {
            status,
            tournament: row.into(),
        })
    }
}

fn required_text(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::new(format!("Please fill in all required fields: {} is missing", field)));
    }
    Ok(trimmed.to_string())
}

fn positive_spots(spots: i32) -> Result<i32> {
    if spots < 1 {
        return Err(Error::new("Total spots must be a positive integer"));
    }
    Ok(spots)
}

fn default_prize_pool(prize_pool: Option<String>) -> String {
    match prize_pool {
        Some(p) if !p.trim().is_empty() => p.trim().to_string(),
        _ => "0".to_string(),
    }
}
