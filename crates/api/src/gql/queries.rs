use async_graphql::{Context, Error, Object, Result, ID};
use chrono::{DateTime, Utc};

use infra::{projection, CatalogStore, LimitOffset};

use crate::auth::permissions::{current_actor, require_role};
use crate::gql::types::{parse_id, AdminStats, Role, Tournament, User};
use crate::state::AppState;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Simple ping to test the API.
    async fn hello(&self) -> String {
        "Hello, ChampionsArena!".to_string()
    }

    /// Current server time (UTC).
    async fn server_time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// The catalog, soonest date first, optionally filtered by a
    /// case-insensitive search on the game title.
    async fn tournaments(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Tournament>> {
        let state = ctx.data::<AppState>()?;
        let page = Some(LimitOffset {
            limit: limit.unwrap_or(200).clamp(1, 500),
            offset: offset.unwrap_or(0).max(0),
        });

        let rows = state
            .store
            .list_tournaments(page)
            .await
            .map_err(|e| Error::new(e.to_string()))?;

        let query = search.unwrap_or_default();
        Ok(rows
            .into_iter()
            .filter(|t| projection::matches_search(t, &query))
            .map(Tournament::from)
            .collect())
    }

    async fn tournament(&self, ctx: &Context<'_>, id: ID) -> Result<Tournament> {
        let state = ctx.data::<AppState>()?;
        let tournament_id = parse_id(&id)?;

        let row = state
            .store
            .get_tournament(tournament_id)
            .await
            .map_err(|e| Error::new(e.to_string()))?
            .ok_or_else(|| Error::new("The tournament you're looking for doesn't exist."))?;

        Ok(row.into())
    }

    /// The authenticated actor's profile.
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let user = current_actor(ctx).await?;
        Ok(user.into())
    }

    /// Tournaments the authenticated actor has joined, derived from the
    /// catalog's participant sets.
    async fn my_history(&self, ctx: &Context<'_>) -> Result<Vec<Tournament>> {
        let user = current_actor(ctx).await?;
        let state = ctx.data::<AppState>()?;

        let rows = state
            .store
            .list_tournaments(None)
            .await
            .map_err(|e| Error::new(e.to_string()))?;

        Ok(projection::history_for(user.id, &rows)
            .into_iter()
            .map(Tournament::from)
            .collect())
    }

    /// Aggregates for the admin dashboard.
    async fn admin_stats(&self, ctx: &Context<'_>) -> Result<AdminStats> {
        require_role(ctx, Role::Admin).await?;
        let state = ctx.data::<AppState>()?;

        let rows = state
            .store
            .list_tournaments(None)
            .await
            .map_err(|e| Error::new(e.to_string()))?;

        Ok(projection::catalog_stats(&rows).into())
    }
}
