use async_graphql::{Context, Error, Result};

use infra::{CatalogStore, UserRecord};

use crate::auth::Claims;
use crate::gql::types::Role;
use crate::state::AppState;

/// Resolve the authenticated actor behind the request, or fail.
/// The profile document is the source of truth for the role; a valid token
/// without a profile is an error, not an anonymous session.
pub async fn current_actor(ctx: &Context<'_>) -> Result<UserRecord> {
    let claims = ctx
        .data::<Claims>()
        .map_err(|_| Error::new("Authentication required"))?;

    let user_id = claims.user_id().map_err(|e| Error::new(e.to_string()))?;

    let state = ctx.data::<AppState>()?;
    let user = state
        .store
        .get_user(user_id)
        .await
        .map_err(|e| Error::new(e.to_string()))?
        .ok_or_else(|| Error::new("User profile not found"))?;

    Ok(user)
}

/// Check that the authenticated actor holds the required role. The check
/// runs server-side on every gated operation; client-side redirects are a
/// convenience, not a boundary.
pub async fn require_role(ctx: &Context<'_>, required_role: Role) -> Result<UserRecord> {
    let user = current_actor(ctx).await?;

    if !has_required_role(Role::from(user.role.clone()), required_role) {
        return Err(Error::new(format!(
            "Insufficient permissions. Required role: {}",
            required_role.as_str()
        )));
    }

    Ok(user)
}

fn has_required_role(user_role: Role, required_role: Role) -> bool {
    match required_role {
        Role::Admin => user_role == Role::Admin,
        Role::User => true, // Everyone has user permissions
    }
}
