use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;

use infra::models::ROLE_USER;
use infra::{CatalogStore, NewUser, StoreError, UserRecord};

use crate::error::AppError;
use crate::state::AppState;

/// GET /auth/google/authorize - start the federated sign-in handshake.
pub async fn google_authorize(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let (auth_url, csrf_token) = state.oauth_service().authorize_url()?;
    state.session_service().store_csrf_token(csrf_token).await;

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /auth/google/callback - finish the handshake, provision the profile
/// on first sign-in, and hand the browser back to the app with a token.
///
/// A cancelled consent screen (`error=access_denied`) is not an error; the
/// user just changed their mind, so they go back to the login page quietly.
pub async fn google_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackQuery>,
) -> Result<Redirect, AppError> {
    let frontend_url = state.oauth_service().frontend_url().to_string();

    if let Some(error) = params.error {
        if error == "access_denied" {
            return Ok(Redirect::temporary(&format!("{}/login", frontend_url)));
        }
        return Err(AppError::Unauthorized(format!(
            "Google sign-in failed: {}",
            error
        )));
    }

    let csrf_token = params
        .state
        .ok_or_else(|| AppError::Unauthorized("Missing OAuth state".to_string()))?;
    state
        .session_service()
        .verify_csrf_token(&csrf_token)
        .await?;

    let code = params
        .code
        .ok_or_else(|| AppError::Unauthorized("Missing authorization code".to_string()))?;

    let info = state
        .oauth_service()
        .exchange_code_for_user_info(code)
        .await?;

    let user = find_or_provision(&state, &info.email, &info.display_name).await?;

    let token = state
        .jwt_service()
        .create_token(user.id, user.email.clone())?;

    Ok(Redirect::temporary(&format!(
        "{}/dashboard?token={}",
        frontend_url,
        urlencoding::encode(&token)
    )))
}

/// Profile creation happens only on the first federated sign-in; a
/// concurrent first sign-in loses the insert race and reads the winner.
async fn find_or_provision(
    state: &AppState,
    email: &str,
    display_name: &str,
) -> Result<UserRecord, AppError> {
    if let Some(user) = state.store.get_user_by_email(email).await? {
        return Ok(user);
    }

    match state
        .store
        .create_user(NewUser {
            email: email.to_string(),
            display_name: display_name.to_string(),
            role: ROLE_USER.to_string(),
            auth_provider: "google".to_string(),
            password_hash: None,
        })
        .await
    {
        Ok(user) => Ok(user),
        Err(StoreError::AlreadyExists) => state
            .store
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::Internal("profile vanished after insert race".to_string())),
        Err(e) => Err(e.into()),
    }
}
