use std::sync::Arc;

use async_graphql::{Request, Variables};
use chrono::NaiveDate;
use uuid::Uuid;

use api::auth::{AuthConfig, Claims};
use api::AppState;
use infra::models::NewTournament;
use infra::{CatalogStore, MemoryCatalogStore, NewUser};

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_hours: 1,
        google_client_id: None,
        google_client_secret: None,
        redirect_base_url: "http://localhost:8080".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
    }
}

/// Fresh state over the in-memory backend; no external services needed.
pub fn setup_test_state() -> AppState {
    AppState::new(Arc::new(MemoryCatalogStore::new()), test_auth_config())
}

/// Helper function to execute GraphQL queries and mutations
pub async fn execute_graphql(
    schema: &api::gql::AppSchema,
    query: &str,
    variables: Option<Variables>,
    auth_claims: Option<Claims>,
) -> async_graphql::Response {
    let mut request = Request::new(query);

    if let Some(vars) = variables {
        request = request.variables(vars);
    }

    if let Some(claims) = auth_claims {
        request = request.data(claims);
    }

    schema.execute(request).await
}

/// Create a test user directly in the store and return JWT claims for it.
#[allow(dead_code)]
pub async fn create_test_user(app_state: &AppState, email: &str, role: &str) -> (Uuid, Claims) {
    let user = app_state
        .store
        .create_user(NewUser {
            email: email.to_string(),
            display_name: format!("Test {}", role),
            role: role.to_string(),
            auth_provider: "password".to_string(),
            password_hash: Some("$2b$12$dummy.hash.for.testing".to_string()),
        })
        .await
        .expect("Failed to create test user");

    let claims = Claims::new(user.id, email.to_string(), 1);

    (user.id, claims)
}

/// Create a test tournament directly in the store and return its ID.
#[allow(dead_code)]
pub async fn create_test_tournament(app_state: &AppState, title: &str, spots: i32) -> Uuid {
    let tournament = app_state
        .store
        .create_tournament(NewTournament {
            game_title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            location: "Online".to_string(),
            spots,
            prize_pool: "0".to_string(),
            details: Some("Test tournament description".to_string()),
        })
        .await
        .expect("Failed to create test tournament");

    tournament.id
}
