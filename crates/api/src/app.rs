use std::time::Duration;

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Router,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse, GraphQLSubscription};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use infra::CatalogStore;

use crate::auth::middleware::{jwt_middleware, AuthClaims};
use crate::error::AppError;
use crate::gql::AppSchema;
use crate::routes::google_auth;
use crate::state::AppState;

/// Build the Axum router with health endpoint, GraphQL and the federated
/// sign-in redirect routes.
pub fn build_router(state: AppState, schema: AppSchema) -> Router {
    let gql_ws = GraphQLSubscription::new(schema.clone());

    Router::new()
        // Simple liveness check; also proves store connectivity.
        .route("/health", get(health))
        // graphql post & subscription
        .route("/graphql", post(graphql_handler).get_service(gql_ws))
        .route("/auth/google/authorize", get(google_auth::google_authorize))
        .route("/auth/google/callback", get(google_auth::google_callback))
        .layer(Extension(schema))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_middleware,
        ))
        // App state (store, auth services)
        .with_state(state)
        // Useful default middlewares
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive()) // tighten later
}

/// Executes GraphQL requests; claims resolved by the JWT middleware ride
/// along into the resolver context.
async fn graphql_handler(
    Extension(schema): Extension<AppSchema>,
    Extension(AuthClaims(claims)): Extension<AuthClaims>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(claims) = claims {
        request = request.data(claims);
    }

    schema.execute(request).await.into()
}

/// Liveness + quick store probe.
async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.store.ping().await?;
    Ok("ok")
}
