use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::Claims;
use crate::state::AppState;

/// Outcome of bearer-token resolution, always present on requests that
/// passed through [`jwt_middleware`].
#[derive(Clone)]
pub struct AuthClaims(pub Option<Claims>);

/// Extracts and validates a bearer JWT from the Authorization header and
/// adds the claims to the request extensions for the GraphQL context.
/// Requests without a valid token proceed unauthenticated; resolvers that
/// need an actor reject them individually.
pub async fn jwt_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .and_then(|token| state.jwt_service().verify_token(token).ok());

    request.extensions_mut().insert(AuthClaims(claims));

    next.run(request).await
}
