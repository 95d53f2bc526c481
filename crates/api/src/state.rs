use std::sync::Arc;

use infra::CatalogStore;

use crate::auth::{AuthConfig, JwtService, OAuthService, SessionService};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    jwt_service: JwtService,
    oauth_service: OAuthService,
    session_service: SessionService,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, auth_config: AuthConfig) -> Self {
        let jwt_service = JwtService::new(&auth_config);
        let oauth_service = OAuthService::new(auth_config);

        Self {
            store,
            jwt_service,
            oauth_service,
            session_service: SessionService::new(),
        }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn oauth_service(&self) -> &OAuthService {
        &self.oauth_service
    }

    pub fn session_service(&self) -> &SessionService {
        &self.session_service
    }
}
