use oauth2::{
    basic::BasicClient, reqwest::async_http_client, AuthUrl, AuthorizationCode, ClientId,
    ClientSecret, CsrfToken, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::auth::AuthConfig;
use crate::error::AppError;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

#[derive(Debug, Serialize, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
}

/// Profile details extracted from the federated provider.
#[derive(Debug, Clone)]
pub struct OAuthUserInfo {
    pub provider_id: String,
    pub email: String,
    pub display_name: String,
}

impl From<GoogleUserInfo> for OAuthUserInfo {
    fn from(google_user: GoogleUserInfo) -> Self {
        let display_name = if google_user.name.is_empty() {
            google_user.email.clone()
        } else {
            google_user.name
        };
        Self {
            provider_id: google_user.id,
            email: google_user.email,
            display_name,
        }
    }
}

#[derive(Clone)]
pub struct OAuthService {
    config: AuthConfig,
    http_client: HttpClient,
}

impl OAuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            http_client: HttpClient::new(),
        }
    }

    pub fn frontend_url(&self) -> &str {
        &self.config.frontend_url
    }

    pub fn authorize_url(&self) -> Result<(String, String), AppError> {
        let client = self.create_google_client()?;
        let (auth_url, csrf_token) = client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .url();

        Ok((auth_url.to_string(), csrf_token.secret().clone()))
    }

    pub async fn exchange_code_for_user_info(
        &self,
        code: String,
    ) -> Result<OAuthUserInfo, AppError> {
        let client = self.create_google_client()?;

        let token = client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(async_http_client)
            .await
            .map_err(|e| AppError::Internal(format!("Token exchange failed: {}", e)))?;

        let access_token = token.access_token().secret();

        let user_info: GoogleUserInfo = self
            .http_client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to fetch user info: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to parse user info: {}", e)))?;

        Ok(user_info.into())
    }

    fn create_google_client(&self) -> Result<BasicClient, AppError> {
        let client_id = self
            .config
            .google_client_id
            .clone()
            .ok_or_else(|| AppError::Internal("GOOGLE_CLIENT_ID not configured".to_string()))?;
        let client_secret = self
            .config
            .google_client_secret
            .clone()
            .ok_or_else(|| AppError::Internal("GOOGLE_CLIENT_SECRET not configured".to_string()))?;

        let auth_url = AuthUrl::new(GOOGLE_AUTH_URL.to_string())
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let token_url = TokenUrl::new(GOOGLE_TOKEN_URL.to_string())
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let redirect_url = RedirectUrl::new(format!(
            "{}/auth/google/callback",
            self.config.redirect_base_url
        ))
        .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(BasicClient::new(
            ClientId::new(client_id),
            Some(ClientSecret::new(client_secret)),
            auth_url,
            Some(token_url),
        )
        .set_redirect_uri(redirect_url))
    }
}
