use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::error::AppError;

const CSRF_TOKEN_TTL: Duration = Duration::from_secs(10 * 60);

/// Tracks in-flight federated sign-in handshakes. The CSRF state handed to
/// the provider on the authorize redirect must come back on the callback;
/// tokens are single-use and expire.
#[derive(Clone)]
pub struct SessionService {
    pending_csrf: Arc<RwLock<HashMap<String, Instant>>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self {
            pending_csrf: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn store_csrf_token(&self, csrf_token: String) {
        let mut pending = self.pending_csrf.write().await;
        pending.retain(|_, issued| issued.elapsed() < CSRF_TOKEN_TTL);
        pending.insert(csrf_token, Instant::now());
    }

    /// Consume the token; a second callback with the same state fails.
    pub async fn verify_csrf_token(&self, csrf_token: &str) -> Result<(), AppError> {
        let mut pending = self.pending_csrf.write().await;
        match pending.remove(csrf_token) {
            Some(issued) if issued.elapsed() < CSRF_TOKEN_TTL => Ok(()),
            _ => Err(AppError::Unauthorized("Invalid CSRF token".to_string())),
        }
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new()
    }
}
