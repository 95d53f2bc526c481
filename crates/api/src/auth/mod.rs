pub mod config;
pub mod jwt;
pub mod middleware;
pub mod oauth;
pub mod password;
pub mod permissions;
pub mod session;

pub use config::AuthConfig;
pub use jwt::{Claims, JwtService};
pub use oauth::{OAuthService, OAuthUserInfo};
pub use password::PasswordService;
pub use session::SessionService;
