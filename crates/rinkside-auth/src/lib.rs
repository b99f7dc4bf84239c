//! Credentials, session tokens and roles for the agency service

pub mod password;
pub mod role;
pub mod token;

pub use password::{hash_password, verify_password, PasswordError, MAX_PASSWORD_BYTES};
pub use role::{Role, RoleParseError, ADMIN_ONLY, ANY_ROLE, MANAGERS};
pub use token::{
    ConfigError, IssuedToken, SessionClaims, SigningKey, TokenError, TokenIssuer,
    JWT_SECRET_ENV, SESSION_TOKEN_LIFETIME_HOURS,
};
