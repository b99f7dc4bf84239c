//! Role authorization guard
//!
//! Extracts the session token from the `Authorization: Bearer <token>` header,
//! verifies it, re-reads the caller's current role from the account directory
//! and checks it against the route's allowed roles. On success the resolved
//! [`Identity`] is placed in request extensions so handlers can read it with
//! `Extension<Identity>` without touching the directory again.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use rinkside_auth::{Role, TokenError, TokenIssuer};
use rinkside_db::AccountDirectory;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Authenticated caller, as resolved for the current request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account id (token subject)
    pub id: String,
    /// Role read from the directory for this request
    pub role: Role,
    pub name: String,
    pub email: String,
}

/// Why the caller could not be authenticated
#[derive(Debug)]
pub enum AuthFailure {
    MissingToken,
    InvalidToken(TokenError),
    /// Token verified but its subject no longer exists
    UnknownAccount,
}

/// Outcome of a rejected authorization
#[derive(Debug)]
pub enum RejectReason {
    Unauthenticated(AuthFailure),
    Forbidden { role: Role },
    DirectoryUnavailable(String),
}

/// Result of [`authorize`]
#[derive(Debug)]
pub enum Decision {
    Pass(Identity),
    Reject(RejectReason),
}

impl From<RejectReason> for ApiError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::Unauthenticated(AuthFailure::MissingToken) => ApiError::Unauthorized(
                "Missing authentication token. Expected 'Authorization: Bearer <token>'"
                    .to_string(),
            ),
            RejectReason::Unauthenticated(AuthFailure::InvalidToken(e)) => {
                ApiError::Unauthorized(format!("Invalid or expired token: {}", e))
            }
            RejectReason::Unauthenticated(AuthFailure::UnknownAccount) => {
                ApiError::Unauthorized("Account no longer exists".to_string())
            }
            RejectReason::Forbidden { role } => ApiError::Forbidden(format!(
                "Insufficient permissions: role {} may not access this resource",
                role
            )),
            RejectReason::DirectoryUnavailable(cause) => ApiError::Internal(cause),
        }
    }
}

/// Extract the bearer token from request headers
///
/// The scheme is matched case-insensitively; an empty token counts as absent.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Decide whether a request may proceed
///
/// Fails closed: a missing or invalid token, an unknown subject or a role
/// outside `allowed` all reject. The only side effect is one directory read.
pub async fn authorize(
    headers: &HeaderMap,
    allowed: &[Role],
    issuer: &TokenIssuer,
    directory: &dyn AccountDirectory,
) -> Decision {
    let Some(token) = bearer_token(headers) else {
        return Decision::Reject(RejectReason::Unauthenticated(AuthFailure::MissingToken));
    };

    let claims = match issuer.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            return Decision::Reject(RejectReason::Unauthenticated(AuthFailure::InvalidToken(e)))
        }
    };

    // Role is never taken from the token
    let account = match directory.find_by_id(&claims.sub).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            return Decision::Reject(RejectReason::Unauthenticated(AuthFailure::UnknownAccount))
        }
        Err(e) => return Decision::Reject(RejectReason::DirectoryUnavailable(e.to_string())),
    };

    if !account.role.is_allowed(allowed) {
        return Decision::Reject(RejectReason::Forbidden { role: account.role });
    }

    Decision::Pass(Identity {
        id: account.id,
        role: account.role,
        name: account.name,
        email: account.email,
    })
}

/// Per-route-group guard configuration
#[derive(Clone)]
pub struct GuardState {
    pub issuer: TokenIssuer,
    pub directory: Arc<dyn AccountDirectory>,
    pub allowed: &'static [Role],
}

impl GuardState {
    pub fn new(
        issuer: TokenIssuer,
        directory: Arc<dyn AccountDirectory>,
        allowed: &'static [Role],
    ) -> Self {
        Self {
            issuer,
            directory,
            allowed,
        }
    }
}

/// Middleware enforcing [`GuardState::allowed`] on every request
///
/// # Errors
/// - 401 Unauthorized: no bearer token, invalid/expired token, unknown account
/// - 403 Forbidden: authenticated, but role not allowed
/// - 500 Internal Server Error: account directory failure (details only logged)
pub async fn require_roles(
    State(guard): State<GuardState>,
    mut request: Request,
    next: Next,
) -> Response {
    let decision = authorize(
        request.headers(),
        guard.allowed,
        &guard.issuer,
        guard.directory.as_ref(),
    )
    .await;

    match decision {
        Decision::Pass(identity) => {
            debug!(
                "Authorized {} {} for {} ({})",
                request.method(),
                request.uri().path(),
                identity.id,
                identity.role
            );
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Decision::Reject(reason) => {
            warn!(
                "Rejected {} {}: {:?}",
                request.method(),
                request.uri().path(),
                reason
            );
            ApiError::from(reason).into_response()
        }
    }
}
