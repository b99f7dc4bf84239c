//! API Middleware
//!
//! Authentication and role authorization for protected routes.

pub mod auth;

pub use auth::{
    authorize, bearer_token, require_roles, AuthFailure, Decision, GuardState, Identity,
    RejectReason,
};
