//! Account roles and the role sets endpoints are gated on

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Role of an account. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full access, including user management and deletes
    Admin,
    /// Manages players and invoices
    Agent,
    /// Read-only access to players and invoices
    Assistant,
}

/// Every authenticated account
pub const ANY_ROLE: &[Role] = &[Role::Admin, Role::Agent, Role::Assistant];

/// Accounts allowed to create and edit players and invoices
pub const MANAGERS: &[Role] = &[Role::Admin, Role::Agent];

/// User management and record deletion
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Agent => "AGENT",
            Role::Assistant => "ASSISTANT",
        }
    }

    /// Whether this role is a member of `allowed`
    pub fn is_allowed(&self, allowed: &[Role]) -> bool {
        allowed.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown role '{0}'. Expected ADMIN, AGENT or ASSISTANT")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "AGENT" => Ok(Role::Agent),
            "ASSISTANT" => Ok(Role::Assistant),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}
