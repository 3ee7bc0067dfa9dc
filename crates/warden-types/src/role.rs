//! Role tags
//!
//! A role is an open, validated tag rather than a closed enum: deployments
//! declare their own role sets (admin, member, moderator, nurse, ...) and the
//! auth core carries the tag through claims and lookups without caring which
//! roles exist.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum accepted role tag length in bytes
const MAX_ROLE_LEN: usize = 32;

/// A principal's role tag
///
/// Valid tags are 1-32 bytes of ASCII lowercase letters, digits and
/// underscores, starting with a letter. `(role, identifier)` is the unique
/// key for principals, so the same identifier may exist under two roles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Role(String);

impl Role {
    /// Create a role tag, validating its format
    pub fn new(tag: impl Into<String>) -> Result<Self, RoleError> {
        let tag = tag.into();
        if tag.is_empty() || tag.len() > MAX_ROLE_LEN {
            return Err(RoleError::InvalidLength(tag.len()));
        }
        let mut chars = tag.chars();
        // First char must be a letter; the rest lowercase alphanumeric or '_'
        if !chars.next().is_some_and(|c| c.is_ascii_lowercase()) {
            return Err(RoleError::InvalidFormat(tag));
        }
        if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            return Err(RoleError::InvalidFormat(tag));
        }
        Ok(Self(tag))
    }

    /// The tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Role {
    type Error = RoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.0
    }
}

/// Role tag validation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum RoleError {
    #[error("role tag must be 1-32 bytes, got {0}")]
    InvalidLength(usize),

    #[error("role tag must be lowercase alphanumeric/underscore starting with a letter: {0:?}")]
    InvalidFormat(String),
}
