//! The closed role vocabulary.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A role string that does not name one of the three known roles.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid role: {0:?}")]
pub struct InvalidRole(pub String);

/// User role, normalized at every boundary.
///
/// Backends spell roles inconsistently (`"Admin"`, `"admin"`, `"ADMIN"`);
/// parsing is case-insensitive and everything downstream compares enum
/// values, never strings. Serializes lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    Member,
}

impl Role {
    /// Returns the wire spelling (lowercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Member => "member",
        }
    }

    /// Returns the capitalized label used in human-facing text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Member => "Member",
        }
    }

    /// Parses a role case-insensitively, rejecting unknown values.
    pub fn parse(s: &str) -> Result<Self, InvalidRole> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "member" => Ok(Self::Member),
            _ => Err(InvalidRole(s.to_string())),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Case-insensitive on the way in; the derive would only accept lowercase.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
