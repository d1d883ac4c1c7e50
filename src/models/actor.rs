//! # Actor Model
//!
//! Authenticated identity driving a workflow action. Role strings arrive from
//! the session collaborator with inconsistent casing (`"Admin"`, `"admin"`,
//! `" MANAGER "`); they are parsed once into [`Role`] here and compared as
//! enum values everywhere else.

use crate::constants::STAFF_ROLES;
use crate::error::{invalid_input, WorkflowError};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of roles known to the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    /// Read-only access to orders; never part of the staff action set
    Employee,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }

    /// Whether this role drives the staff side of the order workflow
    pub fn is_staff(&self) -> bool {
        STAFF_ROLES.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "employee" => Ok(Self::Employee),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            other => Err(invalid_input(format!("Unknown role: {other}"))),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The authenticated entity requesting an action
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Build an actor from raw session values, parsing the role string
    pub fn from_session(id: impl Into<String>, role: &str) -> Result<Self, WorkflowError> {
        Ok(Self::new(id, role.parse()?))
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}
