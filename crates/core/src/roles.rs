//! Well-known roles.
//!
//! The string forms must match the `CHECK` constraint on `users.role` in
//! `20260101000001_create_users_table.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_EMPLOYEE: &str = "employee";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_EMPLOYEE];

/// A user's role. Every authorization rule matches on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Manager => ROLE_MANAGER,
            Role::Employee => ROLE_EMPLOYEE,
        }
    }

    /// Parse a role stored in the database.
    ///
    /// The column is constrained, so an unknown value means the schema and
    /// this enum have drifted apart.
    pub fn from_db(value: &str) -> Result<Self, CoreError> {
        value
            .parse()
            .map_err(|_| CoreError::Internal(format!("Unknown role '{value}' in users table")))
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_MANAGER => Ok(Role::Manager),
            ROLE_EMPLOYEE => Ok(Role::Employee),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_every_valid_role() {
        for name in VALID_ROLES {
            let role: Role = name.parse().expect("valid role should parse");
            assert_eq!(role.as_str(), *name);
        }
    }

    #[test]
    fn rejects_unknown_role() {
        assert_matches!("owner".parse::<Role>(), Err(CoreError::Validation(msg)) if msg.contains("owner"));
    }

    #[test]
    fn unknown_db_role_is_internal() {
        assert_matches!(Role::from_db("root"), Err(CoreError::Internal(_)));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"manager\"");
        let role: Role = serde_json::from_str("\"employee\"").unwrap();
        assert_eq!(role, Role::Employee);
    }
}
