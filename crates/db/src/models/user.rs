//! User entity model and DTOs.

use feedback_core::error::CoreError;
use feedback_core::org::Principal;
use feedback_core::roles::Role;
use feedback_core::types::{DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: String,
    pub manager_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn role(&self) -> Result<Role, CoreError> {
        Role::from_db(&self.role)
    }

    /// The authorization view of this user.
    pub fn principal(&self) -> Result<Principal, CoreError> {
        Ok(Principal {
            id: self.id,
            role: self.role()?,
            manager_id: self.manager_id,
            is_active: self.is_active,
        })
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub manager_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role.clone(),
            manager_id: user.manager_id,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A user together with their manager's record, if one is assigned.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithManager {
    #[serde(flatten)]
    pub user: UserResponse,
    pub manager: Option<UserResponse>,
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
    pub manager_id: Option<DbId>,
}

/// DTO for updating a user's own profile. Absent fields are left unchanged.
///
/// `manager_id` distinguishes an absent field (`None`) from an explicit
/// `null` (`Some(None)`), which clears the assignment.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "present_field")]
    pub manager_id: Option<Option<DbId>>,
}

/// Deserialize a field that is present in the payload (possibly `null`)
/// as `Some(..)`; `#[serde(default)]` covers the absent case.
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
