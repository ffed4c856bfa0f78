//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- validated JWT claims, no database access.
//! - [`auth::CurrentUser`] -- the caller's freshly loaded, active user row.
//! - [`rbac::RequireManager`] -- a [`auth::CurrentUser`] holding the `manager` role.

pub mod auth;
pub mod rbac;
