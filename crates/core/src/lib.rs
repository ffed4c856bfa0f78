//! Domain rules for the feedback service.
//!
//! Everything in this crate is pure: no I/O, no database access. The `db`
//! and `api` crates load rows, hand the relevant facts to these functions,
//! and persist whatever the rules allow.

pub mod comment;
pub mod dashboard;
pub mod error;
pub mod feedback;
pub mod feedback_request;
pub mod org;
pub mod roles;
pub mod types;
pub mod users;
