//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET  /me        -> me
/// PUT  /me        -> update_me
/// GET  /team      -> team (managers only)
/// GET  /managers  -> managers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::me).put(users::update_me))
        .route("/team", get(users::team))
        .route("/managers", get(users::managers))
}
