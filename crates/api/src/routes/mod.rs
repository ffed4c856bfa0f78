pub mod auth;
pub mod feedback;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                  register (public)
/// /auth/login                                     login (public)
///
/// /users/me                                       get, update own profile
/// /users/team                                     direct reports (managers only)
/// /users/managers                                 all managers
///
/// /feedback                                       list, create
/// /feedback/dashboard                             aggregate counts + list
/// /feedback/{id}                                  update (author only)
/// /feedback/{id}/acknowledge                      acknowledge (subject only)
/// /feedback/{id}/comments                         list, create
///
/// /feedback/requests                              list, create (employees)
/// /feedback/requests/{id}                         cancel (DELETE)
/// /feedback/requests/{id}/complete                complete (target manager)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/feedback", feedback::router())
}
