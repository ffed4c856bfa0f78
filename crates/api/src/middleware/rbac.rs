//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`CurrentUser`] and rejects requests whose role does
//! not meet the requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `manager` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn team(RequireManager(current): RequireManager) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireManager(pub CurrentUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        current.principal.ensure_manager("view team members")?;
        Ok(RequireManager(current))
    }
}
