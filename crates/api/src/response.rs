//! Shared request/response envelope types for API handlers.
//!
//! Resource responses use a `{ "data": ... }` envelope. Auth responses
//! (register, login) are returned bare.

use axum::extract::FromRequest;
use serde::Serialize;

use crate::error::AppError;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// JSON body extractor whose rejections go through [`AppError`].
///
/// Malformed bodies, unknown enum values and missing fields answer 400
/// with the usual `{ error, code }` body instead of axum's plain-text 422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
