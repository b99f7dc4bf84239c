//! Request extractors that reject with [`ApiError`]

use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON body extractor; malformed bodies become a 400 `ErrorResponse`
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
