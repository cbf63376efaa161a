use crate::AppState;
use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

/// Guards every file operation behind the shared bearer secret.
///
/// A missing or malformed `Authorization` header is distinguished from a
/// well-formed header carrying the wrong token: the former is 401, the
/// latter 403.
pub async fn require_bearer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = auth_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::MissingToken)?;

    if token != state.config.api_token {
        tracing::warn!("rejected request with invalid token");
        return Err(AppError::InvalidToken);
    }

    Ok(next.run(req).await)
}
