//! Bearer-token and environment gates for API routes

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::ServerConfig;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

/// How API requests are authorized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Every request passes (development mode without a configured key)
    Open,
    /// Requests must carry `Authorization: Bearer <token>` with this token
    Bearer(String),
    /// No key is configured outside development mode; every request fails
    Locked,
}

impl AuthPolicy {
    /// Derive the policy from the server configuration
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf_serve::middleware::auth::AuthPolicy;
    /// use shelf_serve::ServerConfig;
    ///
    /// let config = ServerConfig {
    ///     dev_mode: true,
    ///     ..Default::default()
    /// };
    /// assert_eq!(AuthPolicy::from_config(&config), AuthPolicy::Open);
    /// ```
    pub fn from_config(config: &ServerConfig) -> Self {
        match (&config.api_key, config.dev_mode) {
            (Some(key), _) => Self::Bearer(key.clone()),
            (None, true) => Self::Open,
            (None, false) => Self::Locked,
        }
    }

    /// Check the request headers against this policy
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let expected = match self {
            Self::Open => return Ok(()),
            Self::Locked => {
                tracing::warn!("Rejecting request: no API key is configured");
                return Err(ApiError::unauthorized());
            }
            Self::Bearer(token) => token,
        };

        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or_else(|| {
                tracing::warn!("Missing or invalid authorization header");
                ApiError::unauthorized()
            })?;

        if presented != expected {
            tracing::warn!("Invalid API key");
            return Err(ApiError::unauthorized());
        }

        Ok(())
    }
}

/// Reject requests that fail the configured [`AuthPolicy`]
pub async fn require_bearer_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    state.auth.authorize(request.headers())?;
    Ok(next.run(request).await)
}

/// Reject requests unless the server runs in development mode
pub async fn require_dev_mode(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.config.dev_mode {
        tracing::warn!(path = %request.uri().path(), "Setup route called outside dev mode");
        return Err(ApiError::bad_request(
            "setup routes are only available in dev mode",
        ));
    }
    Ok(next.run(request).await)
}
