//! Session authentication.
//!
//! A single configured user logs in with email and password. Each successful
//! login issues a fresh random session token that replaces the previous one;
//! tokens live in memory only, so a restart logs everyone out.

use std::sync::Arc;

use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::handlers::{AppState, ErrorResponse};

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing, malformed or stale bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Email or password did not match.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Login was attempted on a server without credentials.
    #[error("Authentication is not configured for this server")]
    NotConfigured,

    /// The configured hash could not be used.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::Unauthorized | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::NotConfigured => StatusCode::NOT_FOUND,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,
}

/// Holds the configured credentials and the active session token.
pub struct SessionManager {
    credentials: Option<AuthSettings>,
    token: RwLock<Option<String>>,
}

impl SessionManager {
    /// Creates a manager, checking that the configured hash parses.
    pub fn new(credentials: Option<AuthSettings>) -> Result<Self, AuthError> {
        if let Some(settings) = &credentials {
            PasswordHash::new(&settings.password_hash).map_err(|e| {
                AuthError::Internal(format!("Invalid password hash configuration: {e}"))
            })?;
        }
        Ok(Self {
            credentials,
            token: RwLock::new(None),
        })
    }

    /// A manager that lets every request through.
    pub fn disabled() -> Self {
        Self {
            credentials: None,
            token: RwLock::new(None),
        }
    }

    /// Returns true if requests need a session token.
    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    /// Checks credentials and starts a new session, returning its token.
    pub fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let settings = self.credentials.as_ref().ok_or(AuthError::NotConfigured)?;
        if email != settings.email {
            return Err(AuthError::InvalidCredentials);
        }

        let parsed = PasswordHash::new(&settings.password_hash).map_err(|e| {
            AuthError::Internal(format!("Invalid password hash configuration: {e}"))
        })?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|err| match err {
                PasswordHashError::Password => AuthError::InvalidCredentials,
                other => AuthError::Internal(format!("Password verification failed: {other}")),
            })?;

        let token = Uuid::new_v4().to_string();
        *self.token.write() = Some(token.clone());
        Ok(token)
    }

    /// Checks a bearer token against the active session.
    pub fn validate(&self, token: &str) -> Result<(), AuthError> {
        match self.token.read().as_deref() {
            Some(active) if active == token => Ok(()),
            _ => Err(AuthError::Unauthorized),
        }
    }
}

/// Hashes a password into an Argon2 PHC string suitable for the config file.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AuthError::Internal(format!("Failed to encode salt: {e}")))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Failed to hash password: {e}")))
}

/// Login handler.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    match state.sessions.login(&payload.email, &payload.password) {
        Ok(token) => {
            info!("login succeeded");
            Ok(Json(LoginResponse { token }))
        }
        Err(e) => {
            warn!("login failed: {}", e);
            Err(e)
        }
    }
}

/// Middleware rejecting requests without the active bearer token.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if !state.sessions.is_enabled() {
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    state.sessions.validate(token.trim())?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        let hash = hash_password("12345").unwrap();
        SessionManager::new(Some(AuthSettings {
            email: "user@example.com".to_string(),
            password_hash: hash,
        }))
        .unwrap()
    }

    #[test]
    fn test_login_issues_token() {
        let sessions = manager();
        let token = sessions.login("user@example.com", "12345").unwrap();
        assert!(sessions.validate(&token).is_ok());
    }

    #[test]
    fn test_wrong_password_or_email() {
        let sessions = manager();
        assert!(matches!(
            sessions.login("user@example.com", "nope"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            sessions.login("other@example.com", "12345"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_new_login_replaces_session() {
        let sessions = manager();
        let first = sessions.login("user@example.com", "12345").unwrap();
        let second = sessions.login("user@example.com", "12345").unwrap();

        assert_ne!(first, second);
        assert!(sessions.validate(&first).is_err());
        assert!(sessions.validate(&second).is_ok());
    }

    #[test]
    fn test_no_session_before_login() {
        assert!(manager().validate("anything").is_err());
    }

    #[test]
    fn test_invalid_hash_rejected() {
        let result = SessionManager::new(Some(AuthSettings {
            email: "user@example.com".to_string(),
            password_hash: "not-a-hash".to_string(),
        }));
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn test_disabled_manager() {
        let sessions = SessionManager::disabled();
        assert!(!sessions.is_enabled());
        assert!(matches!(
            sessions.login("a", "b"),
            Err(AuthError::NotConfigured)
        ));
    }
}
