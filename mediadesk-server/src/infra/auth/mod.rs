//! HTTP Basic authentication against the users in the configuration.

pub mod basic;
pub mod crypto;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use mediadesk_config::{AuthConfig, UserConfig};
use thiserror::Error;
use tracing::{debug, warn};

use crate::infra::{app_state::AppState, errors::AppError};
use basic::BasicCredentials;
use crypto::PasswordCrypto;

/// The caller of an admin route, inserted into request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.roles
            .iter()
            .any(|role| role.eq_ignore_ascii_case(mediadesk_config::ADMIN_ROLE))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authentication required")]
    MissingCredentials,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("user '{0}' lacks the ADMIN role")]
    Forbidden(String),
}

/// Configured logins keyed by username.
#[derive(Debug)]
pub struct UserDirectory {
    users: HashMap<String, UserConfig>,
    crypto: PasswordCrypto,
    /// Verified for unknown usernames so they cost as much as known ones.
    dummy_hash: Option<String>,
}

impl UserDirectory {
    pub fn new(auth: &AuthConfig, crypto: PasswordCrypto) -> Self {
        let users = auth
            .users
            .iter()
            .map(|user| (user.username.clone(), user.clone()))
            .collect();
        let dummy_hash = match crypto.hash_password("mediadesk-unknown-user") {
            Ok(hash) => Some(hash),
            Err(err) => {
                warn!(error = %err, "failed to prepare dummy password hash");
                None
            }
        };
        Self {
            users,
            crypto,
            dummy_hash,
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Check a password. Argon2 is CPU bound, call from a blocking context.
    pub fn authenticate(
        &self,
        credentials: &BasicCredentials,
    ) -> Result<AuthenticatedUser, AuthError> {
        let Some(user) = self.users.get(&credentials.username) else {
            debug!(username = %credentials.username, "unknown user");
            if let Some(hash) = &self.dummy_hash {
                let _ = self.crypto.verify_password(&credentials.password, hash);
            }
            return Err(AuthError::InvalidCredentials);
        };

        match self
            .crypto
            .verify_password(&credentials.password, &user.password_hash)
        {
            Ok(true) => Ok(AuthenticatedUser {
                username: user.username.clone(),
                roles: user.roles.clone(),
            }),
            Ok(false) => Err(AuthError::InvalidCredentials),
            Err(err) => {
                warn!(username = %user.username, error = %err, "stored password hash is unusable");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    pub async fn authenticate_admin(
        self: Arc<Self>,
        credentials: BasicCredentials,
    ) -> Result<AuthenticatedUser, AuthError> {
        let user = tokio::task::spawn_blocking(move || self.authenticate(&credentials))
            .await
            .map_err(|_| AuthError::InvalidCredentials)??;

        if !user.is_admin() {
            return Err(AuthError::Forbidden(user.username));
        }
        Ok(user)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Forbidden(_) => AppError::forbidden(err.to_string()),
            _ => AppError::unauthorized(err.to_string()),
        }
    }
}

fn rejection(err: AuthError) -> Response {
    let challenge = matches!(
        err,
        AuthError::MissingCredentials | AuthError::InvalidCredentials
    );
    let mut response = AppError::from(err).into_response();
    if challenge && let Ok(value) = HeaderValue::from_str(&basic::challenge()) {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, value);
    }
    response
}

/// Route layer for the admin surface: requires Basic credentials of a user
/// holding the ADMIN role.
pub async fn require_admin(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let credentials = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(BasicCredentials::parse);

    let Some(credentials) = credentials else {
        return rejection(AuthError::MissingCredentials);
    };

    match state.users.clone().authenticate_admin(credentials).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => {
            warn!(error = %err, path = %request.uri().path(), "admin request rejected");
            rejection(err)
        }
    }
}
