//! # Authentication
//!
//! Password hashing, opaque session tokens, and the bearer middleware.
//!
//! ## Passwords
//!
//! PBKDF2-HMAC-SHA256 with a random 16-byte salt, stored as
//!
//! ```text
//! pbkdf2-sha256${iterations}${salt_hex}${hash_hex}
//! ```
//!
//! ## Sessions
//!
//! `POST /api/auth/token` mints 32 random bytes, returns them hex-encoded as
//! the bearer token, and stores only their SHA-256 in a [`SessionRecord`]
//! that expires after `ACCESS_TOKEN_EXPIRE_MINUTES`.
//!
//! ## CallerIdentity
//!
//! The middleware resolves the bearer token (if any) and injects a
//! [`CallerIdentity`] into the request extensions. With `REQUIRE_AUTH=true`,
//! requests to non-public paths without a valid session are rejected with
//! 401. Handlers that always need a user extract [`AuthenticatedUser`].

use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use astra_core::user::{SessionRecord, User};

use crate::config::MAX_TOKEN_MINUTES;
use crate::error::AppError;
use crate::state::AppState;

const HASH_SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;
const TOKEN_LEN: usize = 32;

/// Paths that never require a session, even with `REQUIRE_AUTH=true`.
pub const PUBLIC_PATHS: [&str; 7] = [
    "/api",
    "/api/",
    "/api/health",
    "/api/plans",
    "/api/auth/register",
    "/api/auth/token",
    "/openapi.json",
];

// -- Passwords ----------------------------------------------------------------

pub fn hash_password(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let hash = derive(password, &salt, iterations);
    format!(
        "{HASH_SCHEME}${iterations}${}${}",
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// Check a password against a stored hash. Malformed hashes never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != HASH_SCHEME {
        return false;
    }
    let (Ok(iterations), Ok(salt), Ok(expected)) =
        (iterations.parse::<u32>(), hex::decode(salt), hex::decode(expected))
    else {
        return false;
    };
    if iterations == 0 {
        return false;
    }
    let actual = derive(password, &salt, iterations);
    actual.as_slice().ct_eq(expected.as_slice()).into()
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

// -- Sessions -----------------------------------------------------------------

/// SHA-256 of a bearer token, as stored in a session.
pub fn token_hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Mint a bearer token and the session that recognizes it. Lifetimes beyond
/// a year either way are capped.
pub fn new_session(user_id: Uuid, lifetime_minutes: i64) -> (String, SessionRecord) {
    let lifetime = Duration::minutes(lifetime_minutes.clamp(-MAX_TOKEN_MINUTES, MAX_TOKEN_MINUTES));
    let mut bytes = [0u8; TOKEN_LEN];
    OsRng.fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    let now = Utc::now();
    let session = SessionRecord {
        id: Uuid::new_v4(),
        user_id,
        token_hash: token_hash(&token),
        created_at: now,
        expires_at: now + lifetime,
    };
    (token, session)
}

/// The active user behind a bearer token, if the session is live.
pub fn resolve_token(state: &AppState, token: &str) -> Option<User> {
    let hash = token_hash(token);
    let session = state
        .sessions
        .find(|s| bool::from(s.token_hash.as_bytes().ct_eq(hash.as_bytes())))?;
    if session.is_expired(Utc::now()) {
        return None;
    }
    let user = state.users.get(&session.user_id)?;
    user.is_active.then(|| user.to_public())
}

// -- CallerIdentity -----------------------------------------------------------

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerIdentity {
    Anonymous,
    User(User),
}

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .unwrap_or(CallerIdentity::Anonymous))
    }
}

/// A signed-in user. Rejects anonymous callers with 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<CallerIdentity>() {
            Some(CallerIdentity::User(user)) => Ok(Self(user.clone())),
            _ => Err(AppError::Unauthorized(
                "Could not validate credentials".into(),
            )),
        }
    }
}

// -- Middleware ---------------------------------------------------------------

fn bearer_token(request: &Request) -> Result<Option<&str>, &'static str> {
    match request.headers().get(header::AUTHORIZATION) {
        None => Ok(None),
        Some(value) => {
            let value = value
                .to_str()
                .map_err(|_| "authorization header is not valid ASCII")?;
            match value.strip_prefix("Bearer ") {
                Some(token) if !token.trim().is_empty() => Ok(Some(token.trim())),
                _ => Err("authorization header must use Bearer scheme"),
            }
        }
    }
}

/// Resolve the caller and, when auth is required, reject unauthenticated
/// requests to non-public paths.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let required =
        state.config.require_auth && !PUBLIC_PATHS.contains(&request.uri().path());

    let identity = match bearer_token(&request) {
        Ok(Some(token)) => match resolve_token(&state, token) {
            Some(user) => Ok(CallerIdentity::User(user)),
            None => Err("invalid or expired token"),
        },
        Ok(None) => {
            if required {
                Err("missing authorization header")
            } else {
                Ok(CallerIdentity::Anonymous)
            }
        }
        Err(msg) => Err(msg),
    };

    match identity {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(msg) if required => {
            tracing::warn!(reason = msg, path = %request.uri().path(), "authentication failed");
            AppError::Unauthorized(msg.to_string()).into_response()
        }
        Err(msg) => {
            tracing::debug!(reason = msg, "ignoring unusable credentials on open route");
            request.extensions_mut().insert(CallerIdentity::Anonymous);
            next.run(request).await
        }
    }
}
