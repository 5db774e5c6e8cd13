//! # Accounts API
//!
//! Registration, password-grant token issue, and the current user.
//! Password hashing runs on the blocking pool.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Form, Json, Router};

use astra_core::user::{normalize_email, LoginForm, RegisterRequest, Token, User, UserRecord};

use crate::auth::{hash_password, new_session, verify_password, AuthenticatedUser};
use crate::error::AppError;
use crate::extractors::{extract_form, extract_validated_json};
use crate::routes::blocking;
use crate::state::{AppState, EMAIL_TAKEN};

const BAD_CREDENTIALS: &str = "Incorrect username or password";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/token", post(issue_token))
        .route("/api/auth/me", get(current_user))
}

/// POST /api/auth/register: Create an account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = User),
        (status = 400, description = "Email already registered", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid email or password", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let req = extract_validated_json(body)?;
    let email = normalize_email(&req.email);
    // Held until the record is saved so a concurrent request sees the email as taken.
    let _claim = state
        .claim_email(&email)
        .ok_or_else(|| AppError::BadRequest(EMAIL_TAKEN.into()))?;

    let iterations = state.config.password_hash_iterations;
    let password = req.password;
    let password_hash = blocking(move || hash_password(&password, iterations)).await?;

    let record = state
        .save(UserRecord::new(email, req.full_name, password_hash))
        .await?;
    tracing::info!(user_id = %record.id, "user registered");
    Ok(Json(record.to_public()))
}

/// POST /api/auth/token: Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/token",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Bearer token", body = Token),
        (status = 401, description = "Incorrect username or password", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
async fn issue_token(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<Token>, AppError> {
    let form = extract_form(form)?;
    let email = normalize_email(&form.username);
    let user = state
        .users
        .find(|u| u.email == email)
        .ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.into()))?;

    let stored = user.password_hash.clone();
    let password = form.password;
    let matches = blocking(move || verify_password(&password, &stored)).await?;
    if !matches || !user.is_active {
        tracing::warn!(user_id = %user.id, "login rejected");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.into()));
    }

    let (token, session) = new_session(user.id, state.config.access_token_expire_minutes);
    state.save(session).await?;
    tracing::info!(user_id = %user.id, "session issued");
    Ok(Json(Token::bearer(token)))
}

/// GET /api/auth/me: The signed-in user.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not signed in", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
async fn current_user(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
