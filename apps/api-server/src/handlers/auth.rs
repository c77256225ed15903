//! Authentication handlers: register, login, session check, logout.

use actix_web::{HttpResponse, web};

use quill_core::domain::User;
use quill_shared::dto::{LoginRequest, RegisterRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::{removal_cookie, session_cookie};
use crate::state::AppState;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;

fn validate_username(username: &str) -> Result<(), AppError> {
    let len = username.chars().count();
    if len < USERNAME_MIN || len > USERNAME_MAX {
        return Err(AppError::BadRequest(format!(
            "Username must be {USERNAME_MIN}-{USERNAME_MAX} characters"
        )));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::BadRequest(
            "Username must contain only letters and digits".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validate_username(&req.username)?;
    if req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Password must not be empty".to_string(),
        ));
    }

    if state
        .users
        .find_by_username(&req.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = state.users.insert(User::new(req.username, password_hash)).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "Registered new user");

    let token = state
        .tokens
        .issue_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Created()
        .cookie(session_cookie(token, state.tokens.lifetime_seconds()))
        .json(UserResponse {
            id: user.id.to_string(),
            username: user.username,
        }))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Unknown username and wrong password answer identically.
    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = state
        .passwords
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    let token = state
        .tokens
        .issue_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, state.tokens.lifetime_seconds()))
        .json(UserResponse {
            id: user.id.to_string(),
            username: user.username,
        }))
}

/// GET /api/auth/check - who is the current session?
pub async fn check(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse {
        id: identity.user_id.to_string(),
        username: identity.username,
    }))
}

/// POST /api/auth/logout
pub async fn logout() -> HttpResponse {
    HttpResponse::NoContent().cookie(removal_cookie()).finish()
}
