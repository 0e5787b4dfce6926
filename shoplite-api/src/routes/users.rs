/// User endpoints: signup, login, and user management
///
/// Login deliberately returns one generic 401 for both "no such email" and
/// "wrong password" so that path does not reveal account existence. Signup
/// still answers 409 for a duplicate email; the inconsistent leakage
/// posture is preserved as specified.
///
/// # Endpoints
///
/// - `POST /user/signup` - Create an account
/// - `POST /user/login` - Authenticate, returns a 1-hour bearer token
/// - `GET /user/users` - List accounts (bearer token required)
/// - `DELETE /user/:id` - Delete an account (bearer token required)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::RequestLink,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shoplite_shared::auth::{jwt, password};
use shoplite_shared::models::user::{CreateUser, User};
use uuid::Uuid;
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (stored only as a salted hash)
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Signup response
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    /// Confirmation message
    pub message: String,

    /// ID of the created user
    pub user_id: Uuid,

    /// Canonical follow-up call (login)
    pub request: RequestLink,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Confirmation message
    pub message: String,

    /// Signed bearer token, valid for 1 hour
    pub token: String,
}

/// Projection of a user returned to clients (never the password hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// List users response
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    /// Number of users returned
    pub count: usize,

    /// User projections
    pub users: Vec<UserResponse>,
}

/// Confirmation response for deletes
#[derive(Debug, Serialize)]
pub struct ConfirmationResponse {
    /// Confirmation message
    pub message: String,
}

/// Creates a new account
///
/// # Endpoint
///
/// ```text
/// POST /user/signup
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "hunter2!" }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: email already registered
/// - `422 Unprocessable Entity`: invalid email or missing password
/// - `500 Internal Server Error`: hashing or storage failure
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    req.validate().map_err(super::validation_errors)?;

    // Explicit duplicate check; the unique index backs this up if a
    // concurrent signup wins the race.
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict(
            "There is already a registered user with this email".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created".to_string(),
            user_id: user.id,
            request: RequestLink::post("/user/login"),
        }),
    ))
}

/// Authenticates and issues a bearer token
///
/// # Endpoint
///
/// ```text
/// POST /user/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "hunter2!" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password (same message for
///   both)
/// - `500 Internal Server Error`: storage or signing failure
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(super::validation_errors)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.id, user.email);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        message: "Auth successful".to_string(),
        token,
    }))
}

/// Lists all accounts (projection, never password hashes)
///
/// Requires a valid bearer token.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<ListUsersResponse>> {
    let users = User::list(&state.db).await?;

    let users: Vec<UserResponse> = users
        .into_iter()
        .map(|user| UserResponse {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        })
        .collect();

    Ok(Json(ListUsersResponse {
        count: users.len(),
        users,
    }))
}

/// Deletes an account by id
///
/// Requires a valid bearer token. Returns a 200 confirmation whether or
/// not the account existed.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ConfirmationResponse>> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid user id".to_string()))?;

    // Result is ignored: deleting an absent id still confirms
    User::delete(&state.db, id).await?;

    Ok(Json(ConfirmationResponse {
        message: "User deleted".to_string(),
    }))
}
