// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and registration endpoints.

use axum::{extract::State, http::StatusCode, Json};

use super::json::ApiJson;
use crate::{
    auth::{
        password::{hash_password_blocking, verify_password_blocking},
        AuthError, Role,
    },
    config::BootstrapAccount,
    error::ApiError,
    models::{LoginRequest, LoginResponse, RegisterRequest, User, UserEnvelope},
    state::AppState,
    storage::NewUser,
};

pub const MIN_PASSWORD_LEN: usize = 6;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub(crate) fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(ApiError::bad_request("Invalid email address"))
    }
}

pub(crate) fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )))
    }
}

/// Validate, hash and store a new account.
///
/// The password is hashed off the runtime, before the store lock is taken.
pub async fn create_account(
    state: &AppState,
    username: &str,
    email: &str,
    password: &str,
    full_name: &str,
    role: Role,
) -> Result<User, ApiError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ApiError::bad_request("Username is required"));
    }
    validate_email(email)?;
    validate_password(password)?;

    let password_hash = hash_password_blocking(password.to_string()).await?;

    let user = state.users.write().await.create(NewUser {
        username: username.to_string(),
        email: email.to_string(),
        full_name: full_name.to_string(),
        password_hash,
        role,
    })?;

    tracing::info!(user_id = user.id, role = %user.role, "Created user account");
    Ok(user)
}

/// Create the configured bootstrap account with the `teacher` role.
pub async fn seed_bootstrap_account(
    state: &AppState,
    account: &BootstrapAccount,
) -> Result<User, ApiError> {
    create_account(
        state,
        &account.username,
        &account.email,
        &account.password,
        "",
        Role::Teacher,
    )
    .await
}

/// Exchange credentials for a bearer token.
///
/// `username` may also be the account's email address.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Token could not be issued")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let user = state
        .users
        .read()
        .await
        .find_for_login(&request.username)
        .cloned();

    // Unknown user and wrong password are indistinguishable to the caller
    let verified = match &user {
        Some(user) => {
            verify_password_blocking(request.password, user.password_hash.clone()).await?
        }
        None => false,
    };
    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::debug!("Login rejected");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let token = state
        .codec()
        .issue(&user.identity())
        .map_err(AuthError::from)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: (&user).into(),
    }))
}

/// Self-service registration; always creates a student account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserEnvelope),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    let user = create_account(
        &state,
        &request.username,
        &request.email,
        &request.password,
        &request.full_name,
        Role::Student,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            user: (&user).into(),
        }),
    ))
}
