// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.
//!
//! Access control is enforced by the route policies in [`super::router`];
//! handlers only see requests that were already allowed.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::auth::{create_account, validate_email, validate_password};
use super::json::ApiJson;
use crate::{
    auth::{password::hash_password_blocking, policy::parse_subject_id, Auth},
    error::ApiError,
    models::{
        CreateUserRequest, ListUsersQuery, MessageResponse, Pagination, UpdateUserRequest,
        UserEnvelope, UserListResponse,
    },
    state::AppState,
};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

fn user_id_from_path(raw: &str) -> Result<u64, ApiError> {
    parse_subject_id(raw).map_err(ApiError::from)
}

/// Resolve pagination parameters, falling back to defaults on bad input.
fn resolve_page(query: &ListUsersQuery) -> (usize, usize) {
    let page = query
        .page
        .as_deref()
        .and_then(|raw| raw.parse::<usize>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(DEFAULT_PAGE);
    let page_size = query
        .page_size
        .as_deref()
        .and_then(|raw| raw.parse::<usize>().ok())
        .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
        .unwrap_or(DEFAULT_PAGE_SIZE);
    (page, page_size)
}

/// Get the current authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = UserEnvelope),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> Result<Json<UserEnvelope>, ApiError> {
    let user = state.users.read().await.get(identity.subject_id)?;
    Ok(Json(UserEnvelope {
        user: (&user).into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer" = [])),
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserEnvelope),
        (status = 400, description = "Invalid user ID"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let id = user_id_from_path(&id)?;
    let user = state.users.read().await.get(id)?;
    Ok(Json(UserEnvelope {
        user: (&user).into(),
    }))
}

/// Update a profile. Allowed for the account owner and for teachers.
///
/// Empty or missing fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer" = [])),
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserEnvelope),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let id = user_id_from_path(&id)?;

    let email = request.email.filter(|email| !email.is_empty());
    if let Some(email) = &email {
        validate_email(email)?;
    }
    let full_name = request.full_name.filter(|name| !name.is_empty());
    let password_hash = match request.password.filter(|password| !password.is_empty()) {
        Some(password) => {
            validate_password(&password)?;
            Some(hash_password_blocking(password).await?)
        }
        None => None,
    };

    let mut users = state.users.write().await;
    let mut user = users.get(id)?;
    if let Some(email) = email {
        user.email = email;
    }
    if let Some(full_name) = full_name {
        user.full_name = full_name;
    }
    if let Some(password_hash) = password_hash {
        user.password_hash = password_hash;
    }
    users.update(user.clone())?;

    tracing::info!(user_id = id, "Updated user");
    Ok(Json(UserEnvelope {
        user: (&user).into(),
    }))
}

/// Delete an account. Allowed for the account owner and for teachers.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer" = [])),
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid user ID"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = user_id_from_path(&id)?;
    state.users.write().await.delete(id)?;

    tracing::info!(user_id = id, "Deleted user");
    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}

/// List users, paginated. Teachers only.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer" = [])),
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users", body = UserListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Json<UserListResponse> {
    let (page, page_size) = resolve_page(&query);
    let (users, total) = state.users.read().await.list(page, page_size);

    Json(UserListResponse {
        users: users.iter().map(Into::into).collect(),
        pagination: Pagination {
            total,
            page,
            page_size,
        },
    })
}

/// Create an account with any role. Teachers only.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    security(("bearer" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created user", body = UserEnvelope),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Auth(creator): Auth,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    let role = request.role.unwrap_or_default();
    if role.as_str().is_empty() {
        return Err(ApiError::bad_request("Role must not be empty"));
    }

    let user = create_account(
        &state,
        &request.username,
        &request.email,
        &request.password,
        &request.full_name,
        role,
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        created_by = creator.subject_id,
        "Teacher created user"
    );
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            user: (&user).into(),
        }),
    ))
}
