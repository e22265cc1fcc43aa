// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put, MethodRouter},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{
        middleware::{authenticate, authorize},
        Role, RoutePolicy,
    },
    error::ApiError,
    models::{
        CreateUserRequest, LoginRequest, LoginResponse, MessageResponse, Pagination,
        RegisterRequest, UpdateUserRequest, UserEnvelope, UserListResponse, UserResponse,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod json;
pub mod users;

/// Attach a route policy to every method currently on `routes`.
fn guard(policy: RoutePolicy, routes: MethodRouter<AppState>) -> MethodRouter<AppState> {
    routes.route_layer(from_fn_with_state(policy, authorize))
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/health", guard(RoutePolicy::NoAuth, get(health::health)))
        .route("/api/auth/login", guard(RoutePolicy::NoAuth, post(auth::login)))
        .route(
            "/api/auth/register",
            guard(RoutePolicy::NoAuth, post(auth::register)),
        )
        .route(
            "/api/users/me",
            guard(RoutePolicy::Authenticated, get(users::get_current_user)),
        )
        .route(
            "/api/users/{id}",
            guard(RoutePolicy::Authenticated, get(users::get_user)).merge(guard(
                RoutePolicy::SelfOrRole(Role::Teacher),
                put(users::update_user).delete(users::delete_user),
            )),
        )
        .route(
            "/api/users",
            guard(
                RoutePolicy::Role(Role::Teacher),
                get(users::list_users).post(users::create_user),
            ),
        )
        .layer(from_fn_with_state(state.auth.clone(), authenticate))
        .with_state(state);

    // Docs and the fallback stay outside the authentication filter
    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::login,
        auth::register,
        users::get_current_user,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::list_users,
        users::create_user
    ),
    components(
        schemas(
            health::HealthResponse,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            UserEnvelope,
            UserListResponse,
            Pagination,
            MessageResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Auth", description = "Login and self-service registration"),
        (name = "Users", description = "User accounts and profiles")
    )
)]
pub struct ApiDoc;
