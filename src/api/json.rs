// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON request body extractor with API-shaped rejections.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Like [`Json`], but a bad body is a 400 `{"error": ...}` with a fixed
/// message. The deserializer's detail is only logged.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Err(ApiError::bad_request(rejection_message(&rejection)))
            }
        }
    }
}

fn rejection_message(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => "Content-Type must be application/json",
        _ => "Invalid request body",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Credentials {
        username: String,
        password: String,
    }

    fn request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(value) = content_type {
            builder = builder.header("content-type", value);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn valid_body_is_extracted() {
        let ApiJson(creds) = ApiJson::<Credentials>::from_request(
            request(Some("application/json"), r#"{"username":"a","password":"b"}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(creds.username, "a");
        assert_eq!(creds.password, "b");
    }

    #[tokio::test]
    async fn missing_field_is_400_without_serde_detail() {
        let Err(err) = ApiJson::<Credentials>::from_request(
            request(Some("application/json"), r#"{"username":"a"}"#),
            &(),
        )
        .await
        else {
            panic!("body without password was accepted");
        };
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid request body");
    }

    #[tokio::test]
    async fn syntax_error_and_missing_content_type_are_400() {
        for req in [
            request(Some("application/json"), "{not json"),
            request(None, r#"{"username":"a","password":"b"}"#),
        ] {
            let Err(err) = ApiJson::<Credentials>::from_request(req, &()).await else {
                panic!("bad request body was accepted");
            };
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
        }
    }
}
