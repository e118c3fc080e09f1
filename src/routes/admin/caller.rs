// ABOUTME: Request extractor that resolves the bearer token into a caller identity
// ABOUTME: Missing credentials yield an anonymous caller; bad credentials are rejected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::AdminApiContext;
use crate::errors::{AppError, AppResult};
use crate::identity::CallerIdentity;

/// Caller identity resolved from the `Authorization` header
pub struct Caller(pub CallerIdentity);

#[axum::async_trait]
impl FromRequestParts<Arc<AdminApiContext>> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        context: &Arc<AdminApiContext>,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => context.identity.resolve(token).await.map(Self),
            None => Ok(Self(CallerIdentity::anonymous())),
        }
    }
}

fn bearer_token(parts: &Parts) -> AppResult<Option<&str>> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| AppError::auth_invalid("Authorization header is not valid UTF-8"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Some)
        .ok_or_else(|| AppError::auth_invalid("Authorization header must carry a Bearer token"))
}
