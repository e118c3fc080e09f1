// ABOUTME: HTTP-level tests for the admin API routes
// ABOUTME: Exercises auth handling, form parsing, error bodies and cached listings through axum
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::http::StatusCode;
use axum::Router;
use chrono::{DateTime, Utc};
use common::{create_admin, create_client, create_payout, create_test_database, LawyerFixture};
use counselhub_admin::{
    cache::InMemoryViewCache,
    config::ViewCacheConfig,
    database_plugins::{AdminDataProvider, PayoutApproval, ProviderOrdering, SqliteDatabase},
    errors::{AppError, AppResult},
    identity::{CallerIdentity, IdentityResolver},
    models::{
        CreditTransaction, Payout, PayoutStatus, PendingPayout, User, UserRole,
        VerificationStatus,
    },
    routes::{build_router, AdminApiContext},
    services::{admin::UpdateLawyerStatusForm, AdminService},
};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use uuid::Uuid;

const ADMIN_TOKEN: &str = "admin-token";
const CLIENT_TOKEN: &str = "client-token";

/// Maps fixed test tokens onto the fixture subjects
struct StubIdentityResolver;

#[async_trait]
impl IdentityResolver for StubIdentityResolver {
    async fn resolve(&self, token: &str) -> AppResult<CallerIdentity> {
        match token {
            ADMIN_TOKEN => Ok(CallerIdentity::from_subject("admin-subject")),
            CLIENT_TOKEN => Ok(CallerIdentity::from_subject("client-subject")),
            _ => Err(AppError::auth_invalid("Unrecognised test token")),
        }
    }
}

async fn setup_app() -> Result<(Router, Arc<SqliteDatabase>)> {
    let database = create_test_database().await?;
    create_admin(&database).await?;
    create_client(&database).await?;

    let view_cache = Arc::new(InMemoryViewCache::new(&ViewCacheConfig::default())?);
    let context = AdminApiContext::new(
        database.clone(),
        Arc::new(StubIdentityResolver),
        view_cache,
    );
    Ok((build_router(context, Duration::from_secs(30)), database))
}

/// Store that lets another admin verify a provider while a listing read is in flight
///
/// The first provider listing is read from the store, then the verification
/// runs through a second service sharing the same view cache, then the
/// now-outdated rows are returned.
struct VerifyDuringListing {
    inner: Arc<SqliteDatabase>,
    other_admin: AdminService,
    lawyer_id: Uuid,
    fired: AtomicBool,
}

#[async_trait]
impl AdminDataProvider for VerifyDuringListing {
    async fn create_user(&self, user: &User) -> AppResult<()> {
        self.inner.create_user(user).await
    }

    async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        self.inner.get_user(user_id).await
    }

    async fn get_user_by_identity_subject(&self, subject: &str) -> AppResult<Option<User>> {
        self.inner.get_user_by_identity_subject(subject).await
    }

    async fn list_users_by_role_and_status(
        &self,
        role: UserRole,
        status: VerificationStatus,
        ordering: ProviderOrdering,
    ) -> AppResult<Vec<User>> {
        let rows = self
            .inner
            .list_users_by_role_and_status(role, status, ordering)
            .await?;
        if !self.fired.swap(true, Ordering::SeqCst) {
            self.other_admin
                .update_lawyer_status(
                    &CallerIdentity::from_subject("admin-subject"),
                    &UpdateLawyerStatusForm {
                        lawyer_id: Some(self.lawyer_id.to_string()),
                        status: Some("VERIFIED".to_owned()),
                    },
                )
                .await?;
        }
        Ok(rows)
    }

    async fn update_verification_status(
        &self,
        lawyer_id: Uuid,
        status: VerificationStatus,
    ) -> AppResult<bool> {
        self.inner.update_verification_status(lawyer_id, status).await
    }

    async fn update_provider_activity(&self, lawyer_id: Uuid, suspend: bool) -> AppResult<bool> {
        self.inner.update_provider_activity(lawyer_id, suspend).await
    }

    async fn create_payout(&self, payout: &Payout) -> AppResult<()> {
        self.inner.create_payout(payout).await
    }

    async fn get_payout(&self, payout_id: Uuid) -> AppResult<Option<Payout>> {
        self.inner.get_payout(payout_id).await
    }

    async fn list_payouts_with_provider(
        &self,
        status: PayoutStatus,
    ) -> AppResult<Vec<PendingPayout>> {
        self.inner.list_payouts_with_provider(status).await
    }

    async fn approve_payout(
        &self,
        payout_id: Uuid,
        admin_id: Uuid,
        processed_at: DateTime<Utc>,
    ) -> AppResult<PayoutApproval> {
        self.inner
            .approve_payout(payout_id, admin_id, processed_at)
            .await
    }

    async fn list_credit_transactions(&self, user_id: Uuid) -> AppResult<Vec<CreditTransaction>> {
        self.inner.list_credit_transactions(user_id).await
    }
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

// ============================================================================
// Health and admin check
// ============================================================================

#[tokio::test]
async fn test_health_route() -> Result<()> {
    let (app, _) = setup_app().await?;

    let response = AxumTestRequest::get("/health").send(app).await;
    assert_eq!(response.status(), 200);
    assert!(response.request_id().is_some());
    Ok(())
}

#[tokio::test]
async fn test_request_id_is_propagated() -> Result<()> {
    let (app, _) = setup_app().await?;

    let response = AxumTestRequest::get("/admin/verify")
        .header("x-request-id", "trace-me-123")
        .send(app)
        .await;
    assert_eq!(response.request_id(), Some("trace-me-123"));
    Ok(())
}

#[tokio::test]
async fn test_verify_route_reports_admin_role() -> Result<()> {
    let (app, _) = setup_app().await?;

    let body: Value = AxumTestRequest::get("/admin/verify")
        .bearer(ADMIN_TOKEN)
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body, json!({ "is_admin": true }));

    let body: Value = AxumTestRequest::get("/admin/verify")
        .bearer(CLIENT_TOKEN)
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["is_admin"], false);

    let body: Value = AxumTestRequest::get("/admin/verify")
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["is_admin"], false);
    Ok(())
}

#[tokio::test]
async fn test_verify_route_never_errors_on_bad_credentials() -> Result<()> {
    let (app, _) = setup_app().await?;

    let body: Value = AxumTestRequest::get("/admin/verify")
        .bearer("forged")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["is_admin"], false);

    let body: Value = AxumTestRequest::get("/admin/verify")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["is_admin"], false);
    Ok(())
}

// ============================================================================
// Gating
// ============================================================================

#[tokio::test]
async fn test_gated_routes_refuse_non_admins() -> Result<()> {
    let (app, _) = setup_app().await?;

    for uri in [
        "/admin/lawyers/pending",
        "/admin/lawyers/verified",
        "/admin/payouts/pending",
    ] {
        let body: Value = AxumTestRequest::get(uri)
            .bearer(CLIENT_TOKEN)
            .send(app.clone())
            .await
            .assert_status(StatusCode::FORBIDDEN)
            .json();
        assert_eq!(error_code(&body), "PERMISSION_DENIED", "{uri}");
        assert_eq!(body["error"]["message"], "Unauthorized");

        AxumTestRequest::get(uri)
            .send(app.clone())
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
    Ok(())
}

#[tokio::test]
async fn test_gated_routes_reject_invalid_tokens() -> Result<()> {
    let (app, _) = setup_app().await?;

    let body: Value = AxumTestRequest::get("/admin/lawyers/pending")
        .bearer("forged")
        .send(app.clone())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(error_code(&body), "AUTH_INVALID");

    AxumTestRequest::post("/admin/payouts/approve")
        .header("authorization", "Token abc")
        .form(&[("payoutId", uuid::Uuid::new_v4().to_string())])
        .send(app)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

// ============================================================================
// Provider management
// ============================================================================

#[tokio::test]
async fn test_status_form_updates_provider() -> Result<()> {
    let (app, database) = setup_app().await?;
    let lawyer = LawyerFixture::new("Hal Http").insert(&database).await?;

    let body: Value = AxumTestRequest::post("/admin/lawyers/status")
        .bearer(ADMIN_TOKEN)
        .form(&[
            ("lawyerId", lawyer.id.to_string()),
            ("status", "VERIFIED".to_owned()),
        ])
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body, json!({ "success": true }));

    let body: Value = AxumTestRequest::get("/admin/lawyers/verified")
        .bearer(ADMIN_TOKEN)
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let lawyers = body["lawyers"].as_array().unwrap();
    assert_eq!(lawyers.len(), 1);
    assert_eq!(lawyers[0]["id"], lawyer.id.to_string());
    assert_eq!(lawyers[0]["verification_status"], "VERIFIED");
    Ok(())
}

#[tokio::test]
async fn test_status_form_validation_errors() -> Result<()> {
    let (app, database) = setup_app().await?;
    let lawyer = LawyerFixture::new("Vic Validation").insert(&database).await?;

    let body: Value = AxumTestRequest::post("/admin/lawyers/status")
        .bearer(ADMIN_TOKEN)
        .form(&[
            ("lawyerId", lawyer.id.to_string()),
            ("status", "SUSPENDED".to_owned()),
        ])
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(error_code(&body), "INVALID_INPUT");

    let body: Value = AxumTestRequest::post("/admin/lawyers/status")
        .bearer(ADMIN_TOKEN)
        .form(&[("status", "VERIFIED")])
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(error_code(&body), "MISSING_REQUIRED_FIELD");

    AxumTestRequest::post("/admin/lawyers/status")
        .bearer(ADMIN_TOKEN)
        .form(&[
            ("lawyerId", uuid::Uuid::new_v4().to_string()),
            ("status", "REJECTED".to_owned()),
        ])
        .send(app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_suspension_visible_through_cached_listings() -> Result<()> {
    let (app, database) = setup_app().await?;
    let lawyer = LawyerFixture::new("Cam Cached")
        .status(VerificationStatus::Verified)
        .insert(&database)
        .await?;

    // Prime both listing caches
    let verified: Value = AxumTestRequest::get("/admin/lawyers/verified")
        .bearer(ADMIN_TOKEN)
        .send(app.clone())
        .await
        .json();
    assert_eq!(verified["lawyers"].as_array().unwrap().len(), 1);
    let pending: Value = AxumTestRequest::get("/admin/lawyers/pending")
        .bearer(ADMIN_TOKEN)
        .send(app.clone())
        .await
        .json();
    assert!(pending["lawyers"].as_array().unwrap().is_empty());

    AxumTestRequest::post("/admin/lawyers/active-status")
        .bearer(ADMIN_TOKEN)
        .form(&[
            ("lawyerId", lawyer.id.to_string()),
            ("suspend", "true".to_owned()),
        ])
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK);

    let verified: Value = AxumTestRequest::get("/admin/lawyers/verified")
        .bearer(ADMIN_TOKEN)
        .send(app.clone())
        .await
        .json();
    assert!(verified["lawyers"].as_array().unwrap().is_empty());

    let pending: Value = AxumTestRequest::get("/admin/lawyers/pending")
        .bearer(ADMIN_TOKEN)
        .send(app)
        .await
        .json();
    let pending = pending["lawyers"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["is_active"], false);
    Ok(())
}

#[tokio::test]
async fn test_listing_read_before_verification_is_not_cached() -> Result<()> {
    let database = create_test_database().await?;
    create_admin(&database).await?;
    let lawyer = LawyerFixture::new("Rory Racing").insert(&database).await?;

    let view_cache = Arc::new(InMemoryViewCache::new(&ViewCacheConfig::default())?);
    let store = VerifyDuringListing {
        inner: database.clone(),
        other_admin: AdminService::new(database.clone(), view_cache.clone()),
        lawyer_id: lawyer.id,
        fired: AtomicBool::new(false),
    };
    let context = AdminApiContext::new(
        Arc::new(store),
        Arc::new(StubIdentityResolver),
        view_cache,
    );
    let app = build_router(context, Duration::from_secs(30));

    // The in-flight request still answers with what it read
    let first: Value = AxumTestRequest::get("/admin/lawyers/pending")
        .bearer(ADMIN_TOKEN)
        .send(app.clone())
        .await
        .json();
    assert_eq!(first["lawyers"].as_array().unwrap().len(), 1);

    let second: Value = AxumTestRequest::get("/admin/lawyers/pending")
        .bearer(ADMIN_TOKEN)
        .send(app)
        .await
        .json();
    assert!(second["lawyers"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_active_status_rejects_unparseable_flag() -> Result<()> {
    let (app, database) = setup_app().await?;
    let lawyer = LawyerFixture::new("Flo Flag").insert(&database).await?;

    AxumTestRequest::post("/admin/lawyers/active-status")
        .bearer(ADMIN_TOKEN)
        .form(&[
            ("lawyerId", lawyer.id.to_string()),
            ("suspend", "maybe".to_owned()),
        ])
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

// ============================================================================
// Payouts
// ============================================================================

#[tokio::test]
async fn test_payout_approval_flow() -> Result<()> {
    let (app, database) = setup_app().await?;
    let lawyer = LawyerFixture::new("Paula Payout")
        .status(VerificationStatus::Verified)
        .credits(100)
        .insert(&database)
        .await?;
    let payout = create_payout(&database, &lawyer, 50).await?;

    let listed: Value = AxumTestRequest::get("/admin/payouts/pending")
        .bearer(ADMIN_TOKEN)
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let payouts = listed["payouts"].as_array().unwrap();
    assert_eq!(payouts.len(), 1);
    assert_eq!(payouts[0]["id"], payout.id.to_string());
    assert_eq!(payouts[0]["credits"], 50);
    assert_eq!(payouts[0]["lawyer"]["name"], "Paula Payout");
    assert_eq!(payouts[0]["lawyer"]["credits"], 100);

    let body: Value = AxumTestRequest::post("/admin/payouts/approve")
        .bearer(ADMIN_TOKEN)
        .form(&[("payoutId", payout.id.to_string())])
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["success"], true);

    let body: Value = AxumTestRequest::post("/admin/payouts/approve")
        .bearer(ADMIN_TOKEN)
        .form(&[("payoutId", payout.id.to_string())])
        .send(app.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .json();
    assert_eq!(error_code(&body), "RESOURCE_NOT_FOUND");

    // The approval cleared the cached listing
    let listed: Value = AxumTestRequest::get("/admin/payouts/pending")
        .bearer(ADMIN_TOKEN)
        .send(app)
        .await
        .json();
    assert!(listed["payouts"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_payout_exceeding_balance_is_unprocessable() -> Result<()> {
    let (app, database) = setup_app().await?;
    let lawyer = LawyerFixture::new("Oscar Overdraw")
        .status(VerificationStatus::Verified)
        .credits(100)
        .insert(&database)
        .await?;
    let payout = create_payout(&database, &lawyer, 150).await?;

    let body: Value = AxumTestRequest::post("/admin/payouts/approve")
        .bearer(ADMIN_TOKEN)
        .form(&[("payoutId", payout.id.to_string())])
        .send(app)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .json();
    assert_eq!(error_code(&body), "INSUFFICIENT_BALANCE");
    Ok(())
}
