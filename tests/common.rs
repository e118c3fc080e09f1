// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, user and payout fixtures and service construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `counselhub_admin`

use std::sync::{Arc, Once};

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use counselhub_admin::{
    cache::{AdminView, NoopInvalidator, ViewInvalidator},
    config::DatabaseUrl,
    database_plugins::{AdminDataProvider, SqliteDatabase},
    identity::CallerIdentity,
    models::{Payout, User, UserRole, VerificationStatus},
    services::AdminService,
};
use tokio::sync::Mutex;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh migrated in-memory database
pub async fn create_test_database() -> Result<Arc<SqliteDatabase>> {
    init_test_logging();
    Ok(Arc::new(SqliteDatabase::new(&DatabaseUrl::Memory).await?))
}

/// Records every invalidation signal it receives
#[derive(Default)]
pub struct RecordingInvalidator {
    views: Mutex<Vec<AdminView>>,
}

impl RecordingInvalidator {
    pub async fn recorded(&self) -> Vec<AdminView> {
        self.views.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl ViewInvalidator for RecordingInvalidator {
    async fn invalidate(&self, view: AdminView) {
        self.views.lock().await.push(view);
    }
}

/// Service over `database` that discards invalidation signals
pub fn create_test_service(database: Arc<SqliteDatabase>) -> AdminService {
    AdminService::new(database, Arc::new(NoopInvalidator))
}

/// Service over `database` that records invalidation signals
pub fn create_recording_service(
    database: Arc<SqliteDatabase>,
) -> (AdminService, Arc<RecordingInvalidator>) {
    let invalidator = Arc::new(RecordingInvalidator::default());
    (
        AdminService::new(database, invalidator.clone()),
        invalidator,
    )
}

/// Insert an admin and return it with its caller identity
pub async fn create_admin(database: &SqliteDatabase) -> Result<(User, CallerIdentity)> {
    let mut user = User::new("admin-subject", "admin@counselhub.test");
    user.role = Some(UserRole::Admin);
    user.verification_status = VerificationStatus::Verified;
    user.name = Some("Site Admin".to_owned());
    database.create_user(&user).await?;

    let caller = CallerIdentity::from_subject(&user.identity_subject);
    Ok((user, caller))
}

/// Insert a client and return it with its caller identity
pub async fn create_client(database: &SqliteDatabase) -> Result<(User, CallerIdentity)> {
    let mut user = User::new("client-subject", "client@counselhub.test");
    user.role = Some(UserRole::Client);
    user.name = Some("Casey Client".to_owned());
    database.create_user(&user).await?;

    let caller = CallerIdentity::from_subject(&user.identity_subject);
    Ok((user, caller))
}

/// Builder for provider fixtures
pub struct LawyerFixture {
    user: User,
}

impl LawyerFixture {
    pub fn new(name: &str) -> Self {
        let slug = name.to_lowercase().replace(' ', ".");
        let mut user = User::new(format!("lawyer-{slug}"), format!("{slug}@counselhub.test"));
        user.role = Some(UserRole::Lawyer);
        user.name = Some(name.to_owned());
        user.specialty = Some("Family Law".to_owned());
        Self { user }
    }

    pub const fn status(mut self, status: VerificationStatus) -> Self {
        self.user.verification_status = status;
        self
    }

    pub const fn credits(mut self, credits: i64) -> Self {
        self.user.credits = credits;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.user.created_at = created_at;
        self.user.updated_at = created_at;
        self
    }

    pub async fn insert(self, database: &SqliteDatabase) -> Result<User> {
        database.create_user(&self.user).await?;
        Ok(self.user)
    }
}

/// Insert a `PROCESSING` payout for `lawyer`
pub async fn create_payout(database: &SqliteDatabase, lawyer: &User, credits: i64) -> Result<Payout> {
    let payout = Payout::new(lawyer.id, credits);
    database.create_payout(&payout).await?;
    Ok(payout)
}

/// Insert a `PROCESSING` payout created `minutes_ago`
pub async fn create_payout_at(
    database: &SqliteDatabase,
    lawyer: &User,
    credits: i64,
    minutes_ago: i64,
) -> Result<Payout> {
    let mut payout = Payout::new(lawyer.id, credits);
    payout.created_at = Utc::now() - Duration::minutes(minutes_ago);
    database.create_payout(&payout).await?;
    Ok(payout)
}

/// Make every ledger insert fail so the approval transaction must roll back
pub async fn install_ledger_failure_trigger(database: &SqliteDatabase) -> Result<()> {
    sqlx::query(
        r"
        CREATE TRIGGER fail_ledger_insert
        BEFORE INSERT ON credit_transactions
        BEGIN
            SELECT RAISE(ABORT, 'ledger unavailable');
        END
        ",
    )
    .execute(database.pool())
    .await?;
    Ok(())
}

/// Current stored state of a user, failing the test if absent
pub async fn reload_user(database: &SqliteDatabase, user: &User) -> Result<User> {
    database
        .get_user(user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("user {} disappeared", user.id))
}
