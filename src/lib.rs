// ABOUTME: Main library entry point for the Counselhub admin API
// ABOUTME: Provider verification, suspension and payout approval for a legal services marketplace
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Counselhub Admin Server
//!
//! Administrative operations for a marketplace whose providers are lawyers:
//!
//! - checking whether a caller is an admin,
//! - listing providers awaiting verification and approving or rejecting them,
//! - suspending and reactivating verified providers,
//! - approving payout requests, which deducts the provider's credits and
//!   records a ledger entry in one transaction.
//!
//! ## Architecture
//!
//! - **Services**: [`services::AdminService`] holds the business rules
//! - **Database plugins**: [`database_plugins::AdminDataProvider`] with a `SQLite` backend
//! - **Identity**: bearer tokens resolved into a [`identity::CallerIdentity`]
//! - **Cache**: admin listings cached in memory and invalidated after writes
//! - **Routes**: thin axum handlers over the service
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use counselhub_admin::cache::NoopInvalidator;
//! use counselhub_admin::config::DatabaseUrl;
//! use counselhub_admin::database_plugins::SqliteDatabase;
//! use counselhub_admin::errors::AppResult;
//! use counselhub_admin::identity::CallerIdentity;
//! use counselhub_admin::services::AdminService;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let database = SqliteDatabase::new(&DatabaseUrl::Memory).await?;
//!     let service = AdminService::new(Arc::new(database), Arc::new(NoopInvalidator));
//!
//!     let caller = CallerIdentity::from_subject("firebase-uid");
//!     println!("admin: {}", service.verify_admin(&caller).await);
//!     Ok(())
//! }
//! ```

/// Admin view cache and invalidation
pub mod cache;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// Storage abstraction and `SQLite` backend
pub mod database_plugins;

/// Error types
pub mod errors;

/// Caller identity resolution
pub mod identity;

/// Logging setup
pub mod logging;

/// HTTP middleware stack
pub mod middleware;

/// Data models
pub mod models;

/// HTTP routes
pub mod routes;

/// Business logic
pub mod services;
