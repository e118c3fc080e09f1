// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Handles environment, database, identity provider and view cache configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for the Counselhub admin server
//!
//! All settings come from environment variables:
//!
//! - **Environment**: HTTP port, request timeout and the sections below
//! - **Database**: `SQLite` location and migration toggle
//! - **Identity**: Firebase project and key cache lifetime
//! - **Cache**: Admin view cache size and TTL

/// Admin view cache configuration
pub mod cache;
/// Database configuration
pub mod database;
/// Environment and server configuration
pub mod environment;
/// Identity provider configuration
pub mod identity;

pub use cache::ViewCacheConfig;
pub use database::{DatabaseConfig, DatabaseUrl};
pub use environment::ServerConfig;
pub use identity::FirebaseConfig;
