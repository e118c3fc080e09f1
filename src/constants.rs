// ABOUTME: Application constants for service identity, defaults and route paths
// ABOUTME: Centralizes env-overridable defaults and identity-provider endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Service identity used in logs and health output
pub mod service_names {
    /// Binary and log service name
    pub const COUNSELHUB_ADMIN_SERVER: &str = "counselhub-admin-server";
}

/// Default values for environment configuration
pub mod defaults {
    /// HTTP port the admin API listens on
    pub const HTTP_PORT: u16 = 8081;
    /// File-backed database used when `DATABASE_URL` is unset
    pub const DATABASE_URL: &str = "sqlite:./data/counselhub.db";
    /// Whole-request timeout applied by the HTTP layer
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Lifetime of a cached admin view
    pub const ADMIN_VIEW_CACHE_TTL_SECS: u64 = 60;
    /// Maximum number of cached admin views
    pub const ADMIN_VIEW_CACHE_CAPACITY: usize = 16;
    /// How long a `SQLite` connection waits on a locked database
    pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;
    /// Fallback lifetime for cached identity-provider signing keys
    pub const FIREBASE_KEY_CACHE_TTL_SECS: u64 = 3600;
}

/// Identity provider endpoints and token constraints
pub mod identity {
    /// Google X.509 certificates used to sign Firebase ID tokens
    pub const FIREBASE_CERTS_URL: &str =
        "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";
    /// Issuer prefix; the project id is appended
    pub const FIREBASE_ISSUER_PREFIX: &str = "https://securetoken.google.com/";
    /// Lower bound on how long fetched keys are trusted
    pub const MIN_KEY_CACHE_SECS: u64 = 300;
    /// Timeout for the certificate fetch
    pub const CERT_FETCH_TIMEOUT_SECS: u64 = 10;
}

/// HTTP route paths
pub mod routes {
    /// Admin API prefix
    pub const ADMIN_PREFIX: &str = "/admin";
    /// Liveness probe
    pub const HEALTH: &str = "/health";
}
