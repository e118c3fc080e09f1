// ABOUTME: Response bodies for the admin HTTP API
// ABOUTME: Wraps service results in the JSON envelopes the dashboard consumes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::models::{PendingPayout, User};

/// Response for `GET /admin/verify`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VerifyAdminResponse {
    /// Whether the caller holds the ADMIN role
    pub is_admin: bool,
}

/// Response for provider listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LawyerListResponse {
    /// Matching providers
    pub lawyers: Vec<User>,
}

/// Response for `GET /admin/payouts/pending`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutListResponse {
    /// Payouts awaiting approval with their providers
    pub payouts: Vec<PendingPayout>,
}
