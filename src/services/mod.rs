// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Keeps admin rules independent of the HTTP surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Route handlers stay thin and delegate here, so the same rules apply to any
//! entry point that can produce a [`CallerIdentity`](crate::identity::CallerIdentity).

/// Provider vetting and payout approval
pub mod admin;

pub use admin::{AdminService, AdminSession, MutationOutcome};
