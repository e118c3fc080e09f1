// ABOUTME: Core types for the Counselhub professional-services marketplace
// ABOUTME: Foundation crate with error handling and the admin domain models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Counselhub Core
//!
//! Foundation crate providing shared types for the Counselhub admin platform.
//! It changes infrequently so the service crate can compile incrementally
//! against it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: Users, payouts and credit ledger entries

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Marketplace data models (User, Payout, `CreditTransaction`)
pub mod models;
