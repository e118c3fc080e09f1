// ABOUTME: Core data models for the Counselhub marketplace
// ABOUTME: Re-exports users, payouts and credit ledger types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `User`: identity-linked account with role, verification status and credits
//! - `Payout`: provider withdrawal request
//! - `CreditTransaction`: append-only ledger entry

mod credit;
mod payout;
mod user;

pub use credit::{CreditTransaction, CreditTransactionType};
pub use payout::{Payout, PayoutStatus, PendingPayout};
pub use user::{ProviderSummary, User, UserRole, VerificationStatus};
