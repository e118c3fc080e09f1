// ABOUTME: Marketplace data models, re-exported from counselhub-core
// ABOUTME: Users, payouts and credit ledger entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use counselhub_core::models::*;
