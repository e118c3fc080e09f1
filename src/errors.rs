// ABOUTME: Error types for the admin server, re-exported from counselhub-core
// ABOUTME: Keeps `crate::errors` paths stable for handlers and storage code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Unified error handling
//!
//! See [`counselhub_core::errors`] for the error codes and their HTTP mapping.

pub use counselhub_core::errors::*;
