// ABOUTME: Shared database logic for backend implementations
// ABOUTME: Row mapping helpers and the RAII transaction guard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Row ↔ model conversion helpers
pub mod mappers;

/// Transaction guard with rollback on drop
pub mod transactions;
