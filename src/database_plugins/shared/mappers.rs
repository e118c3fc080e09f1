// ABOUTME: SQL row to model conversion helpers
// ABOUTME: Parses users, payouts, provider projections and ledger entries from SQLite rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Row ↔ model conversion
//!
//! Ids are stored as hyphenated UUID text and enums as their upper-case
//! storage names, so both are parsed here rather than through `sqlx` type
//! derives.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Decode, Row, Sqlite, Type};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{
    CreditTransaction, Payout, PendingPayout, ProviderSummary, User, UserRole, VerificationStatus,
};

/// Read a column, naming it in the error
fn column<'r, T>(row: &'r SqliteRow, name: &str) -> AppResult<T>
where
    T: Decode<'r, Sqlite> + Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| AppError::database(format!("Failed to get column '{name}': {e}")))
}

fn uuid_column(row: &SqliteRow, name: &str) -> AppResult<Uuid> {
    let raw: String = column(row, name)?;
    Uuid::parse_str(&raw)
        .map_err(|e| AppError::database(format!("Invalid UUID in column '{name}': {e}")))
}

fn optional_uuid_column(row: &SqliteRow, name: &str) -> AppResult<Option<Uuid>> {
    let raw: Option<String> = column(row, name)?;
    raw.map(|value| {
        Uuid::parse_str(&value)
            .map_err(|e| AppError::database(format!("Invalid UUID in column '{name}': {e}")))
    })
    .transpose()
}

fn enum_column<E>(row: &SqliteRow, name: &str) -> AppResult<E>
where
    E: FromStr<Err = AppError>,
{
    let raw: String = column(row, name)?;
    raw.parse()
        .map_err(|e: AppError| AppError::database(format!("Column '{name}': {}", e.message)))
}

/// Parse a `users` row
///
/// # Errors
///
/// Returns an error if a column is missing or holds an unknown enum value.
pub fn parse_user_from_row(row: &SqliteRow) -> AppResult<User> {
    let role: Option<String> = column(row, "role")?;
    let role = role
        .map(|value| value.parse::<UserRole>())
        .transpose()
        .map_err(|e: AppError| AppError::database(format!("Column 'role': {}", e.message)))?;
    let verification_status: VerificationStatus = enum_column(row, "verification_status")?;

    Ok(User {
        id: uuid_column(row, "id")?,
        identity_subject: column(row, "identity_subject")?,
        role,
        verification_status,
        credits: column(row, "credits")?,
        name: column(row, "name")?,
        email: column(row, "email")?,
        specialty: column(row, "specialty")?,
        is_active: column(row, "is_active")?,
        created_at: column::<DateTime<Utc>>(row, "created_at")?,
        updated_at: column::<DateTime<Utc>>(row, "updated_at")?,
    })
}

/// Parse a `payouts` row
///
/// # Errors
///
/// Returns an error if a column is missing or holds an unknown status.
pub fn parse_payout_from_row(row: &SqliteRow) -> AppResult<Payout> {
    Ok(Payout {
        id: uuid_column(row, "id")?,
        user_id: uuid_column(row, "user_id")?,
        credits: column(row, "credits")?,
        status: enum_column(row, "status")?,
        created_at: column(row, "created_at")?,
        processed_at: column(row, "processed_at")?,
        processed_by: optional_uuid_column(row, "processed_by")?,
    })
}

/// Parse a payout joined with its provider
///
/// Provider columns are expected under the `lawyer_` prefix.
///
/// # Errors
///
/// Returns an error if a column is missing or malformed.
pub fn parse_pending_payout_from_row(row: &SqliteRow) -> AppResult<PendingPayout> {
    Ok(PendingPayout {
        payout: parse_payout_from_row(row)?,
        lawyer: ProviderSummary {
            id: uuid_column(row, "lawyer_id")?,
            name: column(row, "lawyer_name")?,
            email: column(row, "lawyer_email")?,
            specialty: column(row, "lawyer_specialty")?,
            credits: column(row, "lawyer_credits")?,
        },
    })
}

/// Parse a `credit_transactions` row
///
/// # Errors
///
/// Returns an error if a column is missing or holds an unknown type.
pub fn parse_credit_transaction_from_row(row: &SqliteRow) -> AppResult<CreditTransaction> {
    Ok(CreditTransaction {
        id: uuid_column(row, "id")?,
        user_id: uuid_column(row, "user_id")?,
        amount: column(row, "amount")?,
        transaction_type: enum_column(row, "transaction_type")?,
        created_at: column(row, "created_at")?,
    })
}
