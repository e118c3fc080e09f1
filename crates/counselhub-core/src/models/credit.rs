// ABOUTME: Credit ledger entries recording every change to a user's balance
// ABOUTME: Entries are append-only and carry a signed amount
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Reason for a credit balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditTransactionType {
    /// Client bought credits
    CreditPurchase,
    /// Credits spent on an appointment
    AppointmentDeduction,
    /// Manual or payout-driven admin change
    AdminAdjustment,
}

impl CreditTransactionType {
    /// Stored representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditPurchase => "CREDIT_PURCHASE",
            Self::AppointmentDeduction => "APPOINTMENT_DEDUCTION",
            Self::AdminAdjustment => "ADMIN_ADJUSTMENT",
        }
    }
}

impl Display for CreditTransactionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreditTransactionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREDIT_PURCHASE" => Ok(Self::CreditPurchase),
            "APPOINTMENT_DEDUCTION" => Ok(Self::AppointmentDeduction),
            "ADMIN_ADJUSTMENT" => Ok(Self::AdminAdjustment),
            other => Err(AppError::invalid_input(format!(
                "Unknown credit transaction type: {other}"
            ))),
        }
    }
}

/// Immutable ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreditTransaction {
    /// Unique entry identifier
    pub id: Uuid,
    /// User whose balance changed
    pub user_id: Uuid,
    /// Signed change applied to the balance
    pub amount: i64,
    /// Reason for the change
    pub transaction_type: CreditTransactionType,
    /// When the change was recorded
    pub created_at: DateTime<Utc>,
}
