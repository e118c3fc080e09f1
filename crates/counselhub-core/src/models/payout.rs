// ABOUTME: Payout request model for providers withdrawing accumulated credits
// ABOUTME: Payouts move from PROCESSING to PROCESSED once an admin approves them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProviderSummary;
use crate::errors::AppError;

/// Lifecycle state of a payout request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutStatus {
    /// Awaiting admin approval
    #[default]
    Processing,
    /// Approved and deducted from the provider balance
    Processed,
    /// Declined; no approval path produces this state yet
    Rejected,
}

impl PayoutStatus {
    /// Stored representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "PROCESSING",
            Self::Processed => "PROCESSED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl Display for PayoutStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayoutStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROCESSING" => Ok(Self::Processing),
            "PROCESSED" => Ok(Self::Processed),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(AppError::invalid_input(format!(
                "Unknown payout status: {other}"
            ))),
        }
    }
}

/// A provider's request to withdraw credits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payout {
    /// Unique payout identifier
    pub id: Uuid,
    /// Provider that requested the payout
    pub user_id: Uuid,
    /// Requested credit amount
    pub credits: i64,
    /// Current state
    pub status: PayoutStatus,
    /// When the provider requested the payout
    pub created_at: DateTime<Utc>,
    /// When an admin approved the payout
    pub processed_at: Option<DateTime<Utc>>,
    /// Admin who approved the payout
    pub processed_by: Option<Uuid>,
}

impl Payout {
    /// Build a new payout request in the `PROCESSING` state
    #[must_use]
    pub fn new(user_id: Uuid, credits: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            credits,
            status: PayoutStatus::Processing,
            created_at: Utc::now(),
            processed_at: None,
            processed_by: None,
        }
    }
}

/// Payout awaiting approval together with the requesting provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingPayout {
    /// The payout request
    #[serde(flatten)]
    pub payout: Payout,
    /// Projection of the owning provider
    pub lawyer: ProviderSummary,
}
