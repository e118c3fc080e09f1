// ABOUTME: Form inputs accepted by admin mutations and their validation
// ABOUTME: Converts raw form fields into typed commands before any store access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::VerificationStatus;

/// Form for `update_lawyer_status`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLawyerStatusForm {
    /// Provider user id
    pub lawyer_id: Option<String>,
    /// `VERIFIED` or `REJECTED`
    pub status: Option<String>,
}

impl UpdateLawyerStatusForm {
    /// Validate into a provider id and target status
    ///
    /// # Errors
    ///
    /// Returns a validation error if a field is missing, the id is malformed or
    /// the status is anything other than `VERIFIED` or `REJECTED`.
    pub fn validate(&self) -> AppResult<(Uuid, VerificationStatus)> {
        let lawyer_id = required_uuid(self.lawyer_id.as_deref(), "lawyerId")?;
        let raw = required(self.status.as_deref(), "status")?;

        match raw.parse::<VerificationStatus>() {
            Ok(status @ (VerificationStatus::Verified | VerificationStatus::Rejected)) => {
                Ok((lawyer_id, status))
            }
            _ => Err(AppError::invalid_input(format!(
                "Invalid status '{raw}': expected VERIFIED or REJECTED"
            ))),
        }
    }
}

/// Form for `update_lawyer_active_status`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLawyerActiveStatusForm {
    /// Provider user id
    pub lawyer_id: Option<String>,
    /// `"true"` to suspend, `"false"` to reactivate
    pub suspend: Option<String>,
}

impl UpdateLawyerActiveStatusForm {
    /// Validate into a provider id and suspend flag
    ///
    /// # Errors
    ///
    /// Returns a validation error if a field is missing, the id is malformed or
    /// `suspend` is not exactly `"true"` or `"false"`.
    pub fn validate(&self) -> AppResult<(Uuid, bool)> {
        let lawyer_id = required_uuid(self.lawyer_id.as_deref(), "lawyerId")?;
        let suspend = match required(self.suspend.as_deref(), "suspend")? {
            "true" => true,
            "false" => false,
            other => {
                return Err(AppError::invalid_input(format!(
                    "Invalid suspend value '{other}': expected true or false"
                )))
            }
        };
        Ok((lawyer_id, suspend))
    }
}

/// Form for `approve_payout`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovePayoutForm {
    /// Payout request id
    pub payout_id: Option<String>,
}

impl ApprovePayoutForm {
    /// Validate into a payout id
    ///
    /// # Errors
    ///
    /// Returns a validation error if the id is missing or malformed.
    pub fn validate(&self) -> AppResult<Uuid> {
        required_uuid(self.payout_id.as_deref(), "payoutId")
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> AppResult<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::missing_field(field))
}

fn required_uuid(value: Option<&str>, field: &str) -> AppResult<Uuid> {
    let raw = required(value, field)?;
    Uuid::parse_str(raw).map_err(|_| AppError::invalid_input(format!("Invalid {field}: {raw}")))
}
