// ABOUTME: Admin route handlers for payout review and approval
// ABOUTME: Lists pending payouts and approves them through the admin service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};

use super::caller::Caller;
use super::types::PayoutListResponse;
use super::{cached_view, AdminApiContext};
use crate::cache::AdminView;
use crate::errors::AppResult;
use crate::services::admin::ApprovePayoutForm;
use crate::services::MutationOutcome;

/// Handle pending payout listing
pub(super) async fn handle_pending_payouts(
    State(context): State<Arc<AdminApiContext>>,
    Caller(caller): Caller,
) -> AppResult<Json<PayoutListResponse>> {
    let session = context.service.authorize(&caller).await?;
    let payouts = cached_view(&context.view_cache, AdminView::PendingPayouts, || {
        context.service.pending_payouts(&session)
    })
    .await?;
    Ok(Json(PayoutListResponse { payouts }))
}

/// Handle payout approval
pub(super) async fn handle_approve_payout(
    State(context): State<Arc<AdminApiContext>>,
    Caller(caller): Caller,
    Form(form): Form<ApprovePayoutForm>,
) -> AppResult<Json<MutationOutcome>> {
    context.service.approve_payout(&caller, &form).await.map(Json)
}
