// ABOUTME: Admin route handlers for provider verification and suspension
// ABOUTME: Serves cached provider listings and forwards status changes to the admin service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use tracing::info;

use super::caller::Caller;
use super::types::{LawyerListResponse, VerifyAdminResponse};
use super::{cached_view, AdminApiContext};
use crate::cache::AdminView;
use crate::errors::{AppError, AppResult};
use crate::services::admin::{UpdateLawyerActiveStatusForm, UpdateLawyerStatusForm};
use crate::services::MutationOutcome;

/// Handle privilege check
///
/// Credential problems are folded into `is_admin: false`.
pub(super) async fn handle_verify_admin(
    State(context): State<Arc<AdminApiContext>>,
    caller: Result<Caller, AppError>,
) -> Json<VerifyAdminResponse> {
    let is_admin = match caller {
        Ok(Caller(caller)) => context.service.verify_admin(&caller).await,
        Err(e) => {
            info!(error = %e, "Admin check with unusable credentials");
            false
        }
    };
    Json(VerifyAdminResponse { is_admin })
}

/// Handle pending provider listing
pub(super) async fn handle_pending_lawyers(
    State(context): State<Arc<AdminApiContext>>,
    Caller(caller): Caller,
) -> AppResult<Json<LawyerListResponse>> {
    let session = context.service.authorize(&caller).await?;
    let lawyers = cached_view(&context.view_cache, AdminView::PendingLawyers, || {
        context.service.pending_lawyers(&session)
    })
    .await?;
    Ok(Json(LawyerListResponse { lawyers }))
}

/// Handle verified provider listing
pub(super) async fn handle_verified_lawyers(
    State(context): State<Arc<AdminApiContext>>,
    Caller(caller): Caller,
) -> AppResult<Json<LawyerListResponse>> {
    let session = context.service.authorize(&caller).await?;
    let lawyers = cached_view(&context.view_cache, AdminView::VerifiedLawyers, || {
        context.service.verified_lawyers(&session)
    })
    .await?;
    Ok(Json(LawyerListResponse { lawyers }))
}

/// Handle verification decision
pub(super) async fn handle_update_lawyer_status(
    State(context): State<Arc<AdminApiContext>>,
    Caller(caller): Caller,
    Form(form): Form<UpdateLawyerStatusForm>,
) -> AppResult<Json<MutationOutcome>> {
    context
        .service
        .update_lawyer_status(&caller, &form)
        .await
        .map(Json)
}

/// Handle suspension toggle
pub(super) async fn handle_update_lawyer_active_status(
    State(context): State<Arc<AdminApiContext>>,
    Caller(caller): Caller,
    Form(form): Form<UpdateLawyerActiveStatusForm>,
) -> AppResult<Json<MutationOutcome>> {
    context
        .service
        .update_lawyer_active_status(&caller, &form)
        .await
        .map(Json)
}
