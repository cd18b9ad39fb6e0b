// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Activity log endpoint.

use axum::{extract::State, Json};

use crate::engine::activity::ActivityEntry;
use crate::state::AppState;

/// Recent orchestration activity, newest first.
///
/// The log is in-memory and bounded; it resets when the service
/// restarts.
#[utoipa::path(
    get,
    path = "/v1/activity",
    tag = "Activity",
    responses(
        (status = 200, description = "Recent activity entries", body = [ActivityEntry])
    )
)]
pub async fn list_activity(State(state): State<AppState>) -> Json<Vec<ActivityEntry>> {
    Json(state.engine.activity.entries())
}
