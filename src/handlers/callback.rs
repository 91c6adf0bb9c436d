use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::extractors::{Json, Query};
use crate::id;
use crate::models::{AnalysisPayload, ProductType};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReturnQuery {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub session_id: String,
    pub product_id: String,
    pub product_type: ProductType,
    /// The work bound at session creation, released exactly once. The
    /// premium-content generator consumes this.
    pub payload: AnalysisPayload,
}

/// GET /payment/return - the buyer's return from the payment provider.
///
/// The redirect is untrusted input: the reference is shape-checked cheaply,
/// then redeemed atomically. Exactly one return (or retry, or double-click)
/// succeeds per session; the rest get distinct, user-distinguishable errors.
///
/// Redemption is keyed on the returned reference alone - there is no
/// provider webhook confirming payment before release.
pub async fn payment_return(
    State(state): State<AppState>,
    Query(query): Query<ReturnQuery>,
) -> Result<Json<RedeemResponse>> {
    // Reject garbage before touching the store.
    if !id::is_valid_session_ref(&query.session_id) {
        return Err(AppError::SessionNotFound);
    }

    let payload = state.sessions.try_complete(&query.session_id)?;

    // The session is Completed now and survives until the sweeper's grace
    // period lapses, so this lookup cannot miss.
    let session = state
        .sessions
        .get(&query.session_id)
        .ok_or_else(|| AppError::Internal("redeemed session vanished".into()))?;

    tracing::info!(
        session_id = %session.id,
        product_id = %session.product_id,
        "payment session redeemed"
    );

    Ok(Json(RedeemResponse {
        session_id: session.id,
        product_id: session.product_id,
        product_type: session.product_type,
        payload,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CancelQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// GET /payment/cancel - the buyer aborted checkout at the provider.
///
/// Deliberately mutates nothing: the session stays Pending and remains
/// redeemable until its TTL, in case the buyer changes their mind and pays
/// after all.
pub async fn payment_cancel(Query(query): Query<CancelQuery>) -> Json<CancelResponse> {
    if let Some(ref session_id) = query.session_id {
        tracing::info!(session_id = %session_id, "checkout cancelled by buyer");
    }

    Json(CancelResponse {
        status: "cancelled",
        session_id: query.session_id,
    })
}
