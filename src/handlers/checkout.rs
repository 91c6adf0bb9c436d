use axum::extract::State;

use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::{CreatePaymentRequest, PaymentLinkResponse};
use crate::payments;
use crate::state::AppState;

/// POST /payment/session - create a payment session and checkout link.
///
/// Fixes the price first (live with fallback), then creates the Pending
/// session binding the buyer's in-flight work, then builds the provider
/// redirect URL. The URL embeds only the opaque session reference - the
/// price was fixed at creation and the payload never leaves the store.
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<Json<PaymentLinkResponse>> {
    request
        .payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.into()))?;

    let price = state
        .pricing
        .resolve(&request.product_id, &request.region)
        .await?;

    let session = state.sessions.create(
        &request.product_id,
        request.product_type,
        &price,
        request.payload,
    );

    let return_url = format!(
        "{}/payment/return?session_id={}",
        state.base_url, session.id
    );
    let cancel_url = format!(
        "{}/payment/cancel?session_id={}",
        state.base_url, session.id
    );
    let payment_url =
        payments::build_checkout_url(&state.checkout_url, &session.id, &return_url, &cancel_url);

    tracing::info!(
        session_id = %session.id,
        product_id = %session.product_id,
        region = %session.region,
        amount = session.amount,
        currency = %session.currency,
        source = ?price.source,
        "payment session created"
    );

    Ok(Json(PaymentLinkResponse::from_session(&session, payment_url)))
}
