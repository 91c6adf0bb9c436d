use serde::{Deserialize, Serialize};

use crate::error::msg;

/// Payment session lifecycle state.
///
/// Transitions are forward-only: `Pending -> Completed` exactly once (via
/// redemption), or `Pending -> Expired` when the TTL elapses first. Nothing
/// ever leaves `Completed` or `Expired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Completed,
    Expired,
}

/// What kind of purchase a session covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    /// A single analysis product.
    Individual,
    /// A bundle of analysis products sold together.
    Bundle,
}

/// The buyer's in-flight work, bound to a session until redemption.
///
/// Modeled as a tagged variant rather than an untyped map so consumers of a
/// redeemed session get compile-time guarantees about what they receive.
/// Never persisted beyond the session lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisPayload {
    /// Extracted resume text, optionally paired with a job posting for context.
    Resume {
        resume_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        job_posting: Option<String>,
    },
    /// Resume scored against a specific job posting; the posting is required.
    JobMatch {
        resume_text: String,
        job_posting: String,
    },
}

impl AnalysisPayload {
    pub fn resume_text(&self) -> &str {
        match self {
            AnalysisPayload::Resume { resume_text, .. } => resume_text,
            AnalysisPayload::JobMatch { resume_text, .. } => resume_text,
        }
    }

    /// Reject structurally valid but empty submissions before a session is
    /// created for them.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.resume_text().trim().is_empty() {
            return Err(msg::EMPTY_RESUME_TEXT);
        }
        if let AnalysisPayload::JobMatch { job_posting, .. } = self {
            if job_posting.trim().is_empty() {
                return Err(msg::EMPTY_JOB_POSTING);
            }
        }
        Ok(())
    }
}

/// Payment session tracks a purchase from product selection to redemption.
///
/// The price fields are fixed at creation time from the resolved regional
/// price and must not change even if live pricing later changes.
#[derive(Debug, Clone)]
pub struct PaymentSession {
    /// Opaque session reference (`cq_ps_` + 32 hex chars).
    pub id: String,
    pub status: SessionStatus,
    pub product_id: String,
    pub product_type: ProductType,
    pub region: String,
    pub currency: String,
    /// Price in whole currency units, fixed at session creation.
    pub amount: i64,
    pub display: String,
    pub payload: AnalysisPayload,
    pub created_at: i64,
    pub expires_at: i64,
}

impl PaymentSession {
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

/// Request body for `POST /payment/session`.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub product_id: String,
    pub product_type: ProductType,
    pub region: String,
    pub payload: AnalysisPayload,
}

/// Response for `POST /payment/session`.
///
/// The payment URL embeds only the opaque session reference - never the
/// price or the payload.
#[derive(Debug, Serialize)]
pub struct PaymentLinkResponse {
    pub session_id: String,
    pub payment_url: String,
    pub amount: i64,
    pub currency: String,
    pub display: String,
}

impl PaymentLinkResponse {
    pub fn from_session(session: &PaymentSession, payment_url: String) -> Self {
        Self {
            session_id: session.id.clone(),
            payment_url,
            amount: session.amount,
            currency: session.currency.clone(),
            display: session.display.clone(),
        }
    }
}
