//! In-memory payment session store.
//!
//! Sessions live in a fixed set of hash-selected shards, each guarded by its
//! own mutex, so unrelated sessions never contend and no lock is ever held
//! across I/O. `try_complete` is the release-once operation: for a given
//! session reference, exactly one caller may observe success, however many
//! race on it.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use chrono::Utc;
use parking_lot::Mutex;

use crate::error::{AppError, Result};
use crate::id;
use crate::models::{AnalysisPayload, PaymentSession, ProductType, RegionalPrice, SessionStatus};

const SHARD_COUNT: usize = 16;

/// Counts from one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Pending sessions moved to Expired.
    pub expired: usize,
    /// Sessions evicted after the grace period.
    pub evicted: usize,
}

struct Shard {
    sessions: Mutex<HashMap<String, PaymentSession>>,
}

pub struct SessionStore {
    shards: Vec<Shard>,
    ttl_secs: i64,
    grace_secs: i64,
}

impl SessionStore {
    /// `ttl_secs` is the hard session lifetime; `grace_secs` is how long a
    /// terminal session is kept past `expires_at` before eviction.
    pub fn new(ttl_secs: i64, grace_secs: i64) -> Self {
        let shards = (0..SHARD_COUNT)
            .map(|_| Shard {
                sessions: Mutex::new(HashMap::new()),
            })
            .collect();

        Self {
            shards,
            ttl_secs,
            grace_secs,
        }
    }

    fn shard(&self, session_id: &str) -> &Shard {
        let mut hasher = DefaultHasher::new();
        session_id.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % SHARD_COUNT]
    }

    /// Create a Pending session with the price fixed from `price`.
    ///
    /// Generates the session reference, stores, and returns immediately -
    /// never blocks on external calls.
    pub fn create(
        &self,
        product_id: &str,
        product_type: ProductType,
        price: &RegionalPrice,
        payload: AnalysisPayload,
    ) -> PaymentSession {
        let now = Utc::now().timestamp();
        let session = PaymentSession {
            id: id::generate_session_ref(),
            status: SessionStatus::Pending,
            product_id: product_id.to_string(),
            product_type,
            region: price.region.clone(),
            currency: price.currency.clone(),
            amount: price.amount,
            display: price.display.clone(),
            payload,
            created_at: now,
            expires_at: now + self.ttl_secs,
        };

        self.shard(&session.id)
            .sessions
            .lock()
            .insert(session.id.clone(), session.clone());

        session
    }

    pub fn get(&self, session_id: &str) -> Option<PaymentSession> {
        self.shard(session_id)
            .sessions
            .lock()
            .get(session_id)
            .cloned()
    }

    /// Atomically redeem a session: `Pending -> Completed`, releasing the
    /// bound payload exactly once.
    ///
    /// The check-and-set happens under the owning shard lock, so concurrent
    /// calls with the same reference are linearized: one succeeds, the rest
    /// fail with `SessionAlreadyCompleted`. A Pending session observed past
    /// its TTL transitions to Expired here even if the sweeper has not run.
    pub fn try_complete(&self, session_id: &str) -> Result<AnalysisPayload> {
        let now = Utc::now().timestamp();
        let mut sessions = self.shard(session_id).sessions.lock();

        let session = sessions.get_mut(session_id).ok_or(AppError::SessionNotFound)?;

        match session.status {
            SessionStatus::Completed => Err(AppError::SessionAlreadyCompleted),
            SessionStatus::Expired => Err(AppError::SessionExpired),
            SessionStatus::Pending if session.is_expired(now) => {
                session.status = SessionStatus::Expired;
                Err(AppError::SessionExpired)
            }
            SessionStatus::Pending => {
                session.status = SessionStatus::Completed;
                Ok(session.payload.clone())
            }
        }
    }

    /// Move overdue Pending sessions to Expired and evict anything past the
    /// grace period, bounding memory.
    ///
    /// Idempotent and tolerant of being skipped or delayed; Completed
    /// sessions are never transitioned, only evicted once their grace
    /// period lapses.
    pub fn expire_sweep(&self, now: i64) -> SweepStats {
        let mut stats = SweepStats::default();

        for shard in &self.shards {
            let mut sessions = shard.sessions.lock();

            for session in sessions.values_mut() {
                if session.status == SessionStatus::Pending && session.is_expired(now) {
                    session.status = SessionStatus::Expired;
                    stats.expired += 1;
                }
            }

            let grace_secs = self.grace_secs;
            let before = sessions.len();
            sessions.retain(|_, s| now < s.expires_at + grace_secs);
            stats.evicted += before - sessions.len();
        }

        stats
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.sessions.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
