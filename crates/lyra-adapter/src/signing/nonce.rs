/*
[INPUT]:  Current UTC time and random suffixes
[OUTPUT]: Replay-protection nonces and signature expiry timestamps
[POS]:    Signing layer - per-action time-derived fields
[UPDATE]: When the venue changes its nonce window or format
*/

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rand::Rng;

use crate::http::{LyraError, Result};

/// Widest shift of the millisecond component the venue accepts
pub const MAX_NONCE_OFFSET_MS: i64 = 24 * 60 * 60 * 1000;

/// Produces `<utc ms><3-digit suffix>` nonces, strictly increasing per generator
#[derive(Debug, Default)]
pub struct NonceGenerator {
    last: AtomicU64,
}

impl NonceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nonce for the current time
    pub fn next(&self) -> u64 {
        self.next_at(Utc::now().timestamp_millis(), 0)
            .unwrap_or_else(|_| self.bump(0))
    }

    /// Nonce for `timestamp_ms + offset_ms`
    ///
    /// A suffix collision inside the same millisecond is resolved by taking
    /// the next free value above the last nonce handed out.
    pub fn next_at(&self, timestamp_ms: i64, offset_ms: i64) -> Result<u64> {
        let candidate = nonce_for(timestamp_ms, offset_ms, rand::thread_rng().gen_range(0..1000))?;
        Ok(self.bump(candidate))
    }

    fn bump(&self, candidate: u64) -> u64 {
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let next = candidate.max(current.saturating_add(1));
            match self.last.compare_exchange_weak(
                current,
                next,
                Ordering::SeqCst,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(observed) => current = observed,
            }
        }
    }
}

/// `(timestamp_ms + offset_ms) * 1000 + suffix`
pub fn nonce_for(timestamp_ms: i64, offset_ms: i64, suffix: u16) -> Result<u64> {
    if offset_ms.abs() > MAX_NONCE_OFFSET_MS {
        return Err(LyraError::signing(format!(
            "nonce offset {offset_ms}ms exceeds one day"
        )));
    }
    if suffix > 999 {
        return Err(LyraError::signing(format!(
            "nonce suffix {suffix} is not three digits"
        )));
    }

    let millis = timestamp_ms
        .checked_add(offset_ms)
        .and_then(|value| u64::try_from(value).ok())
        .ok_or_else(|| LyraError::signing("nonce timestamp is negative"))?;
    millis
        .checked_mul(1000)
        .and_then(|value| value.checked_add(u64::from(suffix)))
        .ok_or_else(|| LyraError::signing("nonce overflows u64"))
}

/// Unix seconds after which a signature stops being accepted
pub fn expiry_after(now_secs: i64, validity_secs: u64) -> u64 {
    u64::try_from(now_secs)
        .unwrap_or_default()
        .saturating_add(validity_secs)
}

/// Expiry counted from the current time
pub fn expiry_from_now(validity_secs: u64) -> u64 {
    expiry_after(Utc::now().timestamp(), validity_secs)
}
