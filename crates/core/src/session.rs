//! Stable session identity derivation.
//!
//! Requests to the generation backend carry a correlation id that stays
//! stable for the current user within one UTC hour; the backend groups
//! production records under it. The id is shaped like a UUID v5 but is
//! derived locally from `user_id|hour_bucket` -- it carries no secret
//! and is a correlation token only, never an authentication artifact.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use chrono::Utc;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::types::Timestamp;

/// Sentinel user id when no identifier is configured.
pub const ANONYMOUS_USER_ID: &str = "-1";

/// Shape a cached id must have to be trusted:
/// `xxxxxxxx-xxxx-5xxx-[89ab]xxx-xxxxxxxxxxxx`.
static UUID_V5_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-5[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("valid regex")
});

/// Digest routine used to derive session ids.
///
/// `Fallback` is a deliberately weak degraded mode for environments
/// without a cryptographic digest primitive: a 32-bit multiply-by-31
/// rolling hash stretched to 64 hex chars. It is internally consistent
/// for correlation purposes but is NOT stable across platforms and must
/// never be treated as a security mechanism. Callers opt into it
/// explicitly; nothing selects it silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestBackend {
    Sha256,
    Fallback,
}

/// Derives and caches the per-hour session id for one user.
pub struct SessionIdentity {
    user_id: String,
    backend: DigestBackend,
    /// Cached ids keyed by `session_id_<hour bucket>`.
    cache: Mutex<HashMap<String, String>>,
}

impl SessionIdentity {
    /// Identity with the SHA-256 digest backend.
    ///
    /// A blank `user_id` collapses to [`ANONYMOUS_USER_ID`].
    pub fn new(user_id: impl Into<String>) -> Self {
        Self::with_backend(user_id, DigestBackend::Sha256)
    }

    /// Identity with an explicit digest backend.
    pub fn with_backend(user_id: impl Into<String>, backend: DigestBackend) -> Self {
        let user_id = user_id.into();
        let user_id = if user_id.trim().is_empty() {
            ANONYMOUS_USER_ID.to_string()
        } else {
            user_id
        };
        Self {
            user_id,
            backend,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The configured user identifier, `"-1"` when anonymous.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Stable session id for the current UTC hour.
    ///
    /// The same `(user_id, hour)` always yields the same id within this
    /// process; the id changes when the hour rolls over.
    pub fn stable_session_id(&self) -> String {
        self.session_id_for_bucket(&hour_bucket(Utc::now()))
    }

    /// Stable session id for an explicit hour bucket (`YYYY-MM-DDTHH`).
    pub fn session_id_for_bucket(&self, bucket: &str) -> String {
        let key = format!("session_id_{bucket}");

        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(cached) = cache.get(&key) {
            // Only a well-shaped cached value is trusted; anything else
            // is recomputed.
            if UUID_V5_SHAPE.is_match(cached) {
                return cached.clone();
            }
        }

        let base = format!("{}|{}", self.user_id, bucket);
        let digest = match self.backend {
            DigestBackend::Sha256 => sha256_hex(base.as_bytes()),
            DigestBackend::Fallback => rolling_hex_digest(&base),
        };
        let id = format_uuid_v5_shape(&digest);

        // Stale buckets are never read again; keep only the current one.
        cache.retain(|k, _| k == &key);
        cache.insert(key, id.clone());
        id
    }
}

/// UTC time truncated to the hour, formatted `YYYY-MM-DDTHH`.
pub fn hour_bucket(now: Timestamp) -> String {
    now.format("%Y-%m-%dT%H").to_string()
}

/// SHA-256 hex digest of the given bytes.
fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Degraded pseudo-digest: a 32-bit multiply-by-31 accumulator over the
/// input, run eight times with the accumulator carried forward, each
/// round contributing 8 hex chars toward the 64-char output.
fn rolling_hex_digest(input: &str) -> String {
    let mut acc: u32 = 0;
    let mut out = String::with_capacity(64);
    for _ in 0..8 {
        for b in input.bytes() {
            acc = acc.wrapping_mul(31).wrapping_add(u32::from(b));
        }
        out.push_str(&format!("{acc:08x}"));
    }
    out
}

/// Reformat the first 32 hex chars of a digest into UUID layout,
/// forcing the version nibble to `5` and the variant nibble into
/// `8`/`9`/`a`/`b` per RFC 4122.
fn format_uuid_v5_shape(digest: &str) -> String {
    // Both digest backends emit 64 lowercase hex chars.
    let h = &digest[..32];
    let variant_src = u32::from_str_radix(&h[16..17], 16).unwrap_or(0);
    let variant = char::from_digit(8 + (variant_src % 4), 16).unwrap_or('8');
    format!(
        "{}-{}-5{}-{}{}-{}",
        &h[..8],
        &h[8..12],
        &h[13..16],
        variant,
        &h[17..20],
        &h[20..32]
    )
}
