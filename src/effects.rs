// ---------------------------------------------------------------------------
// effects.rs — clock + random source behind traits so stubs stay testable
// ---------------------------------------------------------------------------

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use mockable::{Clock, DefaultClock};
use rand::Rng;

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Randomness used by the weather stub and session identifiers.
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `low..=high`.
    fn int_in_range(&self, low: i64, high: i64) -> i64;

    /// `len` lowercase base36 characters.
    fn token(&self, len: usize) -> String;
}

pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn int_in_range(&self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        rand::thread_rng().gen_range(low..=high)
    }

    fn token(&self, len: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..len)
            .map(|_| char::from(TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())]))
            .collect()
    }
}

/// Clock frozen at a single instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Deterministic random source: always yields `value` (clamped into the
/// requested range) and the same `token`, truncated or padded with `0`.
pub struct FixedRandom {
    pub value: i64,
    pub token: String,
}

impl RandomSource for FixedRandom {
    fn int_in_range(&self, low: i64, high: i64) -> i64 {
        self.value.clamp(low, high.max(low))
    }

    fn token(&self, len: usize) -> String {
        let mut out: String = self.token.chars().take(len).collect();
        while out.chars().count() < len {
            out.push('0');
        }
        out
    }
}

/// Effect handles injected into the registry and handlers.
#[derive(Clone)]
pub struct Effects {
    pub clock: Arc<dyn Clock + Send + Sync>,
    pub random: Arc<dyn RandomSource>,
}

impl Effects {
    pub fn system() -> Self {
        Self {
            clock: Arc::new(DefaultClock),
            random: Arc::new(SystemRandom),
        }
    }

    pub fn fixed(now: DateTime<Utc>, value: i64, token: &str) -> Self {
        Self {
            clock: Arc::new(FixedClock(now)),
            random: Arc::new(FixedRandom {
                value,
                token: token.to_string(),
            }),
        }
    }
}

impl Default for Effects {
    fn default() -> Self {
        Self::system()
    }
}
