//! Deterministic RNG wrapper and seeded deferred samplers.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::value::{Deferred, Value};

/// Deterministic RNG handle used by deferred attribute generators.
///
/// A thin wrapper around `StdRng`; every generator in netm is seeded by the
/// caller so repeated runs produce identical attribute payloads.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns a mutable reference to the underlying RNG for advanced usage.
    pub fn inner_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Deferred generator drawing a uniform `f64` from `[low, high)` on every evaluation.
///
/// The bounds are read from the first two arguments and default to `[0, 1)`.
/// Each evaluation advances the shared stream, so one application of an
/// attribute set draws exactly one value.
pub fn uniform_sampler(seed: u64, low: f64, high: f64) -> Deferred {
    let rng = Arc::new(Mutex::new(RngHandle::from_seed(seed)));
    Deferred::new(
        move |args: &[Value]| {
            let low = args.first().and_then(Value::as_f64).unwrap_or(0.0);
            let high = args.get(1).and_then(Value::as_f64).unwrap_or(1.0);
            let mut guard = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let draw = if high > low {
                guard.inner_mut().gen_range(low..high)
            } else {
                low
            };
            Value::from(draw)
        },
        vec![Value::from(low), Value::from(high)],
    )
}
