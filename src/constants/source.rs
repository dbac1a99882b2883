//! Randomness and cancellation primitives for the simulation loops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rand_pcg::Pcg64;

/// Source of independent standard-normal draws.
///
/// Implemented for every [`rand::Rng`], so any generator can drive the
/// estimators directly.
pub trait NormalSource {
    /// Draws one value from N(0, 1).
    fn standard_normal(&mut self) -> f64;

    /// Overwrites `buf` with independent N(0, 1) draws.
    fn fill_standard_normal(&mut self, buf: &mut [f64]) {
        for x in buf {
            *x = self.standard_normal();
        }
    }
}

impl<R: Rng + ?Sized> NormalSource for R {
    fn standard_normal(&mut self) -> f64 {
        Distribution::<f64>::sample(&StandardNormal, self)
    }
}

/// Creates the generator used by the engine.
///
/// A fixed seed gives reproducible runs; `None` seeds from the thread-local
/// generator.
pub fn seeded_rng(seed: Option<u64>) -> Pcg64 {
    match seed {
        Some(s) => Pcg64::seed_from_u64(s),
        None => Pcg64::from_rng(&mut rand::rng()),
    }
}

/// Cooperative cancellation flag, checked between trials and replicates.
///
/// Clones share the flag.
///
/// ```
/// use u_spc::constants::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
