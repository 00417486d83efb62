//! Pluggable randomness sources.
//!
//! The generator only needs "fill this buffer". Real runs use the OS RNG,
//! idempotent server requests use a seeded RNG, and tests plug in closures.

use rand::rngs::{OsRng, StdRng};
use rand::{SeedableRng, TryRngCore};

use crate::error::RandomError;

/// A fallible source of random bytes.
pub trait RandomSource {
    /// Fill `buf` entirely with random data.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot produce data.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), RandomError>;
}

impl<F> RandomSource for F
where
    F: FnMut(&mut [u8]) -> Result<(), RandomError>,
{
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), RandomError> {
        self(buf)
    }
}

/// Adapter exposing any [`TryRngCore`] as a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: TryRngCore> RngSource<R> {
    /// Wrap an RNG.
    pub const fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSource<OsRng> {
    /// Operating-system entropy; used for fresh, non-repeatable batches.
    #[must_use]
    pub const fn os() -> Self {
        Self(OsRng)
    }
}

impl RngSource<StdRng> {
    /// Deterministic source: the same seed always yields the same bytes.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: TryRngCore> RandomSource for RngSource<R> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), RandomError> {
        self.0
            .try_fill_bytes(buf)
            .map_err(|e| RandomError::new(e.to_string()))
    }
}
