//! DevEUI batch generator.
//!
//! Draws DevEUIs from a [`RandomSource`] and guarantees that no two entries
//! in a batch share a short form.

use std::collections::HashSet;

use crate::domain::{Batch, DEV_EUI_LEN, DevEui, MAX_BATCH};
use crate::error::GenerateError;
use crate::service::random::RandomSource;

/// Generates short-form-unique DevEUI batches.
pub struct Generator<R> {
    source: R,
}

impl<R: RandomSource> Generator<R> {
    /// Create a generator over a random source.
    pub const fn new(source: R) -> Self {
        Self { source }
    }

    /// Generate `count` DevEUIs with pairwise-distinct short forms.
    ///
    /// A slot whose short form collides with an earlier slot is redrawn in
    /// place. Redraws are unbounded: a source that keeps producing colliding
    /// bytes never returns.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::BatchTooLarge`] when `count` exceeds
    /// [`MAX_BATCH`], and the source's error on the first failed read. No
    /// partial batch is returned.
    pub fn generate(&mut self, count: usize) -> Result<Batch, GenerateError> {
        if count > MAX_BATCH {
            return Err(GenerateError::BatchTooLarge(count));
        }

        let mut batch = Vec::with_capacity(count);
        let mut shorts = HashSet::with_capacity(count);

        while batch.len() < count {
            let mut bytes = [0u8; DEV_EUI_LEN];
            self.source.fill(&mut bytes)?;

            let eui = DevEui::from_bytes(bytes);
            if !shorts.insert(eui.short_form()) {
                tracing::trace!(%eui, slot = batch.len(), "Short form collision, redrawing");
                continue;
            }

            batch.push(eui);
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::error::RandomError;
    use crate::service::random::RngSource;

    /// Random source replaying scripted 8-byte draws.
    fn scripted(draws: Vec<[u8; 8]>) -> impl FnMut(&mut [u8]) -> Result<(), RandomError> {
        let mut draws: VecDeque<[u8; 8]> = draws.into();
        move |buf: &mut [u8]| {
            let next = draws
                .pop_front()
                .ok_or_else(|| RandomError::new("script exhausted"))?;
            buf.copy_from_slice(&next);
            Ok(())
        }
    }

    #[test]
    fn test_generate_exact_count_unique_short_forms() {
        for count in [1, 5, 100, 1000] {
            let mut generator = Generator::new(RngSource::seeded(7));
            let batch = generator.generate(count).unwrap();
            assert_eq!(batch.len(), count);

            let shorts: HashSet<_> = batch.iter().map(DevEui::short_form).collect();
            assert_eq!(shorts.len(), count);
        }
    }

    #[test]
    fn test_generate_zero_reads_nothing() {
        let mut generator = Generator::new(|_: &mut [u8]| -> Result<(), RandomError> {
            panic!("random source must not be read for an empty batch")
        });
        assert!(generator.generate(0).unwrap().is_empty());
    }

    #[test]
    fn test_generate_is_deterministic_for_seed() {
        let first = Generator::new(RngSource::seeded(0xDEAD_BEEF))
            .generate(5)
            .unwrap();
        let second = Generator::new(RngSource::seeded(0xDEAD_BEEF))
            .generate(5)
            .unwrap();
        assert_eq!(first, second);

        // A smaller batch from the same seed is a prefix of the larger one
        let one = Generator::new(RngSource::seeded(0xDEAD_BEEF))
            .generate(1)
            .unwrap();
        assert_eq!(one[..], first[..1]);
    }

    #[test]
    fn test_generate_redraws_colliding_slot() {
        let a = [0x11, 0, 0, 0, 0, 0x0A, 0xBC, 0xDE];
        let collides = [0x22, 0, 0, 0, 0, 0xFA, 0xBC, 0xDE];
        let b = [0x33, 0, 0, 0, 0, 0x00, 0x00, 0x01];

        let mut generator = Generator::new(scripted(vec![a, collides, b]));
        let batch = generator.generate(2).unwrap();

        assert_eq!(batch, vec![DevEui::from_bytes(a), DevEui::from_bytes(b)]);
    }

    #[test]
    fn test_generate_fails_without_partial_batch() {
        let a = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut generator = Generator::new(scripted(vec![a]));

        let result = generator.generate(3);
        assert_eq!(
            result,
            Err(GenerateError::Source(RandomError::new("script exhausted")))
        );
    }

    #[test]
    fn test_generate_always_failing_source() {
        let mut generator = Generator::new(|_: &mut [u8]| -> Result<(), RandomError> {
            Err(RandomError::new("oops"))
        });
        assert!(generator.generate(1).is_err());
    }

    #[test]
    fn test_generate_rejects_batch_beyond_short_form_space() {
        let mut generator = Generator::new(|_: &mut [u8]| -> Result<(), RandomError> {
            panic!("oversized batch must be rejected before reading")
        });

        assert_eq!(
            generator.generate(MAX_BATCH + 1),
            Err(GenerateError::BatchTooLarge(MAX_BATCH + 1))
        );
        assert!(matches!(
            generator.generate(usize::MAX),
            Err(GenerateError::BatchTooLarge(_))
        ));
    }
}
