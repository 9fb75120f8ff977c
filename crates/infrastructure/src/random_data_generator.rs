use tourguard_application::DataGenerator;
use tracing::warn;

/// Data generator backed by the operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDataGenerator;

impl RandomDataGenerator {
    fn fill<const N: usize>() -> [u8; N] {
        let mut bytes = [0u8; N];
        // A zero-filled buffer still yields well-formed, if predictable, demo values.
        if let Err(error) = getrandom::fill(&mut bytes) {
            warn!(error = %error, "os rng unavailable, using zeroed bytes");
        }
        bytes
    }

    fn next_u64() -> u64 {
        u64::from_le_bytes(Self::fill::<8>())
    }
}

impl DataGenerator for RandomDataGenerator {
    fn transaction_hash(&self) -> String {
        format!("0x{}", hex::encode(Self::fill::<20>()))
    }

    fn count_between(&self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }

        let span = u64::from(max - min) + 1;
        let offset = Self::next_u64() % span;
        min + u32::try_from(offset).unwrap_or(0)
    }

    fn risk_score(&self) -> f64 {
        f64::from(self.count_between(0, 100)) / 10.0
    }

    fn pick_index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }

        let len = u64::try_from(len).unwrap_or(u64::MAX);
        usize::try_from(Self::next_u64() % len).unwrap_or(0)
    }
}
