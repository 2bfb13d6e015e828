// Randomness source for seat draws
use solana_program::hash::hashv;

/// Produces integers uniformly in `[0, upper)`.
///
/// Callers never pass `upper == 0`.
pub trait RandomnessSource {
    fn next_in_range(&mut self, upper: u64) -> u64;
}

/// Deterministic source expanding a 32-byte seed with successive hashes.
///
/// Suitable when the seed comes from an entropy the operator cannot steer
/// (a block hash, an oracle result). Not verifiable.
#[derive(Clone, Debug)]
pub struct SeededRandomness {
    seed: [u8; 32],
    counter: u64,
}

impl SeededRandomness {
    pub fn new(seed: [u8; 32]) -> Self {
        Self { seed, counter: 0 }
    }

    fn next_u64(&mut self) -> u64 {
        let digest = hashv(&[&self.seed[..], &self.counter.to_le_bytes()[..]]);
        self.counter = self.counter.wrapping_add(1);
        fold_le(digest.as_ref())
    }
}

impl RandomnessSource for SeededRandomness {
    fn next_in_range(&mut self, upper: u64) -> u64 {
        index_in_range(self.next_u64(), upper)
    }
}

/// Little-endian value of the first 8 bytes of `bytes`, zero padded
fn fold_le(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let len = std::cmp::min(bytes.len(), 8);
    buf[..len].copy_from_slice(&bytes[..len]);
    u64::from_le_bytes(buf)
}

/// Maps a random value onto `[0, upper)`
pub fn index_in_range(random_value: u64, upper: u64) -> u64 {
    if upper == 0 {
        return 0;
    }
    random_value % upper
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_range() {
        let mut rng = SeededRandomness::new([7u8; 32]);
        for upper in 1..50 {
            assert!(rng.next_in_range(upper) < upper);
        }
        assert_eq!(rng.next_in_range(1), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRandomness::new([3u8; 32]);
        let mut b = SeededRandomness::new([3u8; 32]);
        let xs: Vec<u64> = (0..8).map(|_| a.next_in_range(1_000)).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.next_in_range(1_000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn reaches_every_index() {
        let mut rng = SeededRandomness::new([42u8; 32]);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[rng.next_in_range(4) as usize] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
    }

    #[test]
    fn folds_short_input() {
        assert_eq!(fold_le(&[1, 1]), 257);
        assert_eq!(index_in_range(10, 0), 0);
        assert_eq!(index_in_range(10, 3), 1);
    }
}
