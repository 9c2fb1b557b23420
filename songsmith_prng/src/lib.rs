// Seedable random stream for song generation.
//
// xoshiro256++ (Blackman & Vigna, 2019) expanded from a single `u64` seed
// with SplitMix64. Every random decision in `songsmith_music` (progression
// choice, melody durations, variation rolls, tempo resolution) draws from a
// `SongRng` that the caller passes in explicitly, so a fixed seed reproduces
// a song note for note.
//
// A generator whose draw count varies (the melody) takes a `fork()` of the
// caller's stream. A fork consumes exactly one value from the parent, so
// adding draws inside the child never shifts what the parent yields next.
//
// The core generator uses integer arithmetic only. Floats appear solely in
// the derived helpers (`next_f64`, `chance`) and are computed from the same
// integer output on every platform.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// xoshiro256++ stream. Cheap to clone; a clone replays the same sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRng {
    s: [u64; 4],
}

impl SongRng {
    /// Create a stream from a `u64` seed. Equal seeds give equal streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Create a stream seeded from the system clock, for runs where the
    /// user did not ask for a specific seed. Returns the seed alongside the
    /// stream so it can be reported and replayed.
    pub fn from_clock() -> (Self, u64) {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed_5eed);
        (Self::new(seed), seed)
    }

    /// Derive an independent child stream, consuming one value from `self`.
    pub fn fork(&mut self) -> SongRng {
        SongRng::new(self.next_u64())
    }

    /// Next raw `u64`.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Uniform `f64` in [0, 1), built from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[low, high)`, without modulo bias.
    ///
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % span);
            }
        }
    }

    /// Uniform `usize` in `[low, high)`.
    ///
    /// Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Uniform `i32` in `[low, high]`, both ends included.
    ///
    /// Panics if `low > high`.
    pub fn range_i32_inclusive(&mut self, low: i32, high: i32) -> i32 {
        assert!(low <= high, "range_i32_inclusive: low must be <= high");
        let span = (high as i64 - low as i64 + 1) as u64;
        (low as i64 + self.range_u64(0, span) as i64) as i32
    }

    /// `true` with probability `p`. `p <= 0.0` never fires, `p >= 1.0`
    /// always does.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick one element uniformly. `None` only for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.range_usize(0, items.len());
        items.get(i)
    }
}

/// SplitMix64 step, used to expand the seed into xoshiro's 256-bit state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SongRng::new(42);
        let mut b = SongRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SongRng::new(42);
        let mut b = SongRng::new(43);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn f64_in_unit_range() {
        let mut rng = SongRng::new(12345);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "f64 out of range: {v}");
        }
    }

    #[test]
    fn range_u64_within_bounds() {
        let mut rng = SongRng::new(999);
        for _ in 0..10_000 {
            let v = rng.range_u64(10, 20);
            assert!((10..20).contains(&v), "range_u64 out of range: {v}");
        }
    }

    #[test]
    fn range_i32_inclusive_hits_both_ends() {
        let mut rng = SongRng::new(7);
        let mut seen = [false; 5];
        for _ in 0..10_000 {
            let v = rng.range_i32_inclusive(-2, 2);
            assert!((-2..=2).contains(&v), "range_i32_inclusive out of range: {v}");
            seen[(v + 2) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "every value in [-2, 2] should appear");
    }

    #[test]
    fn range_i32_inclusive_single_value() {
        let mut rng = SongRng::new(3);
        for _ in 0..100 {
            assert_eq!(rng.range_i32_inclusive(85, 85), 85);
        }
    }

    #[test]
    fn chance_extremes() {
        let mut rng = SongRng::new(42);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn chance_distribution() {
        let mut rng = SongRng::new(42);
        let n = 10_000;
        let hits = (0..n).filter(|_| rng.chance(0.3)).count();
        let pct = hits as f64 / n as f64;
        assert!((0.25..0.35).contains(&pct), "chance(0.3) gave {:.1}%", pct * 100.0);
    }

    #[test]
    fn choose_covers_all_items() {
        let mut rng = SongRng::new(11);
        let items = ["a", "b", "c", "d"];
        let mut seen = [false; 4];
        for _ in 0..1000 {
            let pick = rng.choose(&items).unwrap();
            let i = items.iter().position(|x| x == pick).unwrap();
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SongRng::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn forks_are_reproducible_and_independent() {
        let mut parent_a = SongRng::new(5);
        let mut parent_b = SongRng::new(5);
        let mut child_a = parent_a.fork();
        let mut child_b = parent_b.fork();
        assert_eq!(child_a.next_u64(), child_b.next_u64());

        // Draining one child does not disturb the parent or a sibling.
        let mut sibling = parent_a.fork();
        let expected = parent_b.fork().next_u64();
        for _ in 0..50 {
            child_a.next_u64();
        }
        assert_eq!(sibling.next_u64(), expected);
    }

    #[test]
    fn serialization_roundtrip_resumes_stream() {
        let mut rng = SongRng::new(42);
        for _ in 0..100 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: SongRng = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
