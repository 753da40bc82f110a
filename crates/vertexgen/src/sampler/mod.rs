//! Area-weighted surface sampling.
//!
//! Purpose
//! - `sample_surface`: points on one detector, segments drawn with probability
//!   proportional to their area, then a uniform position along the segment and
//!   a uniform azimuth.
//! - `sample_many`: split a total count across detectors in proportion to each
//!   detector's eligible area, then defer to `sample_surface` per detector.
//!
//! Reproducibility
//! - Every call owns a fresh `StdRng`, seeded from `seed` when given and from
//!   OS entropy otherwise. Same seed and inputs give bit-identical output.
//! - `sample_many` passes the same `seed` to every per-detector call. Two
//!   detectors therefore consume identically seeded streams; this is kept so
//!   outputs stay comparable with earlier seeded runs.
//! - The detector-assignment stream of `sample_many` is seeded with a
//!   SplitMix64 finalizer applied to `seed + 0x9e3779b97f4a7c15` (wrapping),
//!   never with `seed` itself. Otherwise slot `j`'s detector choice and that
//!   detector's `j`-th segment choice would read the same uniform.

mod many;
mod surface;

pub use many::{eligible_area, sample_many, DetectorVertices};
pub use surface::{sample_surface, DepthDistribution};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Fresh random stream for one sampling call.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}
