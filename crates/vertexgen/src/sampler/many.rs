use super::surface::{checked_areas, sample_surface};
use super::rng_from_seed;
use crate::error::SamplingError;
use crate::geometry::{SurfaceFilter, SurfaceGeometry};
use nalgebra::Vector3;
use rand::distributions::{Distribution, WeightedIndex};

/// Points drawn across several detectors, aligned row-for-row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectorVertices {
    pub positions: Vec<Vector3<f64>>,
    /// Position of the producing detector in the input list.
    pub detector_ids: Vec<usize>,
}

impl DetectorVertices {
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Eligible surface area of one detector; zero when the filter selects nothing.
pub fn eligible_area<G: SurfaceGeometry + ?Sized>(
    detector: &G,
    filter: SurfaceFilter,
) -> Result<f64, SamplingError> {
    let indices = filter.resolve(detector.surfaces());
    if indices.is_empty() {
        return Ok(0.0);
    }
    Ok(checked_areas(detector, &indices)?.iter().sum())
}

/// Seed of the detector-assignment stream. Must not equal the per-detector seed,
/// or slot `j`'s detector and that detector's `j`-th segment share one uniform.
fn assignment_seed(seed: u64) -> u64 {
    fn mix(mut x: u64) -> u64 {
        x ^= x >> 30;
        x = x.wrapping_mul(0xbf58476d1ce4e5b9);
        x ^= x >> 27;
        x = x.wrapping_mul(0x94d049bb133111eb);
        x ^ (x >> 31)
    }
    mix(seed.wrapping_add(0x9e3779b97f4a7c15))
}

/// Draw `n_total` points over `detectors`, weighting each by its eligible area.
///
/// Slots are assigned to detectors by one categorical draw from a stream seeded
/// with `assignment_seed(seed)`. Within a detector, its `j`-th assigned slot (in
/// ascending slot order) receives the `j`-th point of that detector's
/// `sample_surface` output. Every per-detector call gets the caller's `seed`
/// unchanged; detectors assigned no slot are not sampled at all.
pub fn sample_many<G: SurfaceGeometry>(
    n_total: usize,
    detectors: &[G],
    filter: SurfaceFilter,
    seed: Option<u64>,
) -> Result<DetectorVertices, SamplingError> {
    if detectors.is_empty() {
        return Err(SamplingError::invalid("detector list is empty"));
    }

    let weights = detectors
        .iter()
        .map(|det| eligible_area(det, filter))
        .collect::<Result<Vec<f64>, _>>()?;
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(SamplingError::domain(format!(
            "no detector has eligible `{filter}` surface area"
        )));
    }
    tracing::debug!(?weights, total_area = total, "per-detector surface area");

    if n_total == 0 {
        return Ok(DetectorVertices::default());
    }

    let by_area = WeightedIndex::new(&weights)
        .map_err(|e| SamplingError::domain(format!("detector weights rejected: {e}")))?;
    let mut rng = rng_from_seed(seed.map(assignment_seed));
    let assigned: Vec<usize> = (0..n_total).map(|_| by_area.sample(&mut rng)).collect();

    let mut slots: Vec<Vec<usize>> = vec![Vec::new(); detectors.len()];
    for (slot, &det) in assigned.iter().enumerate() {
        slots[det].push(slot);
    }

    let mut positions = vec![Vector3::zeros(); n_total];
    for (idx, (det, det_slots)) in detectors.iter().zip(&slots).enumerate() {
        if det_slots.is_empty() {
            continue;
        }
        tracing::debug!(detector = idx, count = det_slots.len(), "detector share");
        let points = sample_surface(det_slots.len(), det, filter, None, seed)?;
        for (&slot, point) in det_slots.iter().zip(points) {
            positions[slot] = point;
        }
    }

    Ok(DetectorVertices {
        positions,
        detector_ids: assigned,
    })
}

