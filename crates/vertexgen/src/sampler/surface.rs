use super::rng_from_seed;
use crate::error::SamplingError;
use crate::geometry::{SurfaceFilter, SurfaceGeometry};
use nalgebra::Vector3;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};
use std::f64::consts::TAU;

/// Offset distribution below a surface (depth profile).
///
/// Accepted by `sample_surface` so callers can express the request, but no
/// sampler implements depth offsets yet: passing one fails with
/// `SamplingError::UnsupportedFeature`.
pub trait DepthDistribution {
    /// Depth below the surface in profile length units.
    fn sample_depth(&self, rng: &mut dyn RngCore) -> f64;
}

/// Draw `n` points on the selected surface of one detector.
///
/// Draw order per call: `n` segment indices, then `n` fractions along the
/// segments, then `n` azimuths. With `n == 0` inputs are still validated but
/// the random stream is never created.
pub fn sample_surface<G: SurfaceGeometry + ?Sized>(
    n: usize,
    detector: &G,
    filter: SurfaceFilter,
    depth: Option<&dyn DepthDistribution>,
    seed: Option<u64>,
) -> Result<Vec<Vector3<f64>>, SamplingError> {
    if depth.is_some() {
        return Err(SamplingError::unsupported(
            "depth profile sampling below the surface",
        ));
    }

    let surfaces = detector.surfaces();
    let indices = filter.resolve(surfaces);
    if indices.is_empty() {
        return Err(SamplingError::domain(format!(
            "no segment matches surface filter `{filter}`"
        )));
    }
    let areas = checked_areas(detector, &indices)?;
    let total: f64 = areas.iter().sum();
    if total <= 0.0 {
        return Err(SamplingError::domain(format!(
            "segments selected by `{filter}` have zero total area"
        )));
    }

    let (s1, s2) = detector.line_segments()?;
    if s1.len() != surfaces.len() || s2.len() != surfaces.len() {
        return Err(SamplingError::invalid(format!(
            "geometry has {} surface labels but {} line segments",
            surfaces.len(),
            s1.len().min(s2.len())
        )));
    }

    tracing::debug!(
        n,
        segments = indices.len(),
        total_area = total,
        %filter,
        "sampling detector surface"
    );
    if n == 0 {
        return Ok(Vec::new());
    }

    let by_area = WeightedIndex::new(&areas)
        .map_err(|e| SamplingError::domain(format!("area weights rejected: {e}")))?;
    let mut rng = rng_from_seed(seed);
    let sides: Vec<usize> = (0..n).map(|_| indices[by_area.sample(&mut rng)]).collect();
    let fracs: Vec<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();
    let phis: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..TAU)).collect();

    let points = sides
        .iter()
        .zip(fracs.iter().zip(&phis))
        .map(|(&side, (&t, &phi))| {
            let rz = s1[side] + (s2[side] - s1[side]) * t;
            Vector3::new(rz.x * phi.cos(), rz.x * phi.sin(), rz.y)
        })
        .collect();
    Ok(points)
}

/// Areas for `indices`, checked for shape, finiteness and sign.
pub(super) fn checked_areas<G: SurfaceGeometry + ?Sized>(
    detector: &G,
    indices: &[usize],
) -> Result<Vec<f64>, SamplingError> {
    let areas = detector.surface_area(indices)?;
    if areas.len() != indices.len() {
        return Err(SamplingError::invalid(format!(
            "geometry returned {} areas for {} segments",
            areas.len(),
            indices.len()
        )));
    }
    if let Some(bad) = areas.iter().find(|a| !a.is_finite() || **a < 0.0) {
        return Err(SamplingError::domain(format!(
            "segment area must be finite and non-negative, got {bad}"
        )));
    }
    Ok(areas)
}
