//! Vertex sources: "produce `count` points for a seed", decoupled from output chunking.
//!
//! Writers call `generate` once per chunk with an incrementing seed, so a
//! source must be pure in `(count, seed)` when a seed is given.

use crate::error::SamplingError;
use crate::geometry::{SurfaceFilter, SurfaceGeometry};
use crate::sampler::{sample_many, sample_surface};
use nalgebra::Vector3;

pub trait VertexSource {
    fn generate(&self, count: usize, seed: Option<u64>)
        -> Result<Vec<Vector3<f64>>, SamplingError>;
}

impl<F> VertexSource for F
where
    F: Fn(usize, Option<u64>) -> Result<Vec<Vector3<f64>>, SamplingError>,
{
    fn generate(
        &self,
        count: usize,
        seed: Option<u64>,
    ) -> Result<Vec<Vector3<f64>>, SamplingError> {
        self(count, seed)
    }
}

/// Surface of a single detector.
#[derive(Clone, Debug)]
pub struct SurfaceSource<G> {
    pub detector: G,
    pub filter: SurfaceFilter,
}

impl<G: SurfaceGeometry> SurfaceSource<G> {
    pub fn new(detector: G, filter: SurfaceFilter) -> Self {
        Self { detector, filter }
    }
}

impl<G: SurfaceGeometry> VertexSource for SurfaceSource<G> {
    fn generate(
        &self,
        count: usize,
        seed: Option<u64>,
    ) -> Result<Vec<Vector3<f64>>, SamplingError> {
        sample_surface(count, &self.detector, self.filter, None, seed)
    }
}

/// Surfaces of several detectors, weighted by eligible area. Detector ids are dropped.
#[derive(Clone, Debug)]
pub struct MultiSurfaceSource<G> {
    pub detectors: Vec<G>,
    pub filter: SurfaceFilter,
}

impl<G: SurfaceGeometry> MultiSurfaceSource<G> {
    pub fn new(detectors: Vec<G>, filter: SurfaceFilter) -> Self {
        Self { detectors, filter }
    }
}

impl<G: SurfaceGeometry> VertexSource for MultiSurfaceSource<G> {
    fn generate(
        &self,
        count: usize,
        seed: Option<u64>,
    ) -> Result<Vec<Vector3<f64>>, SamplingError> {
        Ok(sample_many(count, &self.detectors, self.filter, seed)?.positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SurfaceLabel;
    use crate::polycone::PolyconeDetector;

    #[test]
    fn sources_match_direct_calls() {
        let det = PolyconeDetector::cylinder("cyl", 2.0, 1.0).unwrap();
        let filter = SurfaceFilter::Label(SurfaceLabel::NPlus);
        let single = SurfaceSource::new(det.clone(), filter);
        assert_eq!(
            single.generate(50, Some(8)).unwrap(),
            sample_surface(50, &det, filter, None, Some(8)).unwrap()
        );

        let dets = vec![det, PolyconeDetector::cylinder("wide", 5.0, 1.0).unwrap()];
        let multi = MultiSurfaceSource::new(dets.clone(), filter);
        assert_eq!(
            multi.generate(80, Some(8)).unwrap(),
            sample_many(80, &dets, filter, Some(8)).unwrap().positions
        );
    }

    #[test]
    fn closures_are_sources() {
        let fixed = |count: usize, _seed: Option<u64>| {
            Ok::<_, SamplingError>(vec![Vector3::new(1.0, 2.0, 3.0); count])
        };
        let src: &dyn VertexSource = &fixed;
        assert_eq!(src.generate(3, None).unwrap().len(), 3);
    }
}
