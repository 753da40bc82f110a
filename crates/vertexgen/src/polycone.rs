//! Polycone detector: a labelled `(r, z)` polyline revolved about the z axis.
//!
//! Each segment sweeps the lateral surface of a frustum (a disk or annulus when
//! horizontal, a cylinder mantle when vertical, nothing when it lies on the
//! axis). Areas are in the squared unit of the profile coordinates.

use crate::error::SamplingError;
use crate::geometry::{Profile, SurfaceFilter, SurfaceGeometry, SurfaceLabel};
use nalgebra::{Vector2, Vector3};
use std::f64::consts::PI;

#[derive(Clone, Debug, PartialEq)]
pub struct PolyconeDetector {
    name: String,
    profile: Profile,
    surfaces: Vec<Option<SurfaceLabel>>,
    areas: Vec<f64>,
}

impl PolyconeDetector {
    /// Build from profile coordinates and one label per segment.
    pub fn new(
        name: impl Into<String>,
        r: Vec<f64>,
        z: Vec<f64>,
        surfaces: Vec<Option<SurfaceLabel>>,
    ) -> Result<Self, SamplingError> {
        let name = name.into();
        if r.len() != z.len() {
            return Err(SamplingError::invalid(format!(
                "detector `{name}`: {} radii but {} heights",
                r.len(),
                z.len()
            )));
        }
        if r.len() < 2 {
            return Err(SamplingError::invalid(format!(
                "detector `{name}`: profile needs at least two points"
            )));
        }
        if r.iter().chain(&z).any(|v| !v.is_finite()) {
            return Err(SamplingError::invalid(format!(
                "detector `{name}`: profile coordinates must be finite"
            )));
        }
        if r.iter().any(|&v| v < 0.0) {
            return Err(SamplingError::invalid(format!(
                "detector `{name}`: radii must be >= 0"
            )));
        }
        if surfaces.len() != r.len() - 1 {
            return Err(SamplingError::invalid(format!(
                "detector `{name}`: {} surface labels for {} segments",
                surfaces.len(),
                r.len() - 1
            )));
        }
        let areas = r
            .windows(2)
            .zip(z.windows(2))
            .map(|(rw, zw)| frustum_area(rw[0], zw[0], rw[1], zw[1]))
            .collect();
        Ok(Self {
            name,
            profile: Profile::new(r, z),
            surfaces,
            areas,
        })
    }

    /// Closed right cylinder: p+ bottom face, n+ mantle and top, unlabelled axis.
    pub fn cylinder(
        name: impl Into<String>,
        radius: f64,
        height: f64,
    ) -> Result<Self, SamplingError> {
        Self::new(
            name,
            vec![0.0, radius, radius, 0.0, 0.0],
            vec![0.0, 0.0, height, height, 0.0],
            vec![
                Some(SurfaceLabel::PPlus),
                Some(SurfaceLabel::NPlus),
                Some(SurfaceLabel::NPlus),
                None,
            ],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total area of every segment.
    pub fn total_area(&self) -> f64 {
        self.areas.iter().sum()
    }

    /// Distance from `point` to the revolved profile.
    pub fn distance_to_surface(&self, point: Vector3<f64>) -> f64 {
        self.distance_to_selected_surface(point, SurfaceFilter::All)
            .unwrap_or(f64::INFINITY)
    }

    /// Distance from `point` to the segments selected by `filter`; `None` if none are.
    pub fn distance_to_selected_surface(
        &self,
        point: Vector3<f64>,
        filter: SurfaceFilter,
    ) -> Option<f64> {
        let q = Vector2::new(point.x.hypot(point.y), point.z);
        let p = &self.profile;
        (0..self.surfaces.len())
            .filter(|&i| filter.matches(self.surfaces[i]))
            .map(|i| {
                let a = Vector2::new(p.r[i], p.z[i]);
                let b = Vector2::new(p.r[i + 1], p.z[i + 1]);
                point_segment_distance(q, a, b)
            })
            .reduce(f64::min)
    }
}

impl SurfaceGeometry for PolyconeDetector {
    fn surfaces(&self) -> &[Option<SurfaceLabel>] {
        &self.surfaces
    }

    fn surface_area(&self, indices: &[usize]) -> Result<Vec<f64>, SamplingError> {
        indices
            .iter()
            .map(|&i| {
                self.areas.get(i).copied().ok_or_else(|| {
                    SamplingError::invalid(format!(
                        "detector `{}`: segment index {i} out of range ({} segments)",
                        self.name,
                        self.areas.len()
                    ))
                })
            })
            .collect()
    }

    fn profile(&self) -> Profile {
        self.profile.clone()
    }
}

/// Lateral area swept by revolving the segment `(r1,z1)–(r2,z2)` about the z axis.
#[inline]
fn frustum_area(r1: f64, z1: f64, r2: f64, z2: f64) -> f64 {
    PI * (r1 + r2) * (r2 - r1).hypot(z2 - z1)
}

fn point_segment_distance(q: Vector2<f64>, a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return (q - a).norm();
    }
    let t = ((q - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (q - (a + ab * t)).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cylinder_areas_match_closed_forms() {
        let det = PolyconeDetector::cylinder("cyl", 2.0, 3.0).unwrap();
        let areas = det.surface_area(&[0, 1, 2, 3]).unwrap();
        assert!((areas[0] - PI * 4.0).abs() < 1e-12); // bottom disk
        assert!((areas[1] - 2.0 * PI * 2.0 * 3.0).abs() < 1e-12); // mantle
        assert!((areas[2] - PI * 4.0).abs() < 1e-12); // top disk
        assert_eq!(areas[3], 0.0); // axis
        assert!((det.total_area() - (8.0 * PI + 12.0 * PI)).abs() < 1e-12);
    }

    #[test]
    fn cone_area_uses_slant_length() {
        let det =
            PolyconeDetector::new("cone", vec![0.0, 3.0], vec![4.0, 0.0], vec![None]).unwrap();
        let area = det.surface_area(&[0]).unwrap()[0];
        assert!((area - PI * 3.0 * 5.0).abs() < 1e-12);
    }

    #[test]
    fn construction_validates_shapes() {
        let bad_labels = PolyconeDetector::new("x", vec![0.0, 1.0], vec![0.0, 0.0], vec![]);
        assert!(matches!(bad_labels, Err(SamplingError::InvalidArgument { .. })));
        let negative = PolyconeDetector::new("x", vec![-1.0, 1.0], vec![0.0, 0.0], vec![None]);
        assert!(matches!(negative, Err(SamplingError::InvalidArgument { .. })));
        let nan = PolyconeDetector::new("x", vec![0.0, f64::NAN], vec![0.0, 0.0], vec![None]);
        assert!(matches!(nan, Err(SamplingError::InvalidArgument { .. })));
    }

    #[test]
    fn out_of_range_area_index_is_rejected() {
        let det = PolyconeDetector::cylinder("cyl", 1.0, 1.0).unwrap();
        assert!(matches!(
            det.surface_area(&[4]),
            Err(SamplingError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn distances_in_the_revolution_plane() {
        let det = PolyconeDetector::cylinder("cyl", 2.0, 3.0).unwrap();
        // On the mantle at any azimuth.
        let on_mantle = Vector3::new(0.0, -2.0, 1.5);
        assert!(det.distance_to_surface(on_mantle) < 1e-12);
        // The axis segment closes the profile, so points on the axis sit on it.
        let centre = Vector3::new(0.0, 0.0, 1.5);
        assert!(det.distance_to_surface(centre) < 1e-12);
        let d_contact = det
            .distance_to_selected_surface(centre, SurfaceFilter::Label(SurfaceLabel::PPlus))
            .unwrap();
        assert!((d_contact - 1.5).abs() < 1e-12);
        assert!(det
            .distance_to_selected_surface(centre, SurfaceFilter::Label(SurfaceLabel::Passive))
            .is_none());
    }
}
