//! Geometry capability interface consumed by the samplers.
//!
//! Purpose
//! - Describe a detector as a solid of revolution: a 2D `(r, z)` profile, its
//!   decomposition into straight segments, one surface label per segment and
//!   the area each segment sweeps when revolved about the z axis.
//! - Any backend implementing `SurfaceGeometry` can be sampled: the bundled
//!   `PolyconeDetector`, test doubles, or an adapter over a full geometry library.
//!
//! Conventions
//! - Segment `i` joins profile points `i` and `i + 1`. A closed profile repeats
//!   its first point at the end.
//! - `surfaces()`, `surface_area()` and `line_segments()` share one segment order.

use crate::error::SamplingError;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categorical tag on a profile segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceLabel {
    /// n-type (lithium-drifted) contact.
    NPlus,
    /// p-type (boron-implanted) contact.
    PPlus,
    /// Passivated, inactive surface.
    Passive,
}

impl SurfaceLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceLabel::NPlus => "nplus",
            SurfaceLabel::PPlus => "pplus",
            SurfaceLabel::Passive => "passive",
        }
    }
}

impl fmt::Display for SurfaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which segments take part in a draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SurfaceFilter {
    /// Every segment, untagged ones included.
    #[default]
    All,
    /// Only segments carrying exactly this label.
    Label(SurfaceLabel),
}

impl SurfaceFilter {
    #[inline]
    pub fn matches(&self, label: Option<SurfaceLabel>) -> bool {
        match self {
            SurfaceFilter::All => true,
            SurfaceFilter::Label(want) => label == Some(*want),
        }
    }

    /// Ascending indices of the segments selected by this filter.
    pub fn resolve(&self, surfaces: &[Option<SurfaceLabel>]) -> Vec<usize> {
        surfaces
            .iter()
            .enumerate()
            .filter(|(_, label)| self.matches(**label))
            .map(|(i, _)| i)
            .collect()
    }
}

impl fmt::Display for SurfaceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceFilter::All => f.write_str("all"),
            SurfaceFilter::Label(label) => fmt::Display::fmt(label, f),
        }
    }
}

impl FromStr for SurfaceFilter {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SurfaceFilter::All),
            "nplus" => Ok(SurfaceFilter::Label(SurfaceLabel::NPlus)),
            "pplus" => Ok(SurfaceFilter::Label(SurfaceLabel::PPlus)),
            "passive" => Ok(SurfaceFilter::Label(SurfaceLabel::Passive)),
            other => Err(SamplingError::invalid(format!(
                "unknown surface type `{other}` (expected all, nplus, pplus or passive)"
            ))),
        }
    }
}

/// Revolution profile as parallel radius / height sequences.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub r: Vec<f64>,
    pub z: Vec<f64>,
}

impl Profile {
    pub fn new(r: Vec<f64>, z: Vec<f64>) -> Self {
        Self { r, z }
    }

    /// Number of points (not segments).
    #[inline]
    pub fn len(&self) -> usize {
        self.r.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }
}

/// Start and end points of every profile segment, aligned index-for-index.
pub type SegmentEnds = (Vec<Vector2<f64>>, Vec<Vector2<f64>>);

/// Split a profile into consecutive line segments (`x = r`, `y = z`).
pub fn line_segments(profile: &Profile) -> Result<SegmentEnds, SamplingError> {
    if profile.r.len() != profile.z.len() {
        return Err(SamplingError::invalid(format!(
            "profile has {} radii but {} heights",
            profile.r.len(),
            profile.z.len()
        )));
    }
    if profile.len() < 2 {
        return Err(SamplingError::invalid(
            "profile needs at least two points to form a segment",
        ));
    }
    let points: Vec<Vector2<f64>> = profile
        .r
        .iter()
        .zip(&profile.z)
        .map(|(&r, &z)| Vector2::new(r, z))
        .collect();
    let s1 = points[..points.len() - 1].to_vec();
    let s2 = points[1..].to_vec();
    Ok((s1, s2))
}

/// Capability interface of a detector geometry.
pub trait SurfaceGeometry {
    /// One label per segment.
    fn surfaces(&self) -> &[Option<SurfaceLabel>];

    /// Areas of the segments at `indices`, in the same order.
    fn surface_area(&self, indices: &[usize]) -> Result<Vec<f64>, SamplingError>;

    fn profile(&self) -> Profile;

    /// Segment endpoints, aligned with `surfaces()`.
    fn line_segments(&self) -> Result<SegmentEnds, SamplingError> {
        line_segments(&self.profile())
    }
}

impl<T: SurfaceGeometry + ?Sized> SurfaceGeometry for &T {
    fn surfaces(&self) -> &[Option<SurfaceLabel>] {
        (**self).surfaces()
    }
    fn surface_area(&self, indices: &[usize]) -> Result<Vec<f64>, SamplingError> {
        (**self).surface_area(indices)
    }
    fn profile(&self) -> Profile {
        (**self).profile()
    }
    fn line_segments(&self) -> Result<SegmentEnds, SamplingError> {
        (**self).line_segments()
    }
}

impl<T: SurfaceGeometry + ?Sized> SurfaceGeometry for Box<T> {
    fn surfaces(&self) -> &[Option<SurfaceLabel>] {
        (**self).surfaces()
    }
    fn surface_area(&self, indices: &[usize]) -> Result<Vec<f64>, SamplingError> {
        (**self).surface_area(indices)
    }
    fn profile(&self) -> Profile {
        (**self).profile()
    }
    fn line_segments(&self) -> Result<SegmentEnds, SamplingError> {
        (**self).line_segments()
    }
}
