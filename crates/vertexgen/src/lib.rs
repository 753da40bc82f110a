//! Area-weighted surface vertices for HPGe detector geometries.
//!
//! Detectors are solids of revolution described by a labelled `(r, z)` profile.
//! Points are drawn on their surfaces in proportion to area, across segments
//! of one detector (`sample_surface`) and across several detectors
//! (`sample_many`), then handed to writers through the `VertexSource` trait.

pub mod chunks;
pub mod error;
pub mod geometry;
pub mod polycone;
pub mod sampler;
pub mod source;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::SamplingError;
pub use nalgebra::Vector3 as Vec3;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::chunks::{chunk_sizes, Chunk, ChunkPlan};
    pub use crate::error::SamplingError;
    pub use crate::geometry::{
        line_segments, Profile, SurfaceFilter, SurfaceGeometry, SurfaceLabel,
    };
    pub use crate::polycone::PolyconeDetector;
    pub use crate::sampler::{
        eligible_area, sample_many, sample_surface, DepthDistribution, DetectorVertices,
    };
    pub use crate::source::{MultiSurfaceSource, SurfaceSource, VertexSource};
    pub use nalgebra::Vector3 as Vec3;
}
