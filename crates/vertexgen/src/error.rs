//! Error type shared by the samplers, the geometry backends and chunk planning.

use thiserror::Error;

/// Typed failures surfaced at the call boundary. None of them is transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplingError {
    /// A requested feature exists in the API but has no implementation.
    #[error("unsupported feature: {feature}")]
    UnsupportedFeature { feature: String },
    /// The surface selection cannot carry an area-weighted draw.
    #[error("domain error: {reason}")]
    DomainError { reason: String },
    /// Malformed input: shapes, counts, indices or labels.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

impl SamplingError {
    pub(crate) fn unsupported(feature: impl Into<String>) -> Self {
        Self::UnsupportedFeature {
            feature: feature.into(),
        }
    }

    pub(crate) fn domain(reason: impl Into<String>) -> Self {
        Self::DomainError {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}
