#![warn(missing_docs)]
//! Error structures of the sequential model
use std::{error::Error, fmt::Display};

/// Result type used throughout this crate
pub type SeqResult<T> = std::result::Result<T, SeqError>;

/// Reason why a ray could not be propagated through a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// no real refracted ray exists (total internal reflection)
    TotalInternalReflection,
    /// the ray does not intersect the surface profile
    MissedSurface,
}

impl Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TotalInternalReflection => write!(f, "total internal reflection"),
            Self::MissedSurface => write!(f, "no intersection with surface"),
        }
    }
}

/// Errors that can be returned by the functions of this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum SeqError {
    /// invalid modification of the surface / gap sequence (e.g. removing the object or image surface)
    StructuralViolation(String),
    /// a ray could not be traced beyond the given surface
    RayBlocked {
        /// index of the surface where the ray was blocked
        surface: usize,
        /// the cause of the blocking
        reason: BlockReason,
    },
    /// a requested medium / glass could not be resolved
    MissingMediumData(String),
    /// a geometric query that cannot be answered (e.g. transformations relative to a non-existent surface)
    InvalidGeometryRequest(String),
    /// errors while reading or writing a lens document
    Document(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for SeqError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StructuralViolation(m) => {
                write!(f, "StructuralViolation:{m}")
            }
            Self::RayBlocked { surface, reason } => {
                write!(f, "RayBlocked:{reason} at surface {surface}")
            }
            Self::MissingMediumData(m) => {
                write!(f, "MissingMediumData:{m}")
            }
            Self::InvalidGeometryRequest(m) => {
                write!(f, "InvalidGeometryRequest:{m}")
            }
            Self::Document(m) => {
                write!(f, "Document:{m}")
            }
            Self::Other(m) => write!(f, "SeqOptics Error:Other:{m}"),
        }
    }
}
impl Error for SeqError {}

impl std::convert::From<String> for SeqError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn from() {
        let error = SeqError::from("test".to_string());
        assert_eq!(error, SeqError::Other("test".to_string()));
    }
    #[test]
    fn display() {
        assert_eq!(
            format!("{}", SeqError::StructuralViolation("test".to_string())),
            "StructuralViolation:test"
        );
        assert_eq!(
            format!(
                "{}",
                SeqError::RayBlocked {
                    surface: 3,
                    reason: BlockReason::TotalInternalReflection
                }
            ),
            "RayBlocked:total internal reflection at surface 3"
        );
        assert_eq!(
            format!(
                "{}",
                SeqError::RayBlocked {
                    surface: 1,
                    reason: BlockReason::MissedSurface
                }
            ),
            "RayBlocked:no intersection with surface at surface 1"
        );
        assert_eq!(
            format!("{}", SeqError::MissingMediumData("test".to_string())),
            "MissingMediumData:test"
        );
        assert_eq!(
            format!("{}", SeqError::InvalidGeometryRequest("test".to_string())),
            "InvalidGeometryRequest:test"
        );
        assert_eq!(
            format!("{}", SeqError::Document("test".to_string())),
            "Document:test"
        );
        assert_eq!(
            format!("{}", SeqError::Other("test".to_string())),
            "SeqOptics Error:Other:test"
        );
    }
    #[test]
    fn debug() {
        assert_eq!(
            format!("{:?}", SeqError::StructuralViolation("test".to_string())),
            "StructuralViolation(\"test\")"
        );
    }
}
