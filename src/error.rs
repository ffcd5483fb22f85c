//! Error types for element formulation

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of an element, used to attribute errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Main error type for formulation operations
#[derive(Error, Debug)]
pub enum FEAError {
    /// Helper, load, release or section combination that is not implemented
    #[error("Unsupported formulation: {0}")]
    UnsupportedFormulation(String),

    #[error("Iso coordinate {value} outside [{min}, {max}]")]
    DomainError { value: f64, min: f64, max: f64 },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionError {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Math error: {0}")]
    MathError(String),

    #[error("Element {id}: {source}")]
    Element {
        id: ElementId,
        #[source]
        source: Box<FEAError>,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl FEAError {
    /// Shorthand for an `UnsupportedFormulation` error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormulation(msg.into())
    }

    /// Shorthand for a `DegenerateGeometry` error
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateGeometry(msg.into())
    }

    /// Attach an element id. Errors that already carry one are left alone.
    pub fn in_element(self, id: ElementId) -> Self {
        match self {
            e @ FEAError::Element { .. } => e,
            other => FEAError::Element {
                id,
                source: Box::new(other),
            },
        }
    }

    /// Element the error is attributed to, if any
    pub fn element_id(&self) -> Option<ElementId> {
        match self {
            FEAError::Element { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// The error with any element attribution stripped
    pub fn root(&self) -> &FEAError {
        match self {
            FEAError::Element { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self.root(), FEAError::UnsupportedFormulation(_))
    }
}

/// Result type for formulation operations
pub type FEAResult<T> = Result<T, FEAError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_element_wraps_once() {
        let err = FEAError::unsupported("DKQ with 3 nodes")
            .in_element(ElementId(7))
            .in_element(ElementId(9));

        assert_eq!(err.element_id(), Some(ElementId(7)));
        assert!(err.is_unsupported());
        assert_eq!(
            err.to_string(),
            "Element #7: Unsupported formulation: DKQ with 3 nodes"
        );
    }

    #[test]
    fn test_root_of_plain_error() {
        let err = FEAError::DomainError {
            value: 1.5,
            min: -1.0,
            max: 1.0,
        };
        assert!(err.element_id().is_none());
        assert!(matches!(err.root(), FEAError::DomainError { .. }));
    }
}
