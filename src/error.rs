use std::fmt;

/// Malformed input detected while building line geometry.
///
/// Every variant aborts the build; there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// A resource references a node index that does not exist
    MissingNode { resource: usize, node: usize },
    /// An operation references a resource index that does not exist
    MissingResource { train: usize, operation: usize, resource: usize },
    /// A resource carries a type tag outside the known kinds
    UnknownResourceType { resource: usize, tag: String },
    /// Bucketing by type was requested but a resource has no `restype`
    MissingResourceType { resource: usize },
    /// The vertex buffer would reach the restart sentinel of the index width
    IndexOverflow { vertices: usize, capacity: usize },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::MissingNode { resource, node } => {
                write!(f, "resource {resource} references missing node {node}")
            }
            GeometryError::MissingResource { train, operation, resource } => write!(
                f,
                "train {train} operation {operation} references missing resource {resource}"
            ),
            GeometryError::UnknownResourceType { resource, tag } => {
                write!(f, "resource {resource} has unknown type \"{tag}\"")
            }
            GeometryError::MissingResourceType { resource } => {
                write!(f, "resource {resource} has no restype")
            }
            GeometryError::IndexOverflow { vertices, capacity } => write!(
                f,
                "vertex {vertices} exceeds index capacity of {capacity} vertices"
            ),
        }
    }
}

impl std::error::Error for GeometryError {}
