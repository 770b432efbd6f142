//! The core crate for Brain Odyssey. Defines the records, identifiers and
//! payload shapes used throughout the workspace.
//!
//! Records are plain keyed values; relationships (study -> activation ->
//! location, term -> term cluster -> cluster) are joined explicitly by the
//! store rather than traversed as an object graph.

pub mod common_macros;
pub mod coordinate;
mod error;
pub mod payloads;
pub mod records;

pub use coordinate::{Coordinate, CoordinateKey, Cube};
pub use error::OdysseyDataError;
pub use payloads::{Citation, ClusterNode, ClusterTree, IntensityMap, TermLeaf};
pub use records::{
    Activation, Cluster, ClusterId, Location, LocationId, Pmid, Study, StudyTerm, Term,
    TermCluster,
};

/// Number of vertices of the seeded brain-surface mesh.
pub const MESH_VERTEX_COUNT: usize = 81_925;
