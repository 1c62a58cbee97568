//! Dual of tagged tetrahedral meshes
mod cells;
mod closure;
mod dual_mesh;
mod faces;
mod incidence;
mod tags;
mod vertices;

use faces::DualFaceBuilder;
use vertices::DualVertexFactory;

pub use dual_mesh::{DualMesh, DualOptions, DualStats};
pub use faces::{DualFace, DualFaceKind, FaceOrdering, order_boundary_path};
pub use incidence::{EdgeIncidenceIndex, EdgeKind};
pub use tags::{ModelTags, NodeKind, TaggedSets};
pub use vertices::DualVertexKind;
