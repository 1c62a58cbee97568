//! Tag names describing the geometric model and the primal elements they select
use crate::{Error, Result, mesh::PrimalMesh};
use log::{debug, warn};
use rustc_hash::FxHashSet;

/// Names of the tags that describe the geometric model
#[derive(Debug, Clone, Default)]
pub struct ModelTags {
    /// Face tags of the external boundary (at least one)
    pub external_faces: Vec<String>,
    /// Face tags of the internal interfaces (may be empty)
    pub internal_faces: Vec<String>,
    /// Edge tags of the model edges (at least one)
    pub edges: Vec<String>,
    /// Node tags of the model vertices (at least one)
    pub vertices: Vec<String>,
}

impl ModelTags {
    /// Create the tag lists from tag names
    #[must_use]
    pub fn new(
        external_faces: &[&str],
        internal_faces: &[&str],
        edges: &[&str],
        vertices: &[&str],
    ) -> Self {
        let to_vec = |x: &[&str]| x.iter().map(|&s| s.to_string()).collect::<Vec<_>>();
        Self {
            external_faces: to_vec(external_faces),
            internal_faces: to_vec(internal_faces),
            edges: to_vec(edges),
            vertices: to_vec(vertices),
        }
    }

    /// Check that the mandatory tag families are not empty
    pub fn check(&self) -> Result<()> {
        if self.external_faces.is_empty() {
            return Err(Error::from("No external face tag"));
        }
        if self.edges.is_empty() {
            return Err(Error::from("No model edge tag"));
        }
        if self.vertices.is_empty() {
            return Err(Error::from("No model vertex tag"));
        }
        Ok(())
    }
}

/// Gather the elements of several tags, keeping the first occurrence of every element
fn resolve<'a>(names: &[String], kind: &str, lookup: impl Fn(&str) -> &'a [usize]) -> Vec<usize> {
    let mut seen = FxHashSet::default();
    let mut res = Vec::new();
    for name in names {
        let ids = lookup(name);
        if ids.is_empty() {
            warn!("{kind} tag \"{name}\" is empty");
        }
        res.extend(ids.iter().copied().filter(|&i| seen.insert(i)));
    }
    res
}

/// Classification of a primal node, the first matching kind wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Model vertex
    Vertex,
    /// Node of a model edge
    Edge,
    /// Node of a tagged face
    Face,
    /// Node away from the tagged faces
    Interior,
}

/// Primal elements classified by the model tags
///
/// Every `is_*` array has the length of the corresponding primal entity count.
/// Model vertices lie on the external boundary and model edges on tagged faces.
#[derive(Debug, Clone)]
pub struct TaggedSets {
    external_faces: Vec<usize>,
    internal_faces: Vec<usize>,
    model_edges: Vec<usize>,
    model_vertices: Vec<usize>,
    is_external_face: Vec<bool>,
    is_internal_face: Vec<bool>,
    is_model_edge: Vec<bool>,
    external_cells: FxHashSet<usize>,
    interface_cells: FxHashSet<usize>,
    node_kinds: Vec<NodeKind>,
}

impl TaggedSets {
    /// Classify the elements of `msh`
    ///
    /// External faces must be boundary faces and every boundary face must be
    /// external; internal faces must be shared by two elements
    pub fn new<M: PrimalMesh>(msh: &M, tags: &ModelTags) -> Result<Self> {
        tags.check()?;

        let external_faces = resolve(&tags.external_faces, "External face", |s| msh.face_tag(s));
        let internal_faces = resolve(&tags.internal_faces, "Internal face", |s| msh.face_tag(s));
        let model_edges = resolve(&tags.edges, "Edge", |s| msh.edge_tag(s));
        let model_vertices = resolve(&tags.vertices, "Vertex", |s| msh.node_tag(s));

        let mut is_external_face = vec![false; msh.n_faces()];
        let mut external_cells = FxHashSet::default();
        for &i in &external_faces {
            let [e0, e1] = msh.face_elems(i);
            if e1 != usize::MAX {
                return Err(Error::from(&format!(
                    "External face {i} is shared by elements {e0} and {e1}"
                )));
            }
            is_external_face[i] = true;
            external_cells.insert(e0);
        }

        let mut is_internal_face = vec![false; msh.n_faces()];
        let mut interface_cells = FxHashSet::default();
        for &i in &internal_faces {
            if is_external_face[i] {
                return Err(Error::from(&format!("Face {i} is both external and internal")));
            }
            let [e0, e1] = msh.face_elems(i);
            if e1 == usize::MAX {
                return Err(Error::from(&format!("Internal face {i} is a boundary face")));
            }
            is_internal_face[i] = true;
            interface_cells.insert(e0);
            interface_cells.insert(e1);
        }

        if let Some(i) =
            (0..msh.n_faces()).find(|&i| msh.face_elems(i)[1] == usize::MAX && !is_external_face[i])
        {
            return Err(Error::from(&format!(
                "Boundary face {i} has no external tag"
            )));
        }

        let mut is_model_edge = vec![false; msh.n_edges()];
        model_edges.iter().for_each(|&i| is_model_edge[i] = true);

        let mut node_kinds = vec![NodeKind::Interior; msh.n_verts()];
        let mut on_tagged_face = vec![false; msh.n_edges()];
        for &i in external_faces.iter().chain(internal_faces.iter()) {
            msh.face(i).iter().for_each(|&j| node_kinds[j] = NodeKind::Face);
            msh.face_edges(i).iter().for_each(|&j| on_tagged_face[j] = true);
        }
        for &i in &model_edges {
            if !on_tagged_face[i] {
                return Err(Error::from(&format!(
                    "Model edge {i} ({:?}) is not on a tagged face",
                    msh.edge(i)
                )));
            }
            msh.edge(i).iter().for_each(|&j| node_kinds[j] = NodeKind::Edge);
        }

        let mut on_external_face = vec![false; msh.n_verts()];
        external_faces
            .iter()
            .flat_map(|&i| msh.face(i))
            .for_each(|i| on_external_face[i] = true);
        for &i in &model_vertices {
            if !on_external_face[i] {
                return Err(Error::from(&format!(
                    "Model vertex {i} is not on the external boundary"
                )));
            }
            node_kinds[i] = NodeKind::Vertex;
        }

        debug!(
            "Model tags: {} external faces, {} internal faces, {} edges, {} vertices",
            external_faces.len(),
            internal_faces.len(),
            model_edges.len(),
            model_vertices.len()
        );

        let res = Self {
            external_faces,
            internal_faces,
            model_edges,
            model_vertices,
            is_external_face,
            is_internal_face,
            is_model_edge,
            external_cells,
            interface_cells,
            node_kinds,
        };
        debug!(
            "Nodes: {} model vertices, {} on model edges, {} on tagged faces, {} interior",
            res.n_nodes(NodeKind::Vertex),
            res.n_nodes(NodeKind::Edge),
            res.n_nodes(NodeKind::Face),
            res.n_nodes(NodeKind::Interior)
        );

        Ok(res)
    }

    /// External faces, in tag order
    #[must_use]
    pub fn external_faces(&self) -> &[usize] {
        &self.external_faces
    }

    /// Internal faces, in tag order
    #[must_use]
    pub fn internal_faces(&self) -> &[usize] {
        &self.internal_faces
    }

    /// Model edges, in tag order
    #[must_use]
    pub fn model_edges(&self) -> &[usize] {
        &self.model_edges
    }

    /// Model vertices, in tag order
    #[must_use]
    pub fn model_vertices(&self) -> &[usize] {
        &self.model_vertices
    }

    #[must_use]
    pub fn is_external_face(&self, i: usize) -> bool {
        self.is_external_face[i]
    }

    #[must_use]
    pub fn is_internal_face(&self, i: usize) -> bool {
        self.is_internal_face[i]
    }

    #[must_use]
    pub fn is_model_edge(&self, i: usize) -> bool {
        self.is_model_edge[i]
    }

    #[must_use]
    pub fn is_model_vertex(&self, i: usize) -> bool {
        self.node_kinds[i] == NodeKind::Vertex
    }

    /// Check if element `i` has an external face
    #[must_use]
    pub fn is_external_cell(&self, i: usize) -> bool {
        self.external_cells.contains(&i)
    }

    /// Check if element `i` has an internal face
    #[must_use]
    pub fn is_interface_cell(&self, i: usize) -> bool {
        self.interface_cells.contains(&i)
    }

    #[must_use]
    pub fn node_kind(&self, i: usize) -> NodeKind {
        self.node_kinds[i]
    }

    /// Number of nodes of a given kind
    #[must_use]
    pub fn n_nodes(&self, kind: NodeKind) -> usize {
        self.node_kinds.iter().filter(|&&k| k == kind).count()
    }
}
