//! Dual vertices
use super::TaggedSets;
use crate::{Vert3d, geometry::cell_dual_center, mesh::PrimalMesh};
use log::debug;
use rustc_hash::FxHashMap;

/// Primal entity a dual vertex was created from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DualVertexKind {
    /// Element (circumcenter, clamped in the element)
    Cell(usize),
    /// Tagged face (centroid)
    Face(usize),
    /// Model edge (midpoint)
    Edge(usize),
    /// Model vertex (copy)
    Node(usize),
}

/// Creation of the dual vertices
///
/// The vertices are numbered by blocks: the elements (the dual vertex of element
/// `i` is `i`), the external faces then the internal faces, the model edges and the
/// model vertices, every block following the tag order.
pub struct DualVertexFactory {
    verts: Vec<Vert3d>,
    kinds: Vec<DualVertexKind>,
    face_ids: FxHashMap<usize, usize>,
    edge_ids: FxHashMap<usize, usize>,
    node_ids: FxHashMap<usize, usize>,
}

impl DualVertexFactory {
    pub fn new<M: PrimalMesh>(msh: &M, tags: &TaggedSets) -> Self {
        let n_faces = tags.external_faces().len() + tags.internal_faces().len();
        let n = msh.n_elems() + n_faces + tags.model_edges().len() + tags.model_vertices().len();

        let mut res = Self {
            verts: Vec::with_capacity(n),
            kinds: Vec::with_capacity(n),
            face_ids: FxHashMap::default(),
            edge_ids: FxHashMap::default(),
            node_ids: FxHashMap::default(),
        };

        for i_elem in 0..msh.n_elems() {
            res.push(cell_dual_center(&msh.gelem(i_elem)), DualVertexKind::Cell(i_elem));
        }

        for &i_face in tags.external_faces().iter().chain(tags.internal_faces()) {
            let i = res.push(msh.face_center(i_face), DualVertexKind::Face(i_face));
            res.face_ids.insert(i_face, i);
        }

        for &i_edge in tags.model_edges() {
            let [i0, i1] = msh.edge(i_edge);
            let i = res.push(
                0.5 * (msh.vert(i0) + msh.vert(i1)),
                DualVertexKind::Edge(i_edge),
            );
            res.edge_ids.insert(i_edge, i);
        }

        for &i_node in tags.model_vertices() {
            let i = res.push(msh.vert(i_node), DualVertexKind::Node(i_node));
            res.node_ids.insert(i_node, i);
        }

        assert_eq!(res.verts.len(), n);
        debug!(
            "Dual vertices: {} cells, {n_faces} faces, {} edges, {} vertices",
            msh.n_elems(),
            res.edge_ids.len(),
            res.node_ids.len()
        );

        res
    }

    fn push(&mut self, v: Vert3d, kind: DualVertexKind) -> usize {
        self.verts.push(v);
        self.kinds.push(kind);
        self.verts.len() - 1
    }

    /// Position of dual vertex `i`
    pub fn vert(&self, i: usize) -> Vert3d {
        self.verts[i]
    }

    /// Dual vertex of element `i`
    pub const fn cell(i: usize) -> usize {
        i
    }

    /// Dual vertex of face `i`, if it is tagged
    pub fn face(&self, i: usize) -> Option<usize> {
        self.face_ids.get(&i).copied()
    }

    /// Dual vertex of edge `i`, if it is a model edge
    pub fn edge(&self, i: usize) -> Option<usize> {
        self.edge_ids.get(&i).copied()
    }

    /// Dual vertex of node `i`, if it is a model vertex
    pub fn node(&self, i: usize) -> Option<usize> {
        self.node_ids.get(&i).copied()
    }

    /// Positions and kinds of the dual vertices
    pub fn into_parts(self) -> (Vec<Vert3d>, Vec<DualVertexKind>) {
        (self.verts, self.kinds)
    }
}
