//! Edge to element / face and node to external face connectivities
use super::TaggedSets;
use crate::{Error, Result, graph::CSRGraph, mesh::PrimalMesh};
use log::debug;

/// Classification of the primal edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Not on any tagged face
    Interior,
    /// On a tagged external face
    ExternalBoundary,
    /// On a tagged internal face
    Interface,
}

/// Connectivities that are not stored in the primal mesh
///   - the elements and faces around every edge
///   - the external faces around every node
///   - the kind of every edge
pub struct EdgeIncidenceIndex {
    edge_to_cells: CSRGraph,
    edge_to_faces: CSRGraph,
    node_to_external_faces: CSRGraph,
    kinds: Vec<EdgeKind>,
}

impl EdgeIncidenceIndex {
    /// Build the connectivities with one loop over the elements and one over the faces
    pub fn new<M: PrimalMesh>(msh: &M, tags: &TaggedSets) -> Result<Self> {
        let mut cell_edges = Vec::with_capacity(msh.n_elems());
        for i_elem in 0..msh.n_elems() {
            let mut edges = [usize::MAX; 6];
            let mut n = 0;
            for i_face in msh.elem_faces(i_elem) {
                for i_edge in msh.face_edges(i_face) {
                    if !edges[..n].contains(&i_edge) {
                        if n == 6 {
                            return Err(Error::from(&format!(
                                "Element {i_elem} has more than 6 edges"
                            )));
                        }
                        edges[n] = i_edge;
                        n += 1;
                    }
                }
            }
            cell_edges.push(edges);
        }
        let edge_to_cells = CSRGraph::transpose(cell_edges.iter().copied(), Some(msh.n_edges()));

        let edge_to_faces = CSRGraph::transpose(
            (0..msh.n_faces()).map(|i| msh.face_edges(i)),
            Some(msh.n_edges()),
        );

        let node_to_external_faces = CSRGraph::transpose(
            (0..msh.n_faces()).map(|i| {
                if tags.is_external_face(i) {
                    msh.face(i)
                } else {
                    [usize::MAX; 3]
                }
            }),
            Some(msh.n_verts()),
        );

        let mut kinds = Vec::with_capacity(msh.n_edges());
        for (i_edge, faces) in edge_to_faces.rows().enumerate() {
            let external = faces.iter().any(|&i| tags.is_external_face(i));
            let internal = faces.iter().any(|&i| tags.is_internal_face(i));
            let kind = match (external, internal) {
                (false, false) => EdgeKind::Interior,
                (true, false) => EdgeKind::ExternalBoundary,
                (false, true) => EdgeKind::Interface,
                (true, true) => {
                    return Err(Error::from(&format!(
                        "Edge {i_edge} ({:?}) is both on external and internal faces",
                        msh.edge(i_edge)
                    )));
                }
            };
            kinds.push(kind);
        }

        debug!(
            "Edges: {} interior, {} on the external boundary, {} on interfaces",
            kinds.iter().filter(|&&k| k == EdgeKind::Interior).count(),
            kinds
                .iter()
                .filter(|&&k| k == EdgeKind::ExternalBoundary)
                .count(),
            kinds.iter().filter(|&&k| k == EdgeKind::Interface).count(),
        );

        Ok(Self {
            edge_to_cells,
            edge_to_faces,
            node_to_external_faces,
            kinds,
        })
    }

    /// Number of edges
    #[must_use]
    pub fn n_edges(&self) -> usize {
        self.kinds.len()
    }

    /// Elements containing edge `i` (sorted)
    #[must_use]
    pub fn edge_cells(&self, i: usize) -> &[usize] {
        self.edge_to_cells.row(i)
    }

    /// Faces containing edge `i` (sorted)
    #[must_use]
    pub fn edge_faces(&self, i: usize) -> &[usize] {
        self.edge_to_faces.row(i)
    }

    /// External faces containing node `i` (sorted), internal faces are not indexed
    #[must_use]
    pub fn node_external_faces(&self, i: usize) -> &[usize] {
        self.node_to_external_faces.row(i)
    }

    /// Kind of edge `i`
    #[must_use]
    pub fn kind(&self, i: usize) -> EdgeKind {
        self.kinds[i]
    }
}
