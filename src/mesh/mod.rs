//! Tetrahedral (primal) meshes, represented by
//!   - the vertices
//!   - the edges, faces and elements with their incidence relations
//!   - named tags on nodes, edges and faces
//!
//! The dual construction only uses the `PrimalMesh` trait
mod tet_mesh;
pub mod test_meshes;

use crate::Vert3d;
pub use tet_mesh::TetMesh;

/// Local faces of a tetrahedron, the `i`th face being opposite to the `i`th vertex
pub const TETRA2FACES: [[usize; 3]; 4] = [[1, 2, 3], [2, 0, 3], [0, 1, 3], [0, 2, 1]];
/// Local edges of a tetrahedron
pub const TETRA2EDGES: [[usize; 2]; 6] = [[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]];

/// Read-only view of a tetrahedral mesh and of its tags
///
/// Faces store the two elements they belong to; the second one is `usize::MAX`
/// for boundary faces.
pub trait PrimalMesh {
    /// Number of vertices
    fn n_verts(&self) -> usize;

    /// Get the `i`th vertex
    fn vert(&self, i: usize) -> Vert3d;

    /// Number of edges
    fn n_edges(&self) -> usize;

    /// Get the vertices of the `i`th edge
    fn edge(&self, i: usize) -> [usize; 2];

    /// Number of faces
    fn n_faces(&self) -> usize;

    /// Get the vertices of the `i`th face
    fn face(&self, i: usize) -> [usize; 3];

    /// Get the edges of the `i`th face
    fn face_edges(&self, i: usize) -> [usize; 3];

    /// Get the elements on both sides of the `i`th face
    fn face_elems(&self, i: usize) -> [usize; 2];

    /// Get the centroid of the `i`th face
    fn face_center(&self, i: usize) -> Vert3d {
        let f = self.face(i);
        (self.vert(f[0]) + self.vert(f[1]) + self.vert(f[2])) / 3.0
    }

    /// Number of elements
    fn n_elems(&self) -> usize;

    /// Get the faces of the `i`th element
    fn elem_faces(&self, i: usize) -> [usize; 4];

    /// Get the vertices of the `i`th element
    fn elem(&self, i: usize) -> [usize; 4] {
        let mut res = [usize::MAX; 4];
        let mut n = 0;
        for i_face in self.elem_faces(i) {
            for j in self.face(i_face) {
                if !res[..n].contains(&j) {
                    assert!(n < 4, "element {i} has more than 4 vertices");
                    res[n] = j;
                    n += 1;
                }
            }
        }
        res
    }

    /// Get the vertex coordinates of the `i`th element
    fn gelem(&self, i: usize) -> [Vert3d; 4] {
        self.elem(i).map(|j| self.vert(j))
    }

    /// Get the centroid of the `i`th element
    fn elem_center(&self, i: usize) -> Vert3d {
        self.gelem(i).iter().fold(Vert3d::zeros(), |acc, v| acc + v) / 4.0
    }

    /// Get the face shared by elements `i` and `j`, if any
    fn face_between(&self, i: usize, j: usize) -> Option<usize> {
        self.elem_faces(i).into_iter().find(|&i_face| {
            let [e0, e1] = self.face_elems(i_face);
            (e0 == i && e1 == j) || (e0 == j && e1 == i)
        })
    }

    /// Nodes tagged with `name` (empty if the tag does not exist)
    fn node_tag(&self, name: &str) -> &[usize];

    /// Edges tagged with `name` (empty if the tag does not exist)
    fn edge_tag(&self, name: &str) -> &[usize];

    /// Faces tagged with `name` (empty if the tag does not exist)
    fn face_tag(&self, name: &str) -> &[usize];
}
