//! Tetrahedron meshes with explicit edges and faces
use super::{PrimalMesh, TETRA2EDGES, TETRA2FACES};
use crate::{Error, Result, Vert3d, geometry::tet_vol};
use log::debug;
use rustc_hash::FxHashMap;

/// Tetrahedron mesh in 3d
///
/// Edges and faces are numbered in the order they are first met when looping
/// over the elements, and their vertices are sorted.
#[derive(Debug, Default, Clone)]
pub struct TetMesh {
    verts: Vec<Vert3d>,
    elems: Vec<[usize; 4]>,
    elem_to_faces: Vec<[usize; 4]>,
    edges: Vec<[usize; 2]>,
    edge_ids: FxHashMap<[usize; 2], usize>,
    faces: Vec<[usize; 3]>,
    face_ids: FxHashMap<[usize; 3], usize>,
    face_to_edges: Vec<[usize; 3]>,
    face_to_elems: Vec<[usize; 2]>,
    node_tags: FxHashMap<String, Vec<usize>>,
    edge_tags: FxHashMap<String, Vec<usize>>,
    face_tags: FxHashMap<String, Vec<usize>>,
}

fn sorted<const N: usize>(mut x: [usize; N]) -> [usize; N] {
    x.sort_unstable();
    x
}

impl TetMesh {
    /// Create a new mesh from coordinates and connectivities
    ///   - negative elements are reoriented
    ///   - flat elements and faces shared by more than 2 elements are rejected
    pub fn new(verts: Vec<Vert3d>, elems: Vec<[usize; 4]>) -> Result<Self> {
        let n_verts = verts.len();
        let mut res = Self {
            verts,
            elems,
            ..Self::default()
        };

        let mut n_reoriented = 0;
        for (i_elem, e) in res.elems.iter_mut().enumerate() {
            if e.iter().any(|&i| i >= n_verts) {
                return Err(Error::from(&format!("Invalid vertex index in element {i_elem}")));
            }
            let vol = tet_vol(&e.map(|i| res.verts[i]));
            if vol.abs() < f64::EPSILON {
                return Err(Error::from(&format!("Element {i_elem} is flat")));
            }
            if vol < 0.0 {
                e.swap(0, 1);
                n_reoriented += 1;
            }
        }
        if n_reoriented > 0 {
            debug!("{n_reoriented} elems reoriented");
        }

        res.elem_to_faces = Vec::with_capacity(res.elems.len());
        for (i_elem, e) in res.elems.iter().enumerate() {
            for edg in TETRA2EDGES {
                let edg = sorted([e[edg[0]], e[edg[1]]]);
                if !res.edge_ids.contains_key(&edg) {
                    res.edge_ids.insert(edg, res.edges.len());
                    res.edges.push(edg);
                }
            }

            let mut elem_faces = [usize::MAX; 4];
            for (i, f) in TETRA2FACES.iter().enumerate() {
                let face = sorted([e[f[0]], e[f[1]], e[f[2]]]);
                let i_face = if let Some(&i_face) = res.face_ids.get(&face) {
                    let elems = &mut res.face_to_elems[i_face];
                    if elems[1] != usize::MAX {
                        return Err(Error::from(&format!(
                            "Face {face:?} belongs to elements {}, {} and {i_elem}",
                            elems[0], elems[1]
                        )));
                    }
                    elems[1] = i_elem;
                    i_face
                } else {
                    let i_face = res.faces.len();
                    res.face_ids.insert(face, i_face);
                    res.faces.push(face);
                    res.face_to_elems.push([i_elem, usize::MAX]);
                    i_face
                };
                elem_faces[i] = i_face;
            }
            res.elem_to_faces.push(elem_faces);
        }

        res.face_to_edges = res
            .faces
            .iter()
            .map(|f| [[f[0], f[1]], [f[1], f[2]], [f[0], f[2]]].map(|e| res.edge_ids[&e]))
            .collect();

        debug!(
            "Tet mesh: {} verts, {} edges, {} faces, {} elems",
            res.verts.len(),
            res.edges.len(),
            res.faces.len(),
            res.elems.len()
        );

        Ok(res)
    }

    /// Get the index of the edge between vertices `i` and `j`
    #[must_use]
    pub fn edge_index(&self, i: usize, j: usize) -> Option<usize> {
        self.edge_ids.get(&sorted([i, j])).copied()
    }

    /// Get the index of the face with vertices `i`, `j` and `k`
    #[must_use]
    pub fn face_index(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        self.face_ids.get(&sorted([i, j, k])).copied()
    }

    /// Iterator over the indices of the faces that belong to a single element
    #[must_use]
    pub fn boundary_faces(&self) -> impl Iterator<Item = usize> + '_ {
        self.face_to_elems
            .iter()
            .enumerate()
            .filter(|(_, e)| e[1] == usize::MAX)
            .map(|(i, _)| i)
    }

    /// Add nodes to tag `name` (the tag is created if needed)
    pub fn add_node_tag(&mut self, name: &str, ids: impl IntoIterator<Item = usize>) {
        self.node_tags.entry(name.into()).or_default().extend(ids);
    }

    /// Add edges to tag `name` (the tag is created if needed)
    pub fn add_edge_tag(&mut self, name: &str, ids: impl IntoIterator<Item = usize>) {
        self.edge_tags.entry(name.into()).or_default().extend(ids);
    }

    /// Add faces to tag `name` (the tag is created if needed)
    pub fn add_face_tag(&mut self, name: &str, ids: impl IntoIterator<Item = usize>) {
        self.face_tags.entry(name.into()).or_default().extend(ids);
    }
}

impl PrimalMesh for TetMesh {
    fn n_verts(&self) -> usize {
        self.verts.len()
    }

    fn vert(&self, i: usize) -> Vert3d {
        self.verts[i]
    }

    fn n_edges(&self) -> usize {
        self.edges.len()
    }

    fn edge(&self, i: usize) -> [usize; 2] {
        self.edges[i]
    }

    fn n_faces(&self) -> usize {
        self.faces.len()
    }

    fn face(&self, i: usize) -> [usize; 3] {
        self.faces[i]
    }

    fn face_edges(&self, i: usize) -> [usize; 3] {
        self.face_to_edges[i]
    }

    fn face_elems(&self, i: usize) -> [usize; 2] {
        self.face_to_elems[i]
    }

    fn n_elems(&self) -> usize {
        self.elems.len()
    }

    fn elem_faces(&self, i: usize) -> [usize; 4] {
        self.elem_to_faces[i]
    }

    fn elem(&self, i: usize) -> [usize; 4] {
        self.elems[i]
    }

    fn node_tag(&self, name: &str) -> &[usize] {
        self.node_tags.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    fn edge_tag(&self, name: &str) -> &[usize] {
        self.edge_tags.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    fn face_tag(&self, name: &str) -> &[usize] {
        self.face_tags.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}
