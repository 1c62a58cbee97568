//! Assembly of the dual cells and flattening of the connectivities
use super::{DualFace, DualFaceKind};
use crate::{Error, Result, mesh::PrimalMesh};

/// Faces of the dual cell of every primal node, in face order, with a flag set when
/// the face normal points out of the cell
///   - the faces of an edge belong to the cells of both its nodes, oriented outwards
///     for the node with the lowest index
///   - the closure faces of a node belong to its cell only, oriented outwards
pub fn assemble_cells<M: PrimalMesh>(msh: &M, faces: &[DualFace]) -> Vec<Vec<(usize, bool)>> {
    let mut res = vec![Vec::new(); msh.n_verts()];
    for (i_face, f) in faces.iter().enumerate() {
        match f.kind {
            DualFaceKind::Interior(i_edge)
            | DualFaceKind::Boundary(i_edge)
            | DualFaceKind::Interface(i_edge) => {
                let [i0, i1] = msh.edge(i_edge);
                res[i0.min(i1)].push((i_face, true));
                res[i0.max(i1)].push((i_face, false));
            }
            DualFaceKind::Closure(i_node) => res[i_node].push((i_face, true)),
        }
    }
    res
}

/// Flattened face and cell connectivities
pub struct CompactConnectivity {
    pub face_to_node_ptr: Vec<usize>,
    pub face_to_node: Vec<usize>,
    pub face_kinds: Vec<DualFaceKind>,
    pub face_cells: Vec<[usize; 2]>,
    pub elem_to_face_ptr: Vec<usize>,
    pub elem_to_face: Vec<(usize, bool)>,
}

impl CompactConnectivity {
    /// Flatten the per face / per cell lists and fill the cells on both sides of the
    /// faces (`usize::MAX` when a face bounds a single cell)
    pub fn new(faces: Vec<DualFace>, cells: Vec<Vec<(usize, bool)>>) -> Result<Self> {
        let n_faces = faces.len();

        let mut face_to_node_ptr = Vec::with_capacity(n_faces + 1);
        face_to_node_ptr.push(0);
        let mut face_to_node = Vec::with_capacity(faces.iter().map(|f| f.nodes.len()).sum());
        let mut face_kinds = Vec::with_capacity(n_faces);
        for f in faces {
            face_to_node.extend(f.nodes);
            face_to_node_ptr.push(face_to_node.len());
            face_kinds.push(f.kind);
        }

        let mut elem_to_face_ptr = Vec::with_capacity(cells.len() + 1);
        elem_to_face_ptr.push(0);
        let mut elem_to_face = Vec::with_capacity(cells.iter().map(Vec::len).sum());
        let mut face_cells = vec![[usize::MAX; 2]; n_faces];
        for (i_cell, cell) in cells.into_iter().enumerate() {
            for &(i_face, _) in &cell {
                let slots = &mut face_cells[i_face];
                if slots[0] == usize::MAX {
                    slots[0] = i_cell;
                } else if slots[1] == usize::MAX {
                    slots[1] = i_cell;
                } else {
                    return Err(Error::from(&format!(
                        "Dual face {i_face} bounds cells {}, {} and {i_cell}",
                        slots[0], slots[1]
                    )));
                }
            }
            elem_to_face.extend(cell);
            elem_to_face_ptr.push(elem_to_face.len());
        }

        if let Some(i) = face_cells.iter().position(|c| c[0] == usize::MAX) {
            return Err(Error::from(&format!("Dual face {i} bounds no cell")));
        }

        assert_eq!(face_to_node_ptr[n_faces], face_to_node.len());
        assert_eq!(elem_to_face_ptr[elem_to_face_ptr.len() - 1], elem_to_face.len());

        Ok(Self {
            face_to_node_ptr,
            face_to_node,
            face_kinds,
            face_cells,
            elem_to_face_ptr,
            elem_to_face,
        })
    }
}
