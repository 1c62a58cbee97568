//! Simple meshes and tagging schemes, mostly used in the tests
use super::{PrimalMesh, TetMesh};
use crate::{Result, Vert3d};

/// Create a `TetMesh` of the box `[0, lx] x [0, ly] x [0, lz]` by splitting a
/// structured grid with `nx x ny x nz` vertices. Every hexahedron is split into the
/// 6 tetrahedra sharing its main diagonal, which gives a conforming mesh.
pub fn box_mesh(lx: f64, nx: usize, ly: f64, ny: usize, lz: f64, nz: usize) -> Result<TetMesh> {
    let dx = lx / (nx as f64 - 1.);
    let dy = ly / (ny as f64 - 1.);
    let dz = lz / (nz as f64 - 1.);

    let idx = |i: usize, j: usize, k: usize| i + j * nx + k * nx * ny;

    let mut verts = vec![Vert3d::zeros(); nx * ny * nz];
    for i in 0..nx {
        for j in 0..ny {
            for k in 0..nz {
                verts[idx(i, j, k)] = Vert3d::new(i as f64 * dx, j as f64 * dy, k as f64 * dz);
            }
        }
    }

    let mut elems = Vec::with_capacity(6 * (nx - 1) * (ny - 1) * (nz - 1));
    for i in 0..nx - 1 {
        for j in 0..ny - 1 {
            for k in 0..nz - 1 {
                for perm in [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
                    let mut ijk = [i, j, k];
                    let mut tet = [idx(i, j, k); 4];
                    for (n, dir) in perm.into_iter().enumerate() {
                        ijk[dir] += 1;
                        tet[n + 1] = idx(ijk[0], ijk[1], ijk[2]);
                    }
                    elems.push(tet);
                }
            }
        }
    }

    TetMesh::new(verts, elems)
}

/// Regular tetrahedron split into 4 tetrahedra around its center (vertex 4)
pub fn stellated_tet() -> Result<TetMesh> {
    let verts = vec![
        Vert3d::new(1.0, 1.0, 1.0),
        Vert3d::new(1.0, -1.0, -1.0),
        Vert3d::new(-1.0, 1.0, -1.0),
        Vert3d::new(-1.0, -1.0, 1.0),
        Vert3d::new(0.0, 0.0, 0.0),
    ];
    let elems = vec![[1, 2, 3, 4], [0, 3, 2, 4], [0, 1, 3, 4], [0, 2, 1, 4]];

    TetMesh::new(verts, elems)
}

/// Tag the model features of a mesh from the angles between its boundary faces:
///   - all the boundary faces, as `"boundary"`
///   - the boundary edges where the normals of the two adjacent boundary faces make
///     an angle larger than `angle` (in degrees), as `"ridges"`
///   - the nodes with 1 or more than 2 ridges, as `"corners"`
pub fn tag_features(msh: &mut TetMesh, angle: f64) {
    let faces = msh.boundary_faces().collect::<Vec<_>>();

    let mut edge_normals = vec![Vec::new(); msh.n_edges()];
    for &i_face in &faces {
        let f = msh.face(i_face);
        let [p0, p1, p2] = f.map(|i| msh.vert(i));
        let mut n = (p1 - p0).cross(&(p2 - p0)).normalize();
        let i_elem = msh.face_elems(i_face)[0];
        if let Some(i) = msh.elem(i_elem).into_iter().find(|i| !f.contains(i)) {
            if n.dot(&(msh.vert(i) - p0)) > 0.0 {
                n = -n;
            }
        }
        for i_edge in msh.face_edges(i_face) {
            edge_normals[i_edge].push(n);
        }
    }

    let cos = angle.to_radians().cos();
    let ridges = edge_normals
        .iter()
        .enumerate()
        .filter(|(_, n)| n.len() == 2 && n[0].dot(&n[1]) < cos)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    let mut n_ridges = vec![0; msh.n_verts()];
    for &i_edge in &ridges {
        for i in msh.edge(i_edge) {
            n_ridges[i] += 1;
        }
    }
    let corners = n_ridges
        .iter()
        .enumerate()
        .filter(|(_, &n)| n == 1 || n > 2)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    msh.add_face_tag("boundary", faces);
    msh.add_edge_tag("ridges", ridges);
    msh.add_node_tag("corners", corners);
}

/// Tag as `name` the faces separating the elements whose center lies in the box
/// `[lo, hi]` from the other elements
pub fn tag_block_interface(msh: &mut TetMesh, lo: &Vert3d, hi: &Vert3d, name: &str) {
    let inside = (0..msh.n_elems())
        .map(|i| {
            let c = msh.elem_center(i);
            (0..3).all(|j| c[j] > lo[j] && c[j] < hi[j])
        })
        .collect::<Vec<_>>();

    let faces = (0..msh.n_faces())
        .filter(|&i| {
            let [e0, e1] = msh.face_elems(i);
            e1 != usize::MAX && inside[e0] != inside[e1]
        })
        .collect::<Vec<_>>();
    msh.add_face_tag(name, faces);
}

/// Copy of `msh`, without its tags, where the nodes that are not on the boundary are
/// moved by `offset`
pub fn move_interior_nodes(msh: &TetMesh, mut offset: impl FnMut() -> Vert3d) -> Result<TetMesh> {
    let mut on_boundary = vec![false; msh.n_verts()];
    msh.boundary_faces()
        .flat_map(|i| msh.face(i))
        .for_each(|i| on_boundary[i] = true);

    let verts = (0..msh.n_verts())
        .map(|i| {
            if on_boundary[i] {
                msh.vert(i)
            } else {
                msh.vert(i) + offset()
            }
        })
        .collect();
    let elems = (0..msh.n_elems()).map(|i| msh.elem(i)).collect();

    TetMesh::new(verts, elems)
}
