//! Polyhedral dual mesh
//!
//! The cells of the dual are the primal nodes, its faces are built around the
//! primal edges (and close the cells of the boundary nodes) and its vertices are
//! created from the primal elements and the model entities.
use super::{
    DualFaceBuilder, DualFaceKind, DualVertexFactory, DualVertexKind, EdgeIncidenceIndex,
    FaceOrdering, ModelTags, TaggedSets,
    cells::{CompactConnectivity, assemble_cells},
};
use crate::{Error, Result, Vert3d, mesh::PrimalMesh};
use core::fmt;
use log::{debug, info};
use rayon::prelude::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Options of the dual mesh construction
#[derive(Debug, Clone, Copy, Default)]
pub struct DualOptions {
    /// Ordering of the elements around the edges
    pub ordering: FaceOrdering,
    /// Ownership domain (e.g. rank of the process) of the mesh
    pub domain: usize,
}

/// Dual of a tagged tetrahedral mesh
#[derive(Debug, Clone)]
pub struct DualMesh {
    verts: Vec<Vert3d>,
    vert_kinds: Vec<DualVertexKind>,
    face_to_node_ptr: Vec<usize>,
    face_to_node: Vec<usize>,
    face_kinds: Vec<DualFaceKind>,
    face_cells: Vec<[usize; 2]>,
    elem_to_face_ptr: Vec<usize>,
    elem_to_face: Vec<(usize, bool)>,
    domain: usize,
}

impl DualMesh {
    /// Build the dual of `msh`, where the geometric model is described by `tags`
    pub fn new<M: PrimalMesh>(msh: &M, tags: &ModelTags, opts: &DualOptions) -> Result<Self> {
        info!(
            "Build the dual of a mesh with {} vertices and {} elements",
            msh.n_verts(),
            msh.n_elems()
        );

        let sets = TaggedSets::new(msh, tags)?;
        let index = EdgeIncidenceIndex::new(msh, &sets)?;
        let verts = DualVertexFactory::new(msh, &sets);
        let faces = DualFaceBuilder::new(msh, &sets, &index, &verts, opts.ordering).build()?;
        let cells = assemble_cells(msh, &faces);
        let conn = CompactConnectivity::new(faces, cells)?;
        let (verts, vert_kinds) = verts.into_parts();

        let res = Self {
            verts,
            vert_kinds,
            face_to_node_ptr: conn.face_to_node_ptr,
            face_to_node: conn.face_to_node,
            face_kinds: conn.face_kinds,
            face_cells: conn.face_cells,
            elem_to_face_ptr: conn.elem_to_face_ptr,
            elem_to_face: conn.elem_to_face,
            domain: opts.domain,
        };

        info!(
            "Dual mesh: {} vertices, {} faces, {} elements",
            res.n_verts(),
            res.n_faces(),
            res.n_elems()
        );
        debug!("{}", res.stats());

        Ok(res)
    }

    /// Number of vertices
    #[must_use]
    pub fn n_verts(&self) -> usize {
        self.verts.len()
    }

    /// Get the `i`th vertex
    #[must_use]
    pub fn vert(&self, i: usize) -> Vert3d {
        self.verts[i]
    }

    /// Primal entity the `i`th vertex was created from
    #[must_use]
    pub fn vert_kind(&self, i: usize) -> DualVertexKind {
        self.vert_kinds[i]
    }

    /// Sequential iterator over the vertices
    #[must_use]
    pub fn verts(&self) -> impl ExactSizeIterator<Item = Vert3d> + '_ {
        self.verts.iter().copied()
    }

    /// Parallel iterator over the vertices
    #[must_use]
    pub fn par_verts(&self) -> impl IndexedParallelIterator<Item = Vert3d> + '_ {
        (0..self.n_verts()).into_par_iter().map(|i| self.vert(i))
    }

    /// Number of faces
    #[must_use]
    pub fn n_faces(&self) -> usize {
        self.face_kinds.len()
    }

    /// Get the `i`th face
    #[must_use]
    pub fn face(&self, i: usize) -> &[usize] {
        let start = self.face_to_node_ptr[i];
        let end = self.face_to_node_ptr[i + 1];
        &self.face_to_node[start..end]
    }

    /// Primal entity the `i`th face was created from
    #[must_use]
    pub fn face_kind(&self, i: usize) -> DualFaceKind {
        self.face_kinds[i]
    }

    /// Elements on both sides of the `i`th face. The normal points from the first one
    /// to the second one, which is `usize::MAX` if the face is on the boundary
    #[must_use]
    pub fn face_cells(&self, i: usize) -> [usize; 2] {
        self.face_cells[i]
    }

    /// Sequential iterator over the faces
    #[must_use]
    pub fn faces(&self) -> impl ExactSizeIterator<Item = &[usize]> + '_ {
        (0..self.n_faces()).map(|i| self.face(i))
    }

    /// Parallel iterator over the faces
    #[must_use]
    pub fn par_faces(&self) -> impl IndexedParallelIterator<Item = &[usize]> + '_ {
        (0..self.n_faces()).into_par_iter().map(|i| self.face(i))
    }

    /// Number of elements
    #[must_use]
    pub fn n_elems(&self) -> usize {
        self.elem_to_face_ptr.len() - 1
    }

    /// Get the faces of the `i`th element, and whether their normal points outwards
    #[must_use]
    pub fn elem(&self, i: usize) -> &[(usize, bool)] {
        let start = self.elem_to_face_ptr[i];
        let end = self.elem_to_face_ptr[i + 1];
        &self.elem_to_face[start..end]
    }

    /// Sequential iterator over the elements
    #[must_use]
    pub fn elems(&self) -> impl ExactSizeIterator<Item = &[(usize, bool)]> + '_ {
        (0..self.n_elems()).map(|i| self.elem(i))
    }

    /// Parallel iterator over the elements
    #[must_use]
    pub fn par_elems(&self) -> impl IndexedParallelIterator<Item = &[(usize, bool)]> + '_ {
        (0..self.n_elems()).into_par_iter().map(|i| self.elem(i))
    }

    /// Ownership domain
    #[must_use]
    pub const fn domain(&self) -> usize {
        self.domain
    }

    /// Offsets of the face to vertex connectivity (length `n_faces + 1`)
    #[must_use]
    pub fn face_to_node_ptr(&self) -> &[usize] {
        &self.face_to_node_ptr
    }

    /// Offsets of the element to face connectivity (length `n_elems + 1`)
    #[must_use]
    pub fn elem_to_face_ptr(&self) -> &[usize] {
        &self.elem_to_face_ptr
    }

    /// Volume of the `i`th element, using a fan triangulation of its faces
    #[must_use]
    pub fn vol(&self, i: usize) -> f64 {
        let e = self.elem(i);
        let Some(&(i_face, _)) = e.first() else {
            return 0.0;
        };
        let o = self.vert(self.face(i_face)[0]);

        e.iter()
            .map(|&(i_face, orient)| {
                let f = self.face(i_face);
                let p0 = self.vert(f[0]) - o;
                let v = f
                    .windows(2)
                    .skip(1)
                    .map(|w| {
                        let p1 = self.vert(w[0]) - o;
                        let p2 = self.vert(w[1]) - o;
                        p0.dot(&p1.cross(&p2))
                    })
                    .sum::<f64>();
                if orient { v } else { -v }
            })
            .sum::<f64>()
            / 6.0
    }

    /// Sequential iterator over the element volumes
    #[must_use]
    pub fn vols(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        (0..self.n_elems()).map(|i| self.vol(i))
    }

    /// Parallel iterator over the element volumes
    #[must_use]
    pub fn par_vols(&self) -> impl IndexedParallelIterator<Item = f64> + '_ {
        (0..self.n_elems()).into_par_iter().map(|i| self.vol(i))
    }

    /// Check if polyhedral element `e` is closed: every segment of its faces is used
    /// exactly twice, in opposite directions
    #[must_use]
    pub fn is_closed(&self, e: &[(usize, bool)]) -> bool {
        let mut segments = FxHashMap::<[usize; 2], (usize, i32)>::default();
        for &(i_face, orient) in e {
            let f = self.face(i_face);
            let n = f.len();
            for j in 0..n {
                let (mut a, mut b) = (f[j], f[(j + 1) % n]);
                if !orient {
                    std::mem::swap(&mut a, &mut b);
                }
                let s = segments.entry([a.min(b), a.max(b)]).or_insert((0, 0));
                s.0 += 1;
                s.1 += if a < b { 1 } else { -1 };
            }
        }
        segments.values().all(|&(count, sum)| count == 2 && sum == 0)
    }

    /// Check the validity of the dual mesh
    ///  - consistent offsets
    ///  - consistent face to vertex and element to face connectivities
    ///  - faces with at least 3 vertices, belonging to 1 or 2 elements
    ///  - closed elements with a positive volume
    pub fn check(&self) -> Result<()> {
        for (name, ptr, n) in [
            ("faces", &self.face_to_node_ptr, self.face_to_node.len()),
            ("elems", &self.elem_to_face_ptr, self.elem_to_face.len()),
        ] {
            if ptr.first() != Some(&0) || ptr.last() != Some(&n) {
                return Err(Error::from(&format!("Inconsistent offsets ({name})")));
            }
            if ptr.windows(2).any(|w| w[0] > w[1]) {
                return Err(Error::from(&format!("Decreasing offsets ({name})")));
            }
        }

        if self.vert_kinds.len() != self.n_verts()
            || self.face_cells.len() != self.n_faces()
            || self.face_to_node_ptr.len() != self.n_faces() + 1
        {
            return Err(Error::from("Inconsistent sizes"));
        }

        // indices
        if self
            .par_faces()
            .any(|f| f.iter().any(|&i| i >= self.n_verts()))
        {
            return Err(Error::from("Inconsistent indices (faces)"));
        }
        if self
            .par_elems()
            .any(|e| e.iter().any(|&(i, _)| i >= self.n_faces()))
        {
            return Err(Error::from("Inconsistent indices (elems)"));
        }

        let mut used = vec![false; self.n_verts()];
        self.face_to_node.iter().for_each(|&i| used[i] = true);
        if let Some(i) = used.iter().position(|&x| !x) {
            return Err(Error::from(&format!(
                "Vertex {i} ({:?}) is not used by any face",
                self.vert_kinds[i]
            )));
        }

        if let Some(i) = self.faces().position(|f| f.len() < 3) {
            return Err(Error::from(&format!(
                "Face {i} has less than 3 vertices ({:?})",
                self.face(i)
            )));
        }

        // faces belong to 1 or 2 elements, with opposite orientations
        let mut flg = vec![Vec::with_capacity(2); self.n_faces()];
        for (i_elem, e) in self.elems().enumerate() {
            for &(i_face, orient) in e {
                flg[i_face].push((i_elem, orient));
            }
        }
        for (i_face, elems) in flg.iter().enumerate() {
            let [c0, c1] = self.face_cells[i_face];
            let ok = match elems.as_slice() {
                &[(e0, o0)] => o0 && e0 == c0 && c1 == usize::MAX,
                &[(e0, o0), (e1, o1)] => o0 != o1 && e0 == c0 && e1 == c1,
                _ => false,
            };
            if !ok {
                return Err(Error::from(&format!(
                    "Face {i_face} ({:?}) invalid: elements {elems:?}, face cells {:?}",
                    self.face(i_face),
                    self.face_cells[i_face]
                )));
            }
        }

        // closed elements
        for (i, (e, v)) in self.elems().zip(self.vols()).enumerate() {
            if v < 0.0 {
                return Err(Error::from(&format!(
                    "Element {i} invalid: vol={v} < 0  ({e:?})"
                )));
            }
            if !self.is_closed(e) {
                return Err(Error::from(&format!("Element {i} not closed ({e:?})")));
            }
        }

        Ok(())
    }

    /// Entity counts and total volume
    #[must_use]
    pub fn stats(&self) -> DualStats {
        let mut res = DualStats {
            n_verts: self.n_verts(),
            n_faces: self.n_faces(),
            n_elems: self.n_elems(),
            domain: self.domain,
            volume: self.par_vols().sum(),
            ..Default::default()
        };
        for &k in &self.vert_kinds {
            match k {
                DualVertexKind::Cell(_) => res.n_cell_verts += 1,
                DualVertexKind::Face(_) => res.n_face_verts += 1,
                DualVertexKind::Edge(_) => res.n_edge_verts += 1,
                DualVertexKind::Node(_) => res.n_node_verts += 1,
            }
        }
        for &k in &self.face_kinds {
            match k {
                DualFaceKind::Interior(_) => res.n_interior_faces += 1,
                DualFaceKind::Boundary(_) => res.n_boundary_faces += 1,
                DualFaceKind::Interface(_) => res.n_interface_faces += 1,
                DualFaceKind::Closure(_) => res.n_closure_faces += 1,
            }
        }
        res
    }
}

/// Statistics of a dual mesh
#[derive(Debug, Clone, Default, Serialize)]
pub struct DualStats {
    pub n_verts: usize,
    /// Vertices created from the primal elements
    pub n_cell_verts: usize,
    /// Vertices created from the tagged faces
    pub n_face_verts: usize,
    /// Vertices created from the model edges
    pub n_edge_verts: usize,
    /// Vertices created from the model vertices
    pub n_node_verts: usize,
    pub n_faces: usize,
    pub n_interior_faces: usize,
    pub n_boundary_faces: usize,
    pub n_interface_faces: usize,
    /// Faces closing the elements of the boundary nodes
    pub n_closure_faces: usize,
    pub n_elems: usize,
    pub domain: usize,
    /// Sum of the element volumes
    pub volume: f64,
}

impl DualStats {
    /// Export as json
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for DualStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Dual mesh (domain {})", self.domain)?;
        writeln!(
            f,
            "  vertices: {} ({} cells, {} faces, {} edges, {} nodes)",
            self.n_verts, self.n_cell_verts, self.n_face_verts, self.n_edge_verts, self.n_node_verts
        )?;
        writeln!(
            f,
            "  faces: {} ({} interior, {} boundary, {} interface, {} closure)",
            self.n_faces,
            self.n_interior_faces,
            self.n_boundary_faces,
            self.n_interface_faces,
            self.n_closure_faces
        )?;
        write!(f, "  elements: {}, volume: {:.6e}", self.n_elems, self.volume)
    }
}

#[cfg(test)]
mod tests {
    use super::{DualMesh, DualOptions};
    use crate::{
        Result, Vert3d, assert_delta,
        dual::{DualFaceKind, DualVertexKind, FaceOrdering, ModelTags},
        geometry::polygon_normal,
        init_log,
        mesh::{
            PrimalMesh, TetMesh,
            test_meshes::{
                box_mesh, move_interior_nodes, stellated_tet, tag_block_interface, tag_features,
            },
        },
    };
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use rayon::iter::ParallelIterator;

    fn model_tags() -> ModelTags {
        ModelTags::new(&["boundary"], &[], &["ridges"], &["corners"])
    }

    fn all_verts_used(dual: &DualMesh) -> bool {
        let mut used = vec![false; dual.n_verts()];
        dual.faces().flatten().for_each(|&i| used[i] = true);
        used.into_iter().all(|x| x)
    }

    fn stellated() -> Result<TetMesh> {
        let mut msh = stellated_tet()?;
        tag_features(&mut msh, 30.0);
        Ok(msh)
    }

    #[test]
    fn test_stellated() -> Result<()> {
        init_log("warn");
        let msh = stellated()?;
        let dual = DualMesh::new(&msh, &model_tags(), &DualOptions::default())?;
        dual.check()?;

        // 4 elements, 4 faces, 6 edges, 4 vertices
        assert_eq!(dual.n_verts(), 18);
        assert_eq!(dual.n_elems(), 5);
        // 10 edges, 4 nodes with 3 sectors
        assert_eq!(dual.n_faces(), 22);

        let single = (0..dual.n_faces())
            .filter(|&i| dual.face_cells(i)[1] == usize::MAX)
            .collect::<Vec<_>>();
        assert_eq!(single.len(), 12);
        for i in single {
            assert!(matches!(dual.face_kind(i), DualFaceKind::Closure(_)));
        }

        let vol = dual.vols().sum::<f64>();
        assert_delta!(vol, 8.0 / 3.0, 1e-12);
        // the central cell is the tetrahedron of the outer face centers
        assert_delta!(dual.vol(4), 8.0 / 81.0, 1e-12);
        assert!(dual.par_vols().all(|v| v > 0.0));

        // the normals of the edge faces point from the first to the second element
        for i_face in 0..dual.n_faces() {
            let [c0, c1] = dual.face_cells(i_face);
            if c1 == usize::MAX {
                continue;
            }
            let pts = dual.face(i_face).iter().map(|&i| dual.vert(i)).collect::<Vec<_>>();
            let n = polygon_normal(&pts);
            assert!(n.dot(&(msh.vert(c1) - msh.vert(c0))) > 0.0);
        }

        Ok(())
    }

    #[test]
    fn test_orderings() -> Result<()> {
        let msh = stellated()?;
        let opts = DualOptions {
            ordering: FaceOrdering::Topological,
            domain: 3,
        };
        let topo = DualMesh::new(&msh, &model_tags(), &opts)?;
        let geom = DualMesh::new(&msh, &model_tags(), &DualOptions::default())?;
        assert_eq!(topo.domain(), 3);
        assert_eq!(geom.domain(), 0);

        assert_eq!(topo.n_faces(), geom.n_faces());
        for (f0, f1) in topo.faces().zip(geom.faces()) {
            assert_eq!(f0, f1);
        }
        for (e0, e1) in topo.elems().zip(geom.elems()) {
            assert_eq!(e0, e1);
        }

        Ok(())
    }

    #[test]
    fn test_deterministic() -> Result<()> {
        let msh = stellated()?;
        let d0 = DualMesh::new(&msh, &model_tags(), &DualOptions::default())?;
        let d1 = DualMesh::new(&msh, &model_tags(), &DualOptions::default())?;

        assert_eq!(d0.n_verts(), d1.n_verts());
        for (v0, v1) in d0.verts().zip(d1.verts()) {
            assert_delta!((v0 - v1).norm(), 0.0, 1e-15);
        }
        assert_eq!(d0.face_to_node_ptr(), d1.face_to_node_ptr());
        assert_eq!(d0.elem_to_face_ptr(), d1.elem_to_face_ptr());
        assert!(d0.faces().eq(d1.faces()));
        assert!(d0.elems().eq(d1.elems()));

        Ok(())
    }

    #[test]
    fn test_offsets() -> Result<()> {
        let msh = stellated()?;
        let dual = DualMesh::new(&msh, &model_tags(), &DualOptions::default())?;

        let ptr = dual.face_to_node_ptr();
        assert_eq!(ptr.len(), dual.n_faces() + 1);
        assert_eq!(ptr[0], 0);
        assert_eq!(ptr[dual.n_faces()], dual.faces().map(<[usize]>::len).sum::<usize>());

        let ptr = dual.elem_to_face_ptr();
        assert_eq!(ptr.len(), dual.n_elems() + 1);
        assert_eq!(ptr[0], 0);
        assert_eq!(ptr[dual.n_elems()], dual.elems().map(<[(usize, bool)]>::len).sum::<usize>());

        // 3 interior edge faces for the central node
        assert_eq!(dual.elem(4).len(), 4);
        assert!(dual.elem(4).iter().all(|&(_, orient)| !orient));
        // 3 boundary edges, 1 interior edge and 3 closure faces for the outer nodes
        for i in 0..4 {
            assert_eq!(dual.elem(i).len(), 7);
        }

        Ok(())
    }

    #[test]
    fn test_vertices() -> Result<()> {
        let msh = stellated()?;
        let dual = DualMesh::new(&msh, &model_tags(), &DualOptions::default())?;

        for i in 0..dual.n_verts() {
            match dual.vert_kind(i) {
                DualVertexKind::Cell(i_elem) => assert_eq!(i, i_elem),
                DualVertexKind::Face(i_face) => {
                    assert_delta!((dual.vert(i) - msh.face_center(i_face)).norm(), 0.0, 1e-14);
                }
                DualVertexKind::Edge(i_edge) => {
                    let [i0, i1] = msh.edge(i_edge);
                    let m = 0.5 * (msh.vert(i0) + msh.vert(i1));
                    assert_delta!((dual.vert(i) - m).norm(), 0.0, 1e-14);
                }
                DualVertexKind::Node(i_node) => {
                    assert_delta!((dual.vert(i) - msh.vert(i_node)).norm(), 0.0, 1e-14);
                }
            }
        }
        assert_eq!(dual.par_verts().count(), 18);

        Ok(())
    }

    #[test]
    fn test_box() -> Result<()> {
        let (lx, ly, lz) = (1.0, 2.0, 1.5);
        let mut msh = box_mesh(lx, 3, ly, 4, lz, 3)?;
        tag_features(&mut msh, 30.0);

        let opts = DualOptions {
            ordering: FaceOrdering::Topological,
            ..Default::default()
        };
        let dual = DualMesh::new(&msh, &model_tags(), &opts)?;
        dual.check()?;

        // coincident circumcenters are ordered by walking around the edges
        let geom = DualMesh::new(&msh, &model_tags(), &DualOptions::default())?;
        assert!(geom.faces().eq(dual.faces()));
        assert!(geom.elems().eq(dual.elems()));
        assert_eq!(dual.n_elems(), msh.n_verts());
        assert_delta!(dual.par_vols().sum::<f64>(), lx * ly * lz, 1e-10);

        // inner nodes: boxes around the node
        let dx = Vert3d::new(lx / 2.0, ly / 3.0, lz / 2.0);
        let i = 1 + 3 + 12;
        assert_delta!(dual.vol(i), dx[0] * dx[1] * dx[2], 1e-10);

        Ok(())
    }

    #[test]
    fn test_interface() -> Result<()> {
        let mut msh = box_mesh(1.0, 5, 1.0, 5, 1.0, 5)?;
        tag_features(&mut msh, 30.0);
        tag_block_interface(
            &mut msh,
            &Vert3d::new(0.25, 0.25, 0.25),
            &Vert3d::new(0.75, 0.75, 0.75),
            "interface",
        );
        let tags = ModelTags::new(&["boundary"], &["interface"], &["ridges"], &["corners"]);
        let opts = DualOptions {
            ordering: FaceOrdering::Topological,
            ..Default::default()
        };
        let dual = DualMesh::new(&msh, &tags, &opts)?;

        for e in dual.elems() {
            assert!(dual.is_closed(e));
        }
        assert_delta!(dual.vols().sum::<f64>(), 1.0, 1e-10);

        let stats = dual.stats();
        assert_eq!(stats.n_interface_faces, 2 * 72);
        // 6 x 4 x 4 x 2 external and 48 internal faces
        assert_eq!(stats.n_face_verts, 192 + 48);

        Ok(())
    }

    #[test]
    fn test_jittered_box() -> Result<()> {
        let msh = box_mesh(1.0, 5, 1.0, 5, 1.0, 5)?;
        let mut rng = StdRng::seed_from_u64(7);
        let mut msh = move_interior_nodes(&msh, || {
            Vert3d::from_fn(|_, _| 0.05 * (rng.random::<f64>() - 0.5))
        })?;
        tag_features(&mut msh, 30.0);

        let dual = DualMesh::new(&msh, &model_tags(), &DualOptions::default())?;
        assert_eq!(dual.n_elems(), msh.n_verts());
        for e in dual.elems() {
            assert!(dual.is_closed(e));
        }
        assert_delta!(dual.vols().sum::<f64>(), 1.0, 1e-10);

        let opts = DualOptions {
            ordering: FaceOrdering::Topological,
            ..Default::default()
        };
        let topo = DualMesh::new(&msh, &model_tags(), &opts)?;
        assert!(topo.faces().eq(dual.faces()));

        Ok(())
    }

    #[test]
    fn test_interface_model_edges() -> Result<()> {
        let mut msh = box_mesh(1.0, 5, 1.0, 5, 1.0, 5)?;
        tag_features(&mut msh, 30.0);
        tag_block_interface(
            &mut msh,
            &Vert3d::new(0.25, 0.25, 0.25),
            &Vert3d::new(0.75, 0.75, 0.75),
            "interface",
        );
        // the edges of the block
        let on_block_edge = |p: Vert3d| {
            p.iter()
                .filter(|&&x| (x - 0.25).abs() < 1e-12 || (x - 0.75).abs() < 1e-12)
                .count()
                >= 2
        };
        let mut edges = msh
            .face_tag("interface")
            .iter()
            .flat_map(|&i| msh.face_edges(i))
            .filter(|&i| {
                let [i0, i1] = msh.edge(i);
                on_block_edge(0.5 * (msh.vert(i0) + msh.vert(i1)))
            })
            .collect::<Vec<_>>();
        edges.sort_unstable();
        edges.dedup();
        assert_eq!(edges.len(), 24);
        msh.add_edge_tag("block", edges);

        let tags = ModelTags::new(
            &["boundary"],
            &["interface"],
            &["ridges", "block"],
            &["corners"],
        );
        let opts = DualOptions {
            ordering: FaceOrdering::Topological,
            ..Default::default()
        };
        let dual = DualMesh::new(&msh, &tags, &opts)?;
        for e in dual.elems() {
            assert!(dual.is_closed(e));
        }
        assert!(all_verts_used(&dual));
        assert_eq!(dual.stats().n_edge_verts, 48 + 24);
        assert_delta!(dual.vols().sum::<f64>(), 1.0, 1e-10);

        Ok(())
    }

    #[test]
    fn test_vertex_without_edges() -> Result<()> {
        // a model vertex at the center of a side
        let mut msh = box_mesh(1.0, 3, 1.0, 3, 1.0, 3)?;
        tag_features(&mut msh, 30.0);
        msh.add_node_tag("center", [4]);
        let tags = ModelTags::new(&["boundary"], &[], &["ridges"], &["corners", "center"]);
        let dual = DualMesh::new(&msh, &tags, &DualOptions::default())?;
        dual.check()?;
        assert_delta!(dual.vols().sum::<f64>(), 1.0, 1e-10);
        // the 6 triangles around the node
        let n = (0..dual.n_faces())
            .filter(|&i| dual.face_kind(i) == DualFaceKind::Closure(4))
            .count();
        assert_eq!(n, 6);

        Ok(())
    }

    #[test]
    fn test_vertex_with_one_edge() -> Result<()> {
        let mut msh = stellated()?;
        msh.add_edge_tag("one", [msh.edge_index(0, 1).unwrap()]);
        msh.add_node_tag("two", [0, 2]);
        let tags = ModelTags::new(&["boundary"], &[], &["one"], &["two"]);
        let dual = DualMesh::new(&msh, &tags, &DualOptions::default())?;
        for e in dual.elems() {
            assert!(dual.is_closed(e));
        }
        let kinds = (0..dual.n_verts())
            .map(|i| dual.vert_kind(i))
            .collect::<Vec<_>>();
        assert!(kinds.contains(&DualVertexKind::Node(0)));
        assert!(kinds.contains(&DualVertexKind::Node(2)));
        assert!(all_verts_used(&dual));

        // a dangling ridge of the box, between two corners
        let mut msh = box_mesh(1.0, 3, 1.0, 3, 1.0, 3)?;
        tag_features(&mut msh, 30.0);
        let edges = [(0, 1), (1, 2)].map(|(i, j)| msh.edge_index(i, j).unwrap());
        msh.add_edge_tag("one", edges);
        let tags = ModelTags::new(&["boundary"], &[], &["one"], &["corners"]);
        let dual = DualMesh::new(&msh, &tags, &DualOptions::default())?;
        for e in dual.elems() {
            assert!(dual.is_closed(e));
        }
        assert!(all_verts_used(&dual));
        // the ring [e, f_1, ..., f_6] around corner 0 split into triangles
        let n = (0..dual.n_faces())
            .filter(|&i| dual.face_kind(i) == DualFaceKind::Closure(0))
            .count();
        assert_eq!(n, 7);

        Ok(())
    }

    #[test]
    fn test_config_errors() -> Result<()> {
        let msh = stellated()?;
        let opts = DualOptions::default();

        let tags = ModelTags::new(&["boundary"], &[], &[], &["corners"]);
        assert!(DualMesh::new(&msh, &tags, &opts).is_err());

        let tags = ModelTags::new(&[], &[], &["ridges"], &["corners"]);
        assert!(DualMesh::new(&msh, &tags, &opts).is_err());

        // boundary faces without tag
        let tags = ModelTags::new(&["unknown"], &[], &["ridges"], &["corners"]);
        assert!(DualMesh::new(&msh, &tags, &opts).is_err());

        // unknown names are empty sets
        let tags = ModelTags::new(&["boundary"], &["unknown"], &["ridges"], &["corners"]);
        assert!(DualMesh::new(&msh, &tags, &opts).is_ok());

        Ok(())
    }

    #[test]
    fn test_check() -> Result<()> {
        let msh = stellated()?;
        let dual = DualMesh::new(&msh, &model_tags(), &DualOptions::default())?;

        let mut tmp = dual.clone();
        tmp.face_to_node[0] = dual.n_verts();
        assert!(tmp.check().is_err());

        let mut tmp = dual.clone();
        tmp.elem_to_face[0].1 = !tmp.elem_to_face[0].1;
        assert!(tmp.check().is_err());

        // a vertex that no face uses
        let mut tmp = dual.clone();
        tmp.verts.push(Vert3d::zeros());
        tmp.vert_kinds.push(DualVertexKind::Cell(4));
        assert!(tmp.check().is_err());

        // remove a face from an element
        let mut tmp = dual;
        tmp.elem_to_face.remove(0);
        for x in tmp.elem_to_face_ptr.iter_mut().skip(1) {
            *x -= 1;
        }
        assert!(tmp.check().is_err());

        Ok(())
    }

    #[test]
    fn test_stats() -> Result<()> {
        let msh = stellated()?;
        let dual = DualMesh::new(&msh, &model_tags(), &DualOptions::default())?;
        let stats = dual.stats();

        assert_eq!(stats.n_cell_verts, 4);
        assert_eq!(stats.n_face_verts, 4);
        assert_eq!(stats.n_edge_verts, 6);
        assert_eq!(stats.n_node_verts, 4);
        assert_eq!(stats.n_interior_faces, 4);
        assert_eq!(stats.n_boundary_faces, 6);
        assert_eq!(stats.n_interface_faces, 0);
        assert_eq!(stats.n_closure_faces, 12);

        let json = stats.to_json()?;
        let v: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(v["n_elems"], 5);
        assert_eq!(v["n_faces"], 22);
        assert!(format!("{stats}").contains("22 (4 interior"));

        Ok(())
    }
}
