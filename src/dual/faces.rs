//! Dual faces built around the primal edges
//!
//! The face of edge `(a, b)` (with `a < b`) is ordered counter-clockwise around
//! `b - a`, so that its normal points from the dual cell of `a` to the dual cell
//! of `b`.
use super::{DualVertexFactory, EdgeIncidenceIndex, EdgeKind, TaggedSets};
use crate::{
    Error, Result, Vert3d,
    geometry::{PlaneProjection, convex_hull_order, tet_vol},
    mesh::PrimalMesh,
};
use log::debug;
use std::f64::consts::TAU;

/// Smallest angle between the dual vertices around an edge
const ANGLE_TOL: f64 = 1e-10;

/// Strategy used to order the elements around an edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FaceOrdering {
    /// Convex hulls and angles of the dual vertices, projected on the plane
    /// orthogonal to the edge. The topological walk is used around the edges where
    /// two dual vertices have the same direction, e.g. for meshes obtained by
    /// splitting structured grids
    #[default]
    Geometric,
    /// Walk through the faces shared by the elements around the edge
    Topological,
}

/// Primal entity a dual face was created from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DualFaceKind {
    /// Edge that is not on a tagged face
    Interior(usize),
    /// Edge on the external boundary
    Boundary(usize),
    /// Edge on an internal interface (two faces per edge)
    Interface(usize),
    /// Node on the external boundary
    Closure(usize),
}

/// Ordered dual vertices of a dual face
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualFace {
    pub nodes: Vec<usize>,
    pub kind: DualFaceKind,
}

/// Order the elements around an external boundary edge, from `ends[0]` to `ends[1]`
///
/// The other elements are sorted by `angle` relative to `ends[0]` in the
/// counter-clockwise direction, ties being broken by element index. `angle` is not
/// called when there are less than 2 elements to sort.
#[must_use]
pub fn order_boundary_path<F: FnMut(usize) -> f64>(
    ends: [usize; 2],
    cells: &[usize],
    mut angle: F,
) -> Vec<usize> {
    let [first, last] = ends;
    if first == last {
        return vec![first];
    }

    let mut middle = cells
        .iter()
        .copied()
        .filter(|&i| i != first && i != last)
        .collect::<Vec<_>>();
    if middle.len() > 1 {
        let a0 = angle(first);
        let mut tmp = middle
            .iter()
            .map(|&i| ((angle(i) - a0).rem_euclid(TAU), i))
            .collect::<Vec<_>>();
        tmp.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));
        middle = tmp.into_iter().map(|(_, i)| i).collect();
    }

    let mut res = Vec::with_capacity(middle.len() + 2);
    res.push(first);
    res.extend(middle);
    res.push(last);
    res
}

/// Construction of the dual faces
pub struct DualFaceBuilder<'a, M: PrimalMesh> {
    pub(super) msh: &'a M,
    pub(super) tags: &'a TaggedSets,
    pub(super) index: &'a EdgeIncidenceIndex,
    pub(super) verts: &'a DualVertexFactory,
    ordering: FaceOrdering,
}

impl<'a, M: PrimalMesh> DualFaceBuilder<'a, M> {
    pub const fn new(
        msh: &'a M,
        tags: &'a TaggedSets,
        index: &'a EdgeIncidenceIndex,
        verts: &'a DualVertexFactory,
        ordering: FaceOrdering,
    ) -> Self {
        Self {
            msh,
            tags,
            index,
            verts,
            ordering,
        }
    }

    /// Build all the dual faces: the faces of every edge, in edge order, then the
    /// closure faces of every node, in node order
    pub fn build(&self) -> Result<Vec<DualFace>> {
        let mut res = Vec::with_capacity(self.msh.n_edges());
        for i_edge in 0..self.msh.n_edges() {
            match self.index.kind(i_edge) {
                EdgeKind::Interior => {
                    let nodes = self
                        .ring(i_edge)?
                        .into_iter()
                        .map(DualVertexFactory::cell)
                        .collect();
                    Self::push(&mut res, nodes, DualFaceKind::Interior(i_edge))?;
                }
                EdgeKind::ExternalBoundary => self.boundary_face(i_edge, &mut res)?,
                EdgeKind::Interface => self.interface_faces(i_edge, &mut res)?,
            }
        }
        let n_edge_faces = res.len();

        for i_node in 0..self.msh.n_verts() {
            self.closure_faces(i_node, &mut res)?;
        }

        debug!(
            "Dual faces: {n_edge_faces} from edges, {} closing the boundary cells",
            res.len() - n_edge_faces
        );

        Ok(res)
    }

    pub(super) fn push(
        res: &mut Vec<DualFace>,
        nodes: Vec<usize>,
        kind: DualFaceKind,
    ) -> Result<()> {
        if nodes.len() < 3 {
            return Err(Error::from(&format!(
                "Dual face {kind:?} has less than 3 vertices: {nodes:?}"
            )));
        }
        res.push(DualFace { nodes, kind });
        Ok(())
    }

    /// Vertices of edge `i`, sorted
    pub(super) fn edge(&self, i: usize) -> [usize; 2] {
        let [i0, i1] = self.msh.edge(i);
        [i0.min(i1), i0.max(i1)]
    }

    /// Dual vertex of tagged face `i`
    pub(super) fn face_vert(&self, i: usize) -> Result<usize> {
        Ok(self
            .verts
            .face(i)
            .ok_or_else(|| Error::from(&format!("Face {i} is not tagged")))?)
    }

    /// Dual vertex of model edge `i`
    pub(super) fn edge_vert(&self, i: usize) -> Result<usize> {
        Ok(self
            .verts
            .edge(i)
            .ok_or_else(|| Error::from(&format!("Edge {i} is not a model edge")))?)
    }

    /// Faces of element `i_elem` through which the counter-clockwise rotation around
    /// edge `(a, b)` enters and leaves the element
    fn wedge(&self, i_elem: usize, [a, b]: [usize; 2]) -> [usize; 2] {
        let mut other = [usize::MAX; 2];
        let mut n = 0;
        for i in self.msh.elem(i_elem) {
            if i != a && i != b {
                assert!(n < 2, "element {i_elem} does not contain edge ({a}, {b})");
                other[n] = i;
                n += 1;
            }
        }
        let [mut c, mut d] = other;
        let ge = [a, b, c, d].map(|i| self.msh.vert(i));
        if tet_vol(&ge) < 0.0 {
            std::mem::swap(&mut c, &mut d);
        }

        let mut res = [usize::MAX; 2];
        for i_face in self.msh.elem_faces(i_elem) {
            let f = self.msh.face(i_face);
            if !f.contains(&d) {
                res[0] = i_face;
            } else if !f.contains(&c) {
                res[1] = i_face;
            }
        }
        res
    }

    /// Walk counter-clockwise around edge `i_edge` from element `start` until the
    /// starting element or the boundary is reached. The last face crossed is returned
    /// with the elements.
    fn walk(&self, i_edge: usize, start: usize) -> Result<(Vec<usize>, usize)> {
        let edge = self.edge(i_edge);
        let n = self.index.edge_cells(i_edge).len();

        let mut res = Vec::with_capacity(n);
        let mut cur = start;
        loop {
            res.push(cur);
            let [_, exit] = self.wedge(cur, edge);
            let [e0, e1] = self.msh.face_elems(exit);
            let next = if e0 == cur { e1 } else { e0 };
            if next == usize::MAX || next == start {
                return Ok((res, exit));
            }
            if res.len() == n {
                return Err(Error::from(&format!(
                    "Unable to walk around edge {i_edge} ({edge:?})"
                )));
            }
            cur = next;
        }
    }

    /// Projection on the plane orthogonal to edge `i`
    fn projection(&self, i: usize) -> PlaneProjection {
        let [a, b] = self.edge(i);
        let (pa, pb) = (self.msh.vert(a), self.msh.vert(b));
        PlaneProjection::new(&(pb - pa), &pa)
    }

    fn cell_vert(&self, i_elem: usize) -> Vert3d {
        self.verts.vert(DualVertexFactory::cell(i_elem))
    }

    /// Elements around an edge that is not on the boundary, counter-clockwise and
    /// starting from the lowest element index
    fn ring(&self, i_edge: usize) -> Result<Vec<usize>> {
        let cells = self.index.edge_cells(i_edge);
        let n = cells.len();
        if n < 3 {
            return Err(Error::from(&format!(
                "Interior edge {i_edge} ({:?}) belongs to {n} elements",
                self.edge(i_edge)
            )));
        }

        match self.ordering {
            FaceOrdering::Geometric => {
                let Some(angles) = self.cell_angles(i_edge, cells) else {
                    return self.walk_ring(i_edge);
                };
                let proj = self.projection(i_edge);
                let pts = cells
                    .iter()
                    .map(|&i| proj.project(&self.cell_vert(i)))
                    .collect::<Vec<_>>();
                // the hull is only valid if it turns once around the edge
                let mut ids = convex_hull_order(&pts);
                let n_descents = (0..ids.len())
                    .filter(|&i| angles[ids[(i + 1) % ids.len()]] <= angles[ids[i]])
                    .count();
                if ids.len() != n || n_descents != 1 {
                    ids = (0..n).collect();
                    ids.sort_by(|&i, &j| angles[i].total_cmp(&angles[j]).then(i.cmp(&j)));
                }
                let first = ids.iter().position(|&i| i == 0).unwrap_or(0);
                ids.rotate_left(first);
                Ok(ids.into_iter().map(|i| cells[i]).collect())
            }
            FaceOrdering::Topological => self.walk_ring(i_edge),
        }
    }

    /// Elements around an edge that is not on the boundary, walking from the lowest
    /// element index
    fn walk_ring(&self, i_edge: usize) -> Result<Vec<usize>> {
        let cells = self.index.edge_cells(i_edge);
        let n = cells.len();
        let (res, _) = self.walk(i_edge, cells[0])?;
        if res.len() != n {
            return Err(Error::from(&format!(
                "Edge {i_edge} ({:?}): {} elements reached out of {n}",
                self.edge(i_edge),
                res.len()
            )));
        }
        Ok(res)
    }

    /// Polar angles of the dual vertices of `cells` around edge `i_edge`, or `None`
    /// if one of them is on the edge or two of them have the same direction
    fn cell_angles(&self, i_edge: usize, cells: &[usize]) -> Option<Vec<f64>> {
        let [a, b] = self.edge(i_edge);
        let tol = 1e-10 * (self.msh.vert(b) - self.msh.vert(a)).norm();
        let proj = self.projection(i_edge);

        let mut res = Vec::with_capacity(cells.len());
        for &i in cells {
            let x = proj.project(&self.cell_vert(i));
            if x.norm() < tol {
                return None;
            }
            res.push(x[1].atan2(x[0]));
        }

        let mut sorted = res.clone();
        sorted.sort_by(f64::total_cmp);
        let wrap = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) => first + TAU - last > ANGLE_TOL,
            _ => true,
        };
        let distinct = wrap && sorted.windows(2).all(|w| w[1] - w[0] > ANGLE_TOL);
        distinct.then_some(res)
    }

    /// Face of an external boundary edge: `[f_a, path..., f_b]` where `f_a` and
    /// `f_b` are the dual vertices of the external faces bounding the elements
    /// around the edge, with the dual vertex of the edge added at the end if it is a
    /// model edge
    fn boundary_face(&self, i_edge: usize, res: &mut Vec<DualFace>) -> Result<()> {
        let edge = self.edge(i_edge);
        let cells = self.index.edge_cells(i_edge);
        let faces = self
            .index
            .edge_faces(i_edge)
            .iter()
            .copied()
            .filter(|&i| self.tags.is_external_face(i))
            .collect::<Vec<_>>();
        if faces.len() != 2 {
            return Err(Error::from(&format!(
                "Boundary edge {i_edge} ({edge:?}) belongs to {} external faces",
                faces.len()
            )));
        }

        // endpoints
        let mut first = None;
        let mut last = None;
        for &i_face in &faces {
            let i_elem = self.msh.face_elems(i_face)[0];
            assert!(self.tags.is_external_cell(i_elem));
            let [entry, exit] = self.wedge(i_elem, edge);
            if entry == i_face {
                first = Some((i_face, i_elem));
            } else if exit == i_face {
                last = Some((i_face, i_elem));
            }
        }
        let (Some((f_a, c_a)), Some((f_b, c_b))) = (first, last) else {
            return Err(Error::from(&format!(
                "Inconsistent external faces around edge {i_edge} ({edge:?})"
            )));
        };

        let angles = match self.ordering {
            FaceOrdering::Geometric => self.cell_angles(i_edge, cells),
            FaceOrdering::Topological => None,
        };
        let path = if let Some(angles) = angles {
            order_boundary_path([c_a, c_b], cells, |i| {
                cells.binary_search(&i).map_or(0.0, |k| angles[k])
            })
        } else {
            let (path, exit) = self.walk(i_edge, c_a)?;
            if exit != f_b || path.len() != cells.len() {
                return Err(Error::from(&format!(
                    "Edge {i_edge} ({edge:?}): unable to walk from face {f_a} to face {f_b}"
                )));
            }
            path
        };

        let mut nodes = Vec::with_capacity(path.len() + 3);
        nodes.push(self.face_vert(f_a)?);
        nodes.extend(path.into_iter().map(DualVertexFactory::cell));
        nodes.push(self.face_vert(f_b)?);
        if self.tags.is_model_edge(i_edge) {
            nodes.push(self.edge_vert(i_edge)?);
        }

        Self::push(res, nodes, DualFaceKind::Boundary(i_edge))
    }

    /// Faces of an internal interface edge: the ring of elements around the edge is
    /// split where it crosses the interface, and the two arcs are closed by the dual
    /// vertices of the internal faces crossed (and of the edge if it is a model edge)
    fn interface_faces(&self, i_edge: usize, res: &mut Vec<DualFace>) -> Result<()> {
        let edge = self.edge(i_edge);
        let ring = self.ring(i_edge)?;
        let n = ring.len();

        let mut transitions = Vec::with_capacity(2);
        for i in 0..n {
            let (c0, c1) = (ring[i], ring[(i + 1) % n]);
            if !self.tags.is_interface_cell(c0) || !self.tags.is_interface_cell(c1) {
                continue;
            }
            if let Some(i_face) = self.msh.face_between(c0, c1) {
                if self.tags.is_internal_face(i_face) {
                    transitions.push((i, i_face));
                }
            }
        }
        let &[(i1, f1), (i2, f2)] = transitions.as_slice() else {
            return Err(Error::from(&format!(
                "Interface edge {i_edge} ({edge:?}) crosses the interface {} times",
                transitions.len()
            )));
        };

        let (f1, f2) = (self.face_vert(f1)?, self.face_vert(f2)?);
        let e = if self.tags.is_model_edge(i_edge) {
            Some(self.edge_vert(i_edge)?)
        } else {
            None
        };

        let arc = ring[i1 + 1..=i2].iter().copied();
        let mut nodes = vec![f1];
        nodes.extend(arc.map(DualVertexFactory::cell));
        nodes.push(f2);
        nodes.extend(e);
        Self::push(res, nodes, DualFaceKind::Interface(i_edge))?;

        let arc = ring[i2 + 1..].iter().chain(ring[..=i1].iter()).copied();
        let mut nodes = vec![f2];
        nodes.extend(arc.map(DualVertexFactory::cell));
        nodes.push(f1);
        nodes.extend(e);
        Self::push(res, nodes, DualFaceKind::Interface(i_edge))
    }
}

#[cfg(test)]
mod tests {
    use super::{DualFace, DualFaceBuilder, DualFaceKind, FaceOrdering, order_boundary_path};
    use crate::{
        Result, Vert3d,
        dual::{DualVertexFactory, EdgeIncidenceIndex, ModelTags, TaggedSets},
        geometry::polygon_normal,
        mesh::{
            PrimalMesh, TetMesh,
            test_meshes::{
                box_mesh, move_interior_nodes, stellated_tet, tag_block_interface, tag_features,
            },
        },
    };
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::{cell::Cell, f64::consts::PI};

    fn build_faces(
        msh: &TetMesh,
        tags: &ModelTags,
        ordering: FaceOrdering,
    ) -> Result<Vec<DualFace>> {
        let sets = TaggedSets::new(msh, tags)?;
        let index = EdgeIncidenceIndex::new(msh, &sets)?;
        let verts = DualVertexFactory::new(msh, &sets);
        DualFaceBuilder::new(msh, &sets, &index, &verts, ordering).build()
    }

    #[test]
    fn test_path_two_cells() {
        let calls = Cell::new(0);
        let path = order_boundary_path([7, 3], &[3, 7], |_| {
            calls.set(calls.get() + 1);
            0.0
        });
        assert_eq!(path, [7, 3]);
        assert_eq!(calls.get(), 0);

        let path = order_boundary_path([7, 3], &[3, 5, 7], |_| {
            calls.set(calls.get() + 1);
            0.0
        });
        assert_eq!(path, [7, 5, 3]);
        assert_eq!(calls.get(), 0);

        let path = order_boundary_path([2, 2], &[2], |_| {
            calls.set(calls.get() + 1);
            0.0
        });
        assert_eq!(path, [2]);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_path_sorted() {
        // angles relative to the first element, counter-clockwise
        let angles = [3.0, 2.5, -3.0, -2.0, 0.5, 2.5];
        let path = order_boundary_path([0, 3], &[0, 1, 2, 3, 4, 5], |i| angles[i]);
        assert_eq!(path, [0, 2, 4, 1, 5, 3]);
    }

    fn stellated(ordering: FaceOrdering) -> Result<()> {
        let mut msh = stellated_tet()?;
        tag_features(&mut msh, 30.0);
        let tags = ModelTags::new(&["boundary"], &[], &["ridges"], &["corners"]);
        let sets = TaggedSets::new(&msh, &tags)?;
        let index = EdgeIncidenceIndex::new(&msh, &sets)?;
        let verts = DualVertexFactory::new(&msh, &sets);
        let faces = DualFaceBuilder::new(&msh, &sets, &index, &verts, ordering).build()?;

        assert_eq!(faces.len(), 22);
        for (i_edge, f) in faces.iter().take(10).enumerate() {
            let [a, b] = msh.edge(i_edge);
            let t = msh.vert(b) - msh.vert(a);
            let pts = f.nodes.iter().map(|&i| verts.vert(i)).collect::<Vec<_>>();
            if a == 4 || b == 4 {
                assert_eq!(f.kind, DualFaceKind::Interior(i_edge));
                assert_eq!(f.nodes.len(), 3);
            } else {
                assert_eq!(f.kind, DualFaceKind::Boundary(i_edge));
                // [f_a, c_a, c_b, f_b, e]
                assert_eq!(f.nodes.len(), 5);
                assert_eq!(f.nodes[4], verts.edge(i_edge).unwrap());
                // the external faces of the endpoints
                for (k, l) in [(0, 1), (3, 2)] {
                    let i_elem = f.nodes[l];
                    let i_face = msh
                        .elem_faces(i_elem)
                        .into_iter()
                        .find(|&i| verts.face(i) == Some(f.nodes[k]));
                    assert!(i_face.is_some());
                }
            }
            assert!(polygon_normal(&pts).dot(&t) > 0.0);
        }
        for (i, f) in faces.iter().skip(10).enumerate() {
            assert_eq!(f.kind, DualFaceKind::Closure(i / 3));
            assert_eq!(f.nodes.len(), 4);
            assert_eq!(f.nodes[0], verts.node(i / 3).unwrap());
            let n = polygon_normal(&f.nodes.iter().map(|&i| verts.vert(i)).collect::<Vec<_>>());
            assert!(n.dot(&msh.vert(i / 3)) > 0.0);
        }

        Ok(())
    }

    #[test]
    fn test_stellated_geometric() -> Result<()> {
        stellated(FaceOrdering::Geometric)
    }

    #[test]
    fn test_stellated_topological() -> Result<()> {
        stellated(FaceOrdering::Topological)
    }

    #[test]
    fn test_box_coincident() -> Result<()> {
        let mut msh = box_mesh(1.0, 3, 1.0, 3, 1.0, 3)?;
        tag_features(&mut msh, 30.0);
        let tags = ModelTags::new(&["boundary"], &[], &["ridges"], &["corners"]);

        // the 6 elements of a hexahedron share their circumcenter
        let faces = build_faces(&msh, &tags, FaceOrdering::Topological)?;
        assert_eq!(build_faces(&msh, &tags, FaceOrdering::Geometric)?, faces);

        // the main diagonal of the hexahedra belong to 6 elements
        let i_edge = msh.edge_index(0, 13).unwrap();
        let f = faces
            .iter()
            .find(|f| f.kind == DualFaceKind::Interior(i_edge))
            .unwrap();
        assert_eq!(f.nodes.len(), 6);

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
        let tags = ModelTags::new(&["boundary"], &[], &["ridges"], &["corners"]);

        let faces = build_faces(&msh, &tags, FaceOrdering::Geometric)?;
        assert_eq!(build_faces(&msh, &tags, FaceOrdering::Topological)?, faces);

        Ok(())
    }

    #[test]
    fn test_boundary_fan() -> Result<()> {
        // 4 elements around edge (0, 1), on one side of the plane y = 0
        let mut verts = vec![Vert3d::new(0.0, 0.0, 0.0), Vert3d::new(0.0, 0.0, 1.0)];
        verts.extend((0..5_i32).map(|i| {
            let a = f64::from(i) * PI / 4.0;
            Vert3d::new(a.cos(), a.sin(), 0.0)
        }));
        let elems = (0..4).map(|i| [0, 1, i + 2, i + 3]).collect();
        let mut msh = TetMesh::new(verts, elems)?;
        tag_features(&mut msh, 30.0);
        let tags = ModelTags::new(&["boundary"], &[], &["ridges"], &["corners"]);

        let faces = build_faces(&msh, &tags, FaceOrdering::Geometric)?;
        assert_eq!(build_faces(&msh, &tags, FaceOrdering::Topological)?, faces);

        let i_edge = msh.edge_index(0, 1).unwrap();
        let f = faces
            .iter()
            .find(|f| f.kind == DualFaceKind::Boundary(i_edge))
            .unwrap();
        assert_eq!(f.nodes[1..5], [0, 1, 2, 3]);

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
        let sets = TaggedSets::new(&msh, &tags)?;
        let index = EdgeIncidenceIndex::new(&msh, &sets)?;
        let verts = DualVertexFactory::new(&msh, &sets);
        let faces =
            DualFaceBuilder::new(&msh, &sets, &index, &verts, FaceOrdering::Topological)
                .build()?;

        let n_edges = msh.n_edges();
        let mut count = vec![0; n_edges];
        for f in &faces {
            match f.kind {
                DualFaceKind::Interior(i) | DualFaceKind::Boundary(i) => count[i] += 1,
                DualFaceKind::Interface(i) => {
                    count[i] += 1;
                    let first = f.nodes[0];
                    let last = f.nodes[f.nodes.len() - 1];
                    assert!(first >= msh.n_elems() && last >= msh.n_elems());
                }
                DualFaceKind::Closure(_) => {}
            }
        }
        for (i_edge, &c) in count.iter().enumerate() {
            if sets.internal_faces().iter().any(|&i| msh.face_edges(i).contains(&i_edge)) {
                assert_eq!(c, 2);
            } else {
                assert_eq!(c, 1);
            }
        }

        // the interface faces are split in two
        let mut internal = 0;
        for f in &faces {
            if let DualFaceKind::Interface(_) = f.kind {
                internal += f.nodes.iter().filter(|&&i| i >= msh.n_elems()).count();
            }
        }
        assert_eq!(internal, 72 * 4);

        Ok(())
    }
}
