//! Faces closing the dual cells of the nodes on the external boundary
//!
//! The external faces around a node are ordered counter-clockwise seen from the
//! outside. The model edges through the node split this fan into sectors, each
//! sector giving one dual face.
use super::{DualFace, DualFaceBuilder, DualFaceKind, NodeKind};
use crate::{Error, Result, geometry::tet_vol, mesh::PrimalMesh};
use rustc_hash::FxHashMap;

impl<M: PrimalMesh> DualFaceBuilder<'_, M> {
    /// Edge of face `i_face` between nodes `a` and `b`
    fn face_edge(&self, i_face: usize, a: usize, b: usize) -> Result<usize> {
        Ok(self
            .msh
            .face_edges(i_face)
            .into_iter()
            .find(|&i| {
                let e = self.msh.edge(i);
                (e[0] == a && e[1] == b) || (e[0] == b && e[1] == a)
            })
            .ok_or_else(|| Error::from(&format!("Edge ({a}, {b}) not found in face {i_face}")))?)
    }

    /// External faces around `i_node`, counter-clockwise seen from the outside, and
    /// the edges through which the fan enters each of them
    fn boundary_fan(&self, i_node: usize) -> Result<Vec<(usize, usize)>> {
        let faces = self.index.node_external_faces(i_node);
        let p = self.msh.vert(i_node);

        // (face, previous node, next node)
        let mut fan = Vec::with_capacity(faces.len());
        let mut next = FxHashMap::default();
        for &i_face in faces {
            let f = self.msh.face(i_face);
            let k = f
                .iter()
                .position(|&i| i == i_node)
                .ok_or_else(|| Error::from(&format!("Node {i_node} not in face {i_face}")))?;
            let (mut m, mut q) = (f[(k + 1) % 3], f[(k + 2) % 3]);
            let i_elem = self.msh.face_elems(i_face)[0];
            let r = self
                .msh
                .elem(i_elem)
                .into_iter()
                .find(|i| !f.contains(i))
                .ok_or_else(|| Error::from(&format!("Invalid element {i_elem}")))?;
            let ge = [p, self.msh.vert(m), self.msh.vert(q), self.msh.vert(r)];
            if tet_vol(&ge) > 0.0 {
                std::mem::swap(&mut m, &mut q);
            }
            if next.insert(m, fan.len()).is_some() {
                return Err(Error::from(&format!(
                    "Non manifold boundary around node {i_node}"
                )));
            }
            fan.push((i_face, m, q));
        }

        let is_model = fan
            .iter()
            .map(|&(i_face, m, _)| {
                self.face_edge(i_face, i_node, m)
                    .map(|i_edge| self.tags.is_model_edge(i_edge).then_some(i_edge))
            })
            .collect::<Result<Vec<_>>>()?;

        let start = is_model.iter().position(Option::is_some).unwrap_or(0);
        let mut order = Vec::with_capacity(fan.len());
        let mut cur = start;
        loop {
            order.push(cur);
            let Some(&i) = next.get(&fan[cur].2) else {
                return Err(Error::from(&format!(
                    "Open boundary around node {i_node}"
                )));
            };
            if i == start {
                break;
            }
            if order.len() == fan.len() {
                return Err(Error::from(&format!(
                    "Non manifold boundary around node {i_node}"
                )));
            }
            cur = i;
        }
        if order.len() != fan.len() {
            return Err(Error::from(&format!(
                "Non manifold boundary around node {i_node}: {} faces reached out of {}",
                order.len(),
                fan.len()
            )));
        }

        Ok(order
            .into_iter()
            .map(|i| (fan[i].0, is_model[i].unwrap_or(usize::MAX)))
            .collect())
    }

    /// Triangles `[center, ring[j], ring[j + 1]]` closing the polygon `ring`
    fn triangle_fan(
        res: &mut Vec<DualFace>,
        center: usize,
        ring: &[usize],
        kind: DualFaceKind,
    ) -> Result<()> {
        for (j, &i) in ring.iter().enumerate() {
            Self::push(res, vec![center, i, ring[(j + 1) % ring.len()]], kind)?;
        }
        Ok(())
    }

    /// Closure faces of node `i_node`, with `k` the number of model edges through
    /// the node on the external boundary:
    ///  - `k = 0`: the dual vertices of the external faces around the node
    ///  - `k = 1`: the dual vertex of the model edge followed by the external faces
    ///  - `k >= 2`: `[e_i, faces..., e_i+1]` for every sector, starting with the dual
    ///    vertex of the node if it is a model vertex; if it is not and `k >= 3`, an
    ///    additional face `[e_1, ..., e_k]`
    ///
    /// For a model vertex with `k < 2`, the polygon of the first two cases is split
    /// into triangles sharing the dual vertex of the node.
    pub(super) fn closure_faces(&self, i_node: usize, res: &mut Vec<DualFace>) -> Result<()> {
        let node_kind = self.tags.node_kind(i_node);
        // nodes on the internal interfaces only are closed by the interface faces
        if node_kind == NodeKind::Interior
            || self.index.node_external_faces(i_node).is_empty()
        {
            return Ok(());
        }

        let fan = self.boundary_fan(i_node)?;
        let kind = DualFaceKind::Closure(i_node);

        let breaks = (0..fan.len())
            .filter(|&i| fan[i].1 != usize::MAX)
            .collect::<Vec<_>>();
        let k = breaks.len();

        let edge_verts = breaks
            .iter()
            .map(|&i| self.edge_vert(fan[i].1))
            .collect::<Result<Vec<_>>>()?;
        let node_vert = if node_kind == NodeKind::Vertex {
            let i = self
                .verts
                .node(i_node)
                .ok_or_else(|| Error::from(&format!("Node {i_node} is not a model vertex")))?;
            Some(i)
        } else {
            None
        };

        if k < 2 {
            let mut ring = edge_verts;
            for &(i_face, _) in &fan {
                ring.push(self.face_vert(i_face)?);
            }
            return match node_vert {
                Some(i_vert) => Self::triangle_fan(res, i_vert, &ring, kind),
                None => Self::push(res, ring, kind),
            };
        }

        for s in 0..k {
            let end = if s + 1 < k { breaks[s + 1] } else { fan.len() };
            let mut nodes = Vec::with_capacity(end - breaks[s] + 3);
            nodes.extend(node_vert);
            nodes.push(edge_verts[s]);
            for &(i_face, _) in &fan[breaks[s]..end] {
                nodes.push(self.face_vert(i_face)?);
            }
            nodes.push(edge_verts[(s + 1) % k]);
            Self::push(res, nodes, kind)?;
        }

        if k >= 3 && node_vert.is_none() {
            Self::push(res, edge_verts, kind)?;
        }

        Ok(())
    }
}
