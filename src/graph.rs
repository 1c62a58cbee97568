//! Basic graphs to compute and store connectivities that can not be stored in
//! simple 2d arrays
//!
//! Entries equal to `usize::MAX` are ignored, which allows to transpose only a
//! subset of the elements while keeping their original indices.

/// CSR representation of a graph
#[derive(Debug, Default, Clone)]
pub struct CSRGraph {
    ptr: Vec<usize>,
    indices: Vec<usize>,
    m: usize,
}

impl CSRGraph {
    fn set_ptr<E: IntoIterator<Item = usize> + Copy>(
        elems: impl ExactSizeIterator<Item = E> + Clone,
        n_verts: Option<usize>,
    ) -> Self {
        let nv = n_verts.unwrap_or_else(|| {
            elems
                .clone()
                .flatten()
                .filter(|&i| i != usize::MAX)
                .max()
                .map_or(0, |i| i + 1)
        });
        let n = elems
            .clone()
            .flatten()
            .filter(|&i| i != usize::MAX)
            .count();

        let mut res = Self {
            ptr: vec![0; nv + 1],
            indices: vec![usize::MAX; n],
            m: 0,
        };

        for i in elems.flatten().filter(|&i| i != usize::MAX) {
            res.ptr[i + 1] += 1;
        }

        for i in 0..nv {
            res.ptr[i + 1] += res.ptr[i];
        }

        res
    }

    /// Sort the indices for every vertex in the graph
    pub fn sort(&mut self) {
        let n = self.ptr.len() - 1;
        for i in 0..n {
            let start = self.ptr[i];
            let end = self.ptr[i + 1];
            self.indices[start..end].sort_unstable();
            for j in start + 1..end {
                assert_ne!(self.indices[j], self.indices[j - 1]);
            }
        }
    }

    /// Compute the vertex to element connectivity from an element to vertex connectivity
    ///
    /// `n_verts` is required when the last vertices may not appear in any element
    #[must_use]
    pub fn transpose<E: IntoIterator<Item = usize> + Copy>(
        elems: impl ExactSizeIterator<Item = E> + Clone,
        n_verts: Option<usize>,
    ) -> Self {
        let mut res = Self::set_ptr(elems.clone(), n_verts);
        res.m = elems.len();

        for (i, e) in elems.enumerate() {
            for i_vert in e.into_iter().filter(|&i| i != usize::MAX) {
                let start = res.ptr[i_vert];
                let end = res.ptr[i_vert + 1];
                let slot = res.indices[start..end]
                    .iter_mut()
                    .find(|j| **j == usize::MAX);
                match slot {
                    Some(j) => *j = i,
                    None => unreachable!(),
                }
            }
        }
        res.sort();
        res
    }

    /// Number of vertices
    #[must_use]
    pub const fn n(&self) -> usize {
        self.ptr.len() - 1
    }

    /// Number of columns
    #[must_use]
    pub const fn m(&self) -> usize {
        self.m
    }

    /// Number of edges
    #[must_use]
    pub const fn n_edges(&self) -> usize {
        self.indices.len()
    }

    /// Get the neighbors of the `i`th vertex
    #[must_use]
    pub fn row(&self, i: usize) -> &[usize] {
        let start = self.ptr[i];
        let end = self.ptr[i + 1];
        &self.indices[start..end]
    }

    /// Sequential iterator over the rows
    #[must_use]
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[usize]> {
        (0..self.n()).map(|i| self.row(i))
    }
}
