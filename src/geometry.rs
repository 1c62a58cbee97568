//! Geometric primitives used to place and order the dual vertices
use crate::{Vert2d, Vert3d, Vertex};
use nalgebra::{DMatrix, DVector, SMatrix, SVector};

/// Get the barycentric coordinates of the circumcenter
#[must_use]
pub fn circumcenter_bcoords<const D: usize, const C: usize>(v: &[Vertex<D>; C]) -> [f64; C] {
    assert!(C <= D + 1);

    let mut a = DMatrix::<f64>::zeros(C + 1, C + 1);
    let mut b = DVector::<f64>::zeros(C + 1);

    for i in 0..C {
        for j in i..C {
            a[(C + 1) * i + j] = 2.0 * v[i].dot(&v[j]);
            a[(C + 1) * j + i] = a[(C + 1) * i + j];
        }
        b[i] = v[i].dot(&v[i]);
    }
    b[C] = 1.0;
    let j = C;
    for i in 0..C {
        a[(C + 1) * i + j] = 1.0;
        a[(C + 1) * j + i] = 1.0;
    }

    a.lu().solve_mut(&mut b);

    let mut res = [0.0; C];
    for (i, &v) in b.iter().take(C).enumerate() {
        res[i] = v;
    }
    res
}

/// Point with barycentric coordinates `bcoords` in the simplex `v`
#[must_use]
pub fn bcoords_vertex<const D: usize, const C: usize>(
    v: &[Vertex<D>; C],
    bcoords: &[f64; C],
) -> Vertex<D> {
    v.iter()
        .zip(bcoords.iter())
        .fold(Vertex::<D>::zeros(), |acc, (p, &w)| acc + w * p)
}

/// Signed volume of a tetrahedron, positive if `(v1 - v0, v2 - v0, v3 - v0)` is direct
#[must_use]
pub fn tet_vol(v: &[Vert3d; 4]) -> f64 {
    let e1 = v[1] - v[0];
    let e2 = v[2] - v[0];
    let e3 = v[3] - v[0];

    e3.dot(&e1.cross(&e2)) / 6.0
}

/// Barycentric coordinates of `p` in tetrahedron `v`, `None` if `v` is degenerate
#[must_use]
pub fn tet_bcoords(v: &[Vert3d; 4], p: &Vert3d) -> Option<[f64; 4]> {
    let a = SMatrix::<f64, 4, 4>::new(
        1.0, 1.0, 1.0, 1.0, v[0][0], v[1][0], v[2][0], v[3][0], v[0][1], v[1][1], v[2][1],
        v[3][1], v[0][2], v[1][2], v[2][2], v[3][2],
    );
    let b = SVector::<f64, 4>::new(1., p[0], p[1], p[2]);
    let x = a.lu().solve(&b)?;
    Some([x[0], x[1], x[2], x[3]])
}

/// Check if `p` lies in tetrahedron `v` (up to a tolerance on the barycentric coordinates)
#[must_use]
pub fn point_in_tet(v: &[Vert3d; 4], p: &Vert3d, tol: f64) -> bool {
    tet_bcoords(v, p).is_some_and(|b| b.iter().all(|&x| x > -tol))
}

/// Closest point to `p` on triangle `(a, b, c)`
///
/// C. Ericson, Real-Time Collision Detection, section 5.1.5
fn nearest_point_on_triangle(p: &Vert3d, a: &Vert3d, b: &Vert3d, c: &Vert3d) -> Vert3d {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let t = d1 / (d1 - d3);
        return a + t * ab;
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let t = d2 / (d2 - d6);
        return a + t * ac;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let t = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + t * (c - b);
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + v * ab + w * ac
}

/// Point of tetrahedron `v` closest to `p` (`p` itself if it lies inside)
#[must_use]
pub fn nearest_point_in_tet(v: &[Vert3d; 4], p: &Vert3d) -> Vert3d {
    if tet_bcoords(v, p).is_some_and(|b| b.iter().all(|&x| x >= 0.0)) {
        return *p;
    }

    [[1, 2, 3], [2, 0, 3], [0, 1, 3], [0, 2, 1]]
        .iter()
        .map(|f| nearest_point_on_triangle(p, &v[f[0]], &v[f[1]], &v[f[2]]))
        .min_by(|x, y| (x - p).norm_squared().total_cmp(&(y - p).norm_squared()))
        .unwrap_or(*p)
}

/// Location of the dual vertex of a tetrahedron: its circumcenter, or the point of
/// the tetrahedron closest to it if the circumcenter lies outside
#[must_use]
pub fn cell_dual_center(v: &[Vert3d; 4]) -> Vert3d {
    let bcoords = circumcenter_bcoords(v);
    let center = bcoords_vertex(v, &bcoords);
    if bcoords.iter().all(|&x| x >= 0.0) {
        center
    } else {
        nearest_point_in_tet(v, &center)
    }
}

/// Area vector of a (possibly non planar) polygon, computed using Newell's formula
#[must_use]
pub fn polygon_normal(pts: &[Vert3d]) -> Vert3d {
    let n = pts.len();
    (0..n).fold(Vert3d::zeros(), |acc, i| {
        acc + 0.5 * pts[i].cross(&pts[(i + 1) % n])
    })
}

/// Projection onto the plane orthogonal to a direction
///
/// The 2d basis `(u, v)` satisfies `u x v = n`, so counter-clockwise angles in the
/// plane correspond to a direct rotation around `n`
#[derive(Clone, Copy, Debug)]
pub struct PlaneProjection {
    origin: Vert3d,
    u: Vert3d,
    v: Vert3d,
}

impl PlaneProjection {
    /// Create the projection onto the plane with normal `normal` going through `origin`
    #[must_use]
    pub fn new(normal: &Vert3d, origin: &Vert3d) -> Self {
        let n = normal.normalize();
        let i = n.iamin();
        let mut tmp = Vert3d::zeros();
        tmp[i] = 1.0;
        let u = tmp.cross(&n).normalize();
        let v = n.cross(&u);
        Self {
            origin: *origin,
            u,
            v,
        }
    }

    /// 2d coordinates of the projection of `p`
    #[must_use]
    pub fn project(&self, p: &Vert3d) -> Vert2d {
        let d = p - self.origin;
        Vert2d::new(d.dot(&self.u), d.dot(&self.v))
    }

    /// Polar angle of the projection of `p`, in `[-pi, pi]`
    #[must_use]
    pub fn angle(&self, p: &Vert3d) -> f64 {
        let x = self.project(p);
        x[1].atan2(x[0])
    }
}

fn orient_2d(p: &Vert2d, q: &Vert2d, r: &Vert2d) -> f64 {
    (q[0] - p[0]) * (r[1] - p[1]) - (q[1] - p[1]) * (r[0] - p[0])
}

/// Order the vertices of the convex hull of a set of points counter-clockwise
/// (gift wrapping). Points strictly inside the hull, on its edges or duplicated are
/// not part of the result. The first vertex is the leftmost point (lowest index on ties).
#[must_use]
pub fn convex_hull_order(pts: &[Vert2d]) -> Vec<usize> {
    let n = pts.len();
    if n < 3 {
        return (0..n).collect();
    }

    let start = (0..n)
        .min_by(|&i, &j| {
            pts[i][0]
                .total_cmp(&pts[j][0])
                .then(pts[i][1].total_cmp(&pts[j][1]))
                .then(i.cmp(&j))
        })
        .unwrap_or(0);

    let mut res = Vec::with_capacity(n);
    let mut p = start;
    loop {
        res.push(p);
        let mut q = (p + 1) % n;
        for r in 0..n {
            if r == p {
                continue;
            }
            let o = orient_2d(&pts[p], &pts[q], &pts[r]);
            let further = (pts[r] - pts[p]).norm_squared() > (pts[q] - pts[p]).norm_squared();
            if o < 0.0 || (o <= 0.0 && further) {
                q = r;
            }
        }
        p = q;
        if p == start || res.len() > n {
            break;
        }
    }
    res
}
