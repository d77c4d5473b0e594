//! Incremental 2D Delaunay triangulation over a flat point buffer.
//!
//! Bowyer-Watson with a super-triangle: points are inserted one by one, the
//! triangles whose circumcircle contains the new point are carved out, and
//! the cavity boundary is fanned to the point. Triangles touching the
//! super-triangle are dropped from the output, which also makes fully
//! degenerate input (everything collinear, or fewer than three distinct
//! points) come out as an empty triangle list instead of an error.
//!
//! All scratch buffers live on the instance and are reused across calls.

const EPS: f64 = 1e-12;

#[derive(Clone, Copy, Debug)]
struct CircumTri {
    a: u32,
    b: u32,
    c: u32,
    /// Circumcenter and squared radius; infinite radius for collinear
    /// vertices so a later insertion always replaces the sliver.
    cx: f64,
    cz: f64,
    r2: f64,
}

#[derive(Default)]
pub struct Triangulator {
    /// Flat output: three vertex indices per triangle.
    triangles: Vec<u32>,
    /// Working copy of the points plus the three super-triangle vertices.
    pts: Vec<f64>,
    /// Active triangle soup during insertion.
    soup: Vec<CircumTri>,
    /// Cavity boundary edges of the current insertion.
    edges: Vec<(u32, u32)>,
}

impl Triangulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triangulate `[x0, z0, x1, z1, ...]`. The returned slice holds vertex
    /// indices into the input, three per triangle, and stays valid until the
    /// next call.
    pub fn triangulate(&mut self, points: &[f64]) -> &[u32] {
        self.triangles.clear();
        self.soup.clear();
        let n = points.len() / 2;
        if n < 3 {
            return &self.triangles;
        }

        self.pts.clear();
        self.pts.extend_from_slice(&points[..n * 2]);

        // Super-triangle generously enclosing the bounding box.
        let (mut min_x, mut min_z) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_z) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for i in 0..n {
            let (x, z) = (self.pts[i * 2], self.pts[i * 2 + 1]);
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_z = min_z.min(z);
            max_z = max_z.max(z);
        }
        if !min_x.is_finite() || !min_z.is_finite() || !max_x.is_finite() || !max_z.is_finite() {
            return &self.triangles;
        }
        let span = (max_x - min_x).max(max_z - min_z).max(1.0);
        let mid_x = (min_x + max_x) * 0.5;
        let mid_z = (min_z + max_z) * 0.5;
        let s0 = n as u32;
        self.pts.push(mid_x - 20.0 * span);
        self.pts.push(mid_z - span);
        self.pts.push(mid_x);
        self.pts.push(mid_z + 20.0 * span);
        self.pts.push(mid_x + 20.0 * span);
        self.pts.push(mid_z - span);
        self.soup.push(circum(&self.pts, s0, s0 + 1, s0 + 2));

        for p in 0..n as u32 {
            let px = self.pts[p as usize * 2];
            let pz = self.pts[p as usize * 2 + 1];

            // Carve out every triangle whose circumcircle strictly contains
            // p and collect the cavity boundary (edges seen exactly once).
            // The strict test keeps cocircular points from carving beyond
            // their cavity and makes exact duplicates insert as no-ops.
            self.edges.clear();
            let mut i = 0;
            while i < self.soup.len() {
                let t = self.soup[i];
                let dx = px - t.cx;
                let dz = pz - t.cz;
                if dx * dx + dz * dz < t.r2 - EPS {
                    push_unique_edge(&mut self.edges, t.a, t.b);
                    push_unique_edge(&mut self.edges, t.b, t.c);
                    push_unique_edge(&mut self.edges, t.c, t.a);
                    self.soup.swap_remove(i);
                } else {
                    i += 1;
                }
            }
            for k in 0..self.edges.len() {
                let (a, b) = self.edges[k];
                if a == u32::MAX {
                    continue;
                }
                self.soup.push(circum(&self.pts, a, b, p));
            }
        }

        for t in &self.soup {
            if t.r2.is_finite() && t.a < n as u32 && t.b < n as u32 && t.c < n as u32 {
                self.triangles.push(t.a);
                self.triangles.push(t.b);
                self.triangles.push(t.c);
            }
        }
        &self.triangles
    }
}

/// Add an undirected edge, cancelling it out if its twin is already present.
/// Cancelled slots are tombstoned so indices stay stable during the scan.
fn push_unique_edge(edges: &mut Vec<(u32, u32)>, a: u32, b: u32) {
    for e in edges.iter_mut() {
        if (e.0 == a && e.1 == b) || (e.0 == b && e.1 == a) {
            *e = (u32::MAX, u32::MAX);
            return;
        }
    }
    edges.push((a, b));
}

/// Triangle with its circumcircle. Collinear vertices get an infinite
/// radius, marking the triangle for unconditional replacement.
fn circum(pts: &[f64], a: u32, b: u32, c: u32) -> CircumTri {
    let (ax, az) = (pts[a as usize * 2], pts[a as usize * 2 + 1]);
    let (bx, bz) = (pts[b as usize * 2], pts[b as usize * 2 + 1]);
    let (cx, cz) = (pts[c as usize * 2], pts[c as usize * 2 + 1]);
    let d = 2.0 * (ax * (bz - cz) + bx * (cz - az) + cx * (az - bz));
    if d.abs() < EPS {
        return CircumTri {
            a,
            b,
            c,
            cx: 0.0,
            cz: 0.0,
            r2: f64::INFINITY,
        };
    }
    let a2 = ax * ax + az * az;
    let b2 = bx * bx + bz * bz;
    let c2 = cx * cx + cz * cz;
    let ux = (a2 * (bz - cz) + b2 * (cz - az) + c2 * (az - bz)) / d;
    let uz = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;
    let dx = ux - ax;
    let dz = uz - az;
    CircumTri {
        a,
        b,
        c,
        cx: ux,
        cz: uz,
        r2: dx * dx + dz * dz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri_set(tris: &[u32]) -> Vec<[u32; 3]> {
        tris.chunks_exact(3)
            .map(|c| {
                let mut t = [c[0], c[1], c[2]];
                t.sort_unstable();
                t
            })
            .collect()
    }

    #[test]
    fn empty_and_tiny_inputs() {
        let mut t = Triangulator::new();
        assert!(t.triangulate(&[]).is_empty());
        assert!(t.triangulate(&[0.0, 0.0]).is_empty());
        assert!(t.triangulate(&[0.0, 0.0, 1.0, 1.0]).is_empty());
    }

    #[test]
    fn single_triangle() {
        let mut t = Triangulator::new();
        let tris = t.triangulate(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(tris.len(), 3);
        let mut idx: Vec<u32> = tris.to_vec();
        idx.sort_unstable();
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    fn unit_square_splits_into_two() {
        let mut t = Triangulator::new();
        let tris = t
            .triangulate(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0])
            .to_vec();
        assert_eq!(tris.len(), 6);
        let set = tri_set(&tris);
        // The two triangles share the diagonal and cover all four corners.
        let mut seen = [false; 4];
        for tri in &set {
            for &v in tri {
                seen[v as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn collinear_points_yield_nothing() {
        let mut t = Triangulator::new();
        let pts: Vec<f64> = (0..8).flat_map(|i| [i as f64, 2.0 * i as f64]).collect();
        assert!(t.triangulate(&pts).is_empty());
    }

    #[test]
    fn duplicate_points_do_not_panic() {
        let mut t = Triangulator::new();
        let tris = t
            .triangulate(&[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.5, 1.0])
            .to_vec();
        for &i in &tris {
            assert!(i < 5);
        }
    }

    #[test]
    fn grid_point_count_matches_euler() {
        // A 4x4 grid of points triangulates into 2 * (n-1)^2 triangles.
        let mut pts = Vec::new();
        for z in 0..4 {
            for x in 0..4 {
                pts.push(x as f64);
                pts.push(z as f64);
            }
        }
        let mut t = Triangulator::new();
        let tris = t.triangulate(&pts);
        assert_eq!(tris.len() / 3, 18);
    }

    #[test]
    fn circumcircle_property_on_random_cloud() {
        // No input point may fall strictly inside any triangle's
        // circumcircle.
        let mut seed = 0x2545f4914f6cdd1du64;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed >> 11) as f64 / (1u64 << 53) as f64
        };
        let pts: Vec<f64> = (0..60).map(|_| next() * 100.0).collect();
        let mut t = Triangulator::new();
        let tris = t.triangulate(&pts).to_vec();
        assert!(!tris.is_empty());
        for c in tris.chunks_exact(3) {
            let ct = circum(&pts, c[0], c[1], c[2]);
            for i in 0..pts.len() as u32 / 2 {
                if i == c[0] || i == c[1] || i == c[2] {
                    continue;
                }
                let dx = pts[i as usize * 2] - ct.cx;
                let dz = pts[i as usize * 2 + 1] - ct.cz;
                assert!(
                    dx * dx + dz * dz >= ct.r2 - 1e-6,
                    "point {i} inside circumcircle of {:?}",
                    &c
                );
            }
        }
    }
}
