//! Contour extraction: stones, water and roads.
//!
//! These layers arrive as u8 scalar fields. An element is emitted wherever
//! a cell reaches the outer threshold while at least one axis neighbor does
//! not, i.e. exactly on the boundary, with `hit_thresh` refining the
//! position to subcell accuracy. A second, lower cleanup threshold rings the
//! region with blank ground pads so the triangulation closes over the
//! interior.

use log::debug;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{mound, ripple, stencil5, Landscape};
use crate::element::{Element, ElementKind};
use crate::error::{check_raster_len, TerrainResult};

const STONE_DIST: f32 = 250.0;
const WATER_DIST: f32 = 400.0;
const ROAD_DIST: f32 = 500.0;

/// Subcell position of `thresh` within the cell (left, center, right),
/// where -1 is the left neighbor, 0 the center and 1 the right neighbor.
/// The center is assumed to be at or above the threshold.
pub fn hit_thresh(center: f32, left: f32, right: f32, thresh: f32) -> f32 {
    if left < thresh {
        let dist0 = left - thresh;
        let dist1 = center - thresh;
        let k = -dist0 + dist1;
        if k == 0.0 {
            return 0.0;
        }
        return -dist0 / k - 1.0;
    }
    if right < thresh {
        let dist0 = center - thresh;
        let dist1 = right - thresh;
        let k = -dist0 + dist1;
        if k == 0.0 {
            return 0.0;
        }
        return -dist0 / k;
    }
    0.0
}

/// Outer-boundary test: the cell is inside, some axis neighbor is not.
#[inline]
fn on_boundary(s: &[u8; 5], thresh: u8) -> bool {
    s[0] >= thresh && (s[1] < thresh || s[2] < thresh || s[3] < thresh || s[4] < thresh)
}

/// Subcell offsets of the threshold crossing in X and Z.
#[inline]
fn boundary_offsets(s: &[u8; 5], thresh: u8) -> (f32, f32) {
    let t = thresh as f32;
    (
        hit_thresh(s[0] as f32, s[1] as f32, s[2] as f32, t),
        hit_thresh(s[0] as f32, s[3] as f32, s[4] as f32, t),
    )
}

impl Landscape {
    /// Trace stone outlines and raise the heightmap inside them.
    ///
    /// The first pass walks the heightmap and lifts every cell covered by
    /// the stone field, using the bump field plus a small random factor so
    /// the rock tops stay irregular. The second pass emits Stone elements
    /// on the outer contour and cleanup pads on the lower one.
    pub fn set_stones(
        &mut self,
        map: &[u8],
        w: usize,
        h: usize,
        thresh_outer: u8,
        thresh_cleanup: u8,
    ) -> TerrainResult<()> {
        check_raster_len(map.len(), w, h)?;
        let before = self.elements().len();

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let (hm_w, hm_h) = self.height_map_size();
        for z in 0..hm_h {
            for x in 0..hm_w {
                let r2 = rng.next_u32() & 255;
                let rx = x * w / hm_w;
                let rz = z * h / hm_h;
                if map[rx + rz * w] >= thresh_outer {
                    let ex = self.span_x() * x as f32 / hm_w as f32 + self.min_x();
                    let ez = self.span_z() * z as f32 / hm_h as f32 + self.min_z();
                    let f = (mound(ex * 0.1, ez * 0.1) + 0.2)
                        * 3.0
                        * (1.0 + r2 as f32 / 255.0 * 0.25);
                    let y = self.height(ex, ez) + f;
                    self.put_height(ex, ez, y);
                }
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for z in 0..h {
            for x in 0..w {
                let r1 = (rng.next_u32() & 255) as u8;
                let s = stencil5(map, x, z, w, h);
                let gx = (s[2] as f32 - s[1] as f32) / 255.0;
                let gz = (s[4] as f32 - s[3] as f32) / 255.0;
                let grad = (gx * gx + gz * gz) * 9.0;
                let siz = STONE_DIST * (grad * 2.0 + 0.01);
                let d = siz * siz;
                if on_boundary(&s, thresh_outer) {
                    let (xd, zd) = boundary_offsets(&s, thresh_outer);
                    let px = self.span_x() * (x as f32 + xd) / w as f32 + self.min_x();
                    let pz = self.span_z() * (z as f32 + zd) / h as f32 + self.min_z();
                    let py = self.height(px, pz);
                    self.push(Element {
                        kind: ElementKind::Stone as u8,
                        v0: r1,
                        v1: 0,
                        v2: 0,
                        cutoff_sq: d,
                        x: px,
                        y: py,
                        z: pz,
                    });
                }
                if on_boundary(&s, thresh_cleanup) {
                    let (xd, zd) = boundary_offsets(&s, thresh_cleanup);
                    self.insert_pad(x as f32 + xd, z as f32 + zd, w, h, d);
                }
            }
        }
        debug!("stones: {} elements traced", self.elements().len() - before);
        Ok(())
    }

    /// Trace water outlines. Nearly straight shoreline runs carry tiny
    /// gradients and pop in late; busy corners pop in early, which keeps the
    /// silhouette stable while the camera closes in.
    pub fn set_water(
        &mut self,
        map: &[u8],
        w: usize,
        h: usize,
        thresh_outer: u8,
        thresh_cleanup: u8,
    ) -> TerrainResult<()> {
        check_raster_len(map.len(), w, h)?;
        let before = self.elements().len();
        for z in 0..h {
            for x in 0..w {
                let s = stencil5(map, x, z, w, h);
                let gx = (s[2] as f32 - s[1] as f32) / 255.0;
                let gz = (s[4] as f32 - s[3] as f32) / 255.0;
                let mut grad = (gx * gx + gz * gz) * 9.0;
                grad = grad * grad * 9.0;
                grad = grad * grad * 9.0;
                let siz = WATER_DIST * (grad * 3.0 + 0.01);
                let d = siz * siz;
                if on_boundary(&s, thresh_outer) {
                    let (xd, zd) = boundary_offsets(&s, thresh_outer);
                    let px = self.span_x() * (x as f32 + xd) / w as f32 + self.min_x();
                    let pz = self.span_z() * (z as f32 + zd) / h as f32 + self.min_z();
                    let py = self.height(px, pz);
                    self.push(Element {
                        kind: ElementKind::Water as u8,
                        v0: 0,
                        v1: 0,
                        v2: 0,
                        cutoff_sq: d,
                        x: px,
                        y: py,
                        z: pz,
                    });
                }
                if on_boundary(&s, thresh_cleanup) {
                    let (xd, zd) = boundary_offsets(&s, thresh_cleanup);
                    self.insert_pad(x as f32 + xd, z as f32 + zd, w, h, d);
                }
            }
        }
        debug!("water: {} elements traced", self.elements().len() - before);
        Ok(())
    }

    /// Trace roads and carve them slightly into the heightmap.
    ///
    /// Roads use two nested contours: the outer edge (bare, v0 = 0) and an
    /// inner band whose v0 carries ripple shading for the wheel-worn
    /// surface. Both sprinkle occasional grass tufts along the verge, and a
    /// much wider cleanup contour pads the triangulation.
    pub fn set_roads(
        &mut self,
        map: &[u8],
        w: usize,
        h: usize,
        thresh_outer: u8,
        thresh_inner: u8,
        thresh_cleanup: u8,
    ) -> TerrainResult<()> {
        check_raster_len(map.len(), w, h)?;
        let before = self.elements().len();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let (hm_w, hm_h) = self.height_map_size();
        for z in 0..hm_h {
            for x in 0..hm_w {
                let rx = x * w / hm_w;
                let rz = z * h / hm_h;
                if map[rx + rz * w] >= thresh_outer {
                    let px = self.span_x() * x as f32 / hm_w as f32 + self.min_x();
                    let pz = self.span_z() * z as f32 / hm_h as f32 + self.min_z();
                    let f = ripple(px, pz) * 0.5 + 0.5;
                    let y = self.height(px, pz) - f * 0.25;
                    self.put_height(px, pz, y);
                }
            }
        }

        for z in 0..h {
            for x in 0..w {
                let s = stencil5(map, x, z, w, h);
                let gx = (s[2] as f32 - s[1] as f32) / 255.0;
                let gz = (s[4] as f32 - s[3] as f32) / 255.0;
                let grad = (gx * gx + gz * gz) * 9.0;
                let siz = ROAD_DIST * (grad * 3.0 + 0.01);
                let d = siz * siz;
                if on_boundary(&s, thresh_outer) {
                    let (xd, zd) = boundary_offsets(&s, thresh_outer);
                    let px = self.span_x() * (x as f32 + xd) / w as f32 + self.min_x();
                    let pz = self.span_z() * (z as f32 + zd) / h as f32 + self.min_z();
                    let py = self.height(px, pz);
                    self.push(Element {
                        kind: ElementKind::Road as u8,
                        v0: 0,
                        v1: 0,
                        v2: 0,
                        cutoff_sq: d,
                        x: px,
                        y: py,
                        z: pz,
                    });
                    if rng.next_u32() & 7 == 0 {
                        self.push_verge_grass(px, pz, 200, &mut rng);
                    }
                }
                if on_boundary(&s, thresh_inner) {
                    let (xd, zd) = boundary_offsets(&s, thresh_inner);
                    let px = self.span_x() * (x as f32 + xd) / w as f32 + self.min_x();
                    let pz = self.span_z() * (z as f32 + zd) / h as f32 + self.min_z();
                    let py = self.height(px, pz);
                    let f = ripple(px, pz) * 0.5 + 0.5;
                    self.push(Element {
                        kind: ElementKind::Road as u8,
                        v0: (f * 255.0) as u8,
                        v1: 0,
                        v2: 0,
                        cutoff_sq: d,
                        x: px,
                        y: py,
                        z: pz,
                    });
                    if rng.next_u32() & 15 == 0 {
                        self.push_verge_grass(px, pz, 100, &mut rng);
                    }
                }
                if on_boundary(&s, thresh_cleanup) {
                    let (xd, zd) = boundary_offsets(&s, thresh_cleanup);
                    self.insert_pad(x as f32 + xd, z as f32 + zd, w, h, d);
                }
            }
        }
        debug!("roads: {} elements traced", self.elements().len() - before);
        Ok(())
    }

    /// A grass tuft on the road verge, sized for the outer or inner band.
    fn push_verge_grass(&mut self, px: f32, pz: f32, size: u8, rng: &mut ChaCha8Rng) {
        let py = self.height(px, pz);
        let v0 = (rng.next_u32() % 4) as u8 + 16;
        let siz = 200.0 * ((rng.next_u32() & 255) as f32 / 255.0 * 0.75 + 0.25);
        self.push(Element {
            kind: ElementKind::Grass as u8,
            v0,
            v1: size,
            v2: 0,
            cutoff_sq: siz * siz,
            x: px,
            y: py,
            z: pz,
        });
    }
}
