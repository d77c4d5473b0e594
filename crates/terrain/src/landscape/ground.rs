//! Ground sample and object marker generation.

use log::debug;

use super::{Landscape, HEIGHT_SCALE};
use crate::element::{Element, ElementKind};
use crate::error::{check_raster_len, TerrainResult};

/// Base pop-in distance for ground samples on the finest grid.
const GROUND_DIST: f32 = 750.0;

impl Landscape {
    /// Generate ground samples from a heightmap and soil map. The landscape
    /// takes ownership of both; they stay authoritative for every later
    /// height lookup.
    ///
    /// Cells are visited at the given strides. Masked cells and cells whose
    /// local curvature stays under `steep_thresh` are skipped, except on the
    /// border, which always seeds samples so a triangulation of the result
    /// reaches the world edge. The pop-in distance grows with the largest
    /// power-of-two grid the cell is aligned to, giving far terrain a
    /// coarse, stable sampling.
    #[allow(clippy::too_many_arguments)]
    pub fn set_height_map(
        &mut self,
        mask: &[u8],
        map: Vec<u16>,
        w: usize,
        h: usize,
        step_x: usize,
        step_z: usize,
        dist_fact: f32,
        steep_thresh: f32,
        soil: Vec<u8>,
    ) -> TerrainResult<()> {
        check_raster_len(mask.len(), w, h)?;
        self.install_field(map, soil, w, h)?;
        let step_x = step_x.max(1);
        let step_z = step_z.max(1);
        let before = self.elements().len();
        // Scan the field while appending elements; hand it back afterwards.
        let field = match self.field.take() {
            Some(f) => f,
            None => return Ok(()),
        };

        let mut z = 0;
        while z < h {
            // Largest power-of-two divisor of the row index.
            let mut tz = h;
            while z % tz != 0 {
                tz >>= 1;
            }
            let mut x = 0;
            while x < w {
                let border =
                    x == 0 || x >= w.saturating_sub(step_x) || z == 0 || z >= h.saturating_sub(step_z);
                if mask[x + z * w] != 0 && !border {
                    x += step_x;
                    continue;
                }
                let v = field.map.at(x, z);
                let vn = field.map.at_clamped(x as i64 - 1, z as i64) as f32;
                let vp = field.map.at_clamped(x as i64 + 1, z as i64) as f32;
                let v_n = field.map.at_clamped(x as i64, z as i64 - 1) as f32;
                let v_p = field.map.at_clamped(x as i64, z as i64 + 1) as f32;
                let cx = (vn + vp) * 0.5 - v as f32;
                let cz = (v_n + v_p) * 0.5 - v as f32;
                let curvature = (cx * cx + cz * cz).sqrt();
                if curvature < steep_thresh && !border {
                    x += step_x;
                    continue;
                }
                let (v0, v1) = field.slope_and_soil(x as i64, z as i64);
                let mut tx = w;
                while x % tx != 0 {
                    tx >>= 1;
                }
                let mut siz = tx as f32 / w as f32;
                let tz_frac = tz as f32 / h as f32;
                if tz_frac < siz {
                    siz = tz_frac;
                }
                siz *= GROUND_DIST * dist_fact;
                if border && (x + z) & 7 == 0 {
                    // Oversized anchors so the outermost ring never pops out.
                    siz = self.span_x() + self.span_z();
                }
                self.push(Element {
                    kind: ElementKind::Height as u8,
                    v0,
                    v1,
                    v2: 0,
                    cutoff_sq: siz * siz,
                    x: self.span_x() * x as f32 / w as f32 + self.min_x(),
                    y: (self.max_y() - self.min_y()) * v as f32 / HEIGHT_SCALE + self.min_y(),
                    z: self.span_z() * z as f32 / h as f32 + self.min_z(),
                });
                x += step_x;
            }
            z += step_z;
        }
        self.field = Some(field);
        debug!(
            "ground: {} samples from {}x{} heightmap",
            self.elements().len() - before,
            w,
            h
        );
        Ok(())
    }

    /// Place object markers from an RGBA raster. `R / 4` (0..63) is the
    /// object type, zero meaning no object; `G / 4` the rotation step; B and
    /// A ride along as extra parameters.
    pub fn set_objects(&mut self, rgba: &[u32], w: usize, h: usize) -> TerrainResult<()> {
        check_raster_len(rgba.len(), w, h)?;
        let before = self.elements().len();
        for z in 0..h {
            for x in 0..w {
                let p = rgba[x + z * w];
                let p0 = ((p & 255) / 4) as u8;
                if p0 == 0 {
                    continue;
                }
                let p1 = ((p >> 8) & 255) as u8 / 4;
                let p2 = ((p >> 16) & 255) as u8 / 4;
                let px = self.span_x() * x as f32 / w as f32 + self.min_x();
                let pz = self.span_z() * z as f32 / h as f32 + self.min_z();
                let py = self.height(px, pz);
                let mut siz = (self.span_x() + self.span_z()) * 0.05;
                // Landmark pieces stay visible from much farther away.
                if matches!(p0 - 1, 3 | 4) {
                    siz *= 3.0;
                }
                self.push(Element {
                    kind: ElementKind::Object as u8,
                    v0: p0,
                    v1: p1,
                    v2: p2,
                    cutoff_sq: siz * siz,
                    x: px,
                    y: py,
                    z: pz,
                });
            }
        }
        debug!("objects: {} markers placed", self.elements().len() - before);
        Ok(())
    }

    /// Insert a blank ground sample at a fractional raster coordinate of a
    /// `w * h` layer. Pads like this close up a triangulated region: border
    /// rings around the world, or interior rings just outside a contour.
    /// `cutoff_sq` is taken verbatim.
    pub fn insert_pad(&mut self, col: f32, row: f32, w: usize, h: usize, cutoff_sq: f32) {
        let x = self.span_x() * col / w as f32 + self.min_x();
        let z = self.span_z() * row / h as f32 + self.min_z();
        let y = self.height(x, z);
        let (v0, v1) = match self.field() {
            Some(field) => {
                let c = field.map.to_col(x as f64);
                let r = field.map.to_row(z as f64);
                field.slope_and_soil(c, r)
            }
            None => (128, 0),
        };
        self.push(Element {
            kind: ElementKind::Height as u8,
            v0,
            v1,
            v2: 0,
            cutoff_sq,
            x,
            y,
            z,
        });
    }
}
