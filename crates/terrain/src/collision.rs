//! Coarse 2D collision field for line-vs-obstacle queries.
//!
//! The field is a u8 plane independent of the landscape heightmap. Obstacles
//! are stamped in as discs or resampled masks; a position counts as solid
//! when the bilinear sample reaches 128. Blurring the field widens the
//! gradient band around obstacles, which smooths the normals reported by
//! raycasts.

use glam::Vec2;

use crate::error::TerrainResult;
use crate::grid::Grid;

/// Result of a line raycast: the last free position before the obstacle and
/// the field's gradient normal there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineHit {
    pub pos: Vec2,
    pub normal: Vec2,
}

/// The collision field. Outside its bounds every sample saturates to 255,
/// so the world edge behaves like a wall.
#[derive(Clone, Debug)]
pub struct CollisionField {
    grid: Grid<u8>,
    /// When set, a raycast whose start position is already solid reports no
    /// hit and the ray passes freely. This matches units standing inside an
    /// obstacle footprint being allowed to walk out of it.
    pub pass_through_solid_start: bool,
}

impl CollisionField {
    /// Create a zeroed field over `[x0, x1) x [z0, z1)` with `width * height`
    /// cells.
    pub fn new(
        x0: f32,
        z0: f32,
        x1: f32,
        z1: f32,
        width: usize,
        height: usize,
    ) -> TerrainResult<Self> {
        Ok(Self {
            grid: Grid::new(x0, z0, x1, z1, width, height, 0u8)?,
            pass_through_solid_start: true,
        })
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn data(&self) -> &[u8] {
        self.grid.data()
    }

    /// Stamp a radial falloff disc at world `(x, z)`. The falloff reaches
    /// zero at `2 * rad`, so the sample crosses the solid threshold (128)
    /// right at distance `rad`. Existing values are kept where larger.
    pub fn stamp_disc(&mut self, x: f64, z: f64, rad: f64) {
        let rad2 = rad * 2.0;
        let c0 = self.grid.to_col(x - rad2);
        let r0 = self.grid.to_row(z - rad2);
        let c1 = self.grid.to_col(x + rad2);
        let r1 = self.grid.to_row(z + rad2);
        for r in r0..=r1 {
            if r < 0 || r >= self.grid.height() as i64 {
                continue;
            }
            let dz = (self.grid.from_row(r) - z) / rad2;
            for c in c0..=c1 {
                if c < 0 || c >= self.grid.width() as i64 {
                    continue;
                }
                let dx = (self.grid.from_col(c) - x) / rad2;
                let d = 1.0 - (dx * dx + dz * dz).sqrt();
                if d > 0.0 {
                    let k = (d * 256.0).clamp(0.0, 255.0) as u8;
                    let cell = self.grid.at(c as usize, r as usize);
                    if k > cell {
                        self.grid.set(c as usize, r as usize, k);
                    }
                }
            }
        }
    }

    /// Resample an external u8 plane over the whole field, scale and offset
    /// it, and composite with max. `add` is in units of full range: 0.5
    /// adds 128, 1.0 adds 256.
    pub fn stamp_mask(&mut self, map: &[u8], w: usize, h: usize, scale: f32, add: f32) {
        if map.len() != w * h || w == 0 || h == 0 {
            return;
        }
        let width = self.grid.width();
        let height = self.grid.height();
        for r in 0..height {
            for c in 0..width {
                let x3 = c as f32 * w as f32 / width as f32;
                let z3 = r as f32 * h as f32 / height as f32;
                let x2 = x3.floor() as usize;
                let z2 = z3.floor() as usize;
                let fx = x3 - x2 as f32;
                let fz = z3 - z2 as f32;
                let xn = (x2 + 1).min(w - 1);
                let zn = (z2 + 1).min(h - 1);
                let v00 = map[x2 + z2 * w] as f32;
                let v10 = map[xn + z2 * w] as f32;
                let v11 = map[xn + zn * w] as f32;
                let v01 = map[x2 + zn * w] as f32;
                let top = (v10 - v00) * fx + v00;
                let btm = (v11 - v01) * fx + v01;
                let t = (btm - top) * fz + top;
                let k = (t * scale + add * 256.0).clamp(0.0, 255.0) as u8;
                let cell = self.grid.at(c, r);
                if k > cell {
                    self.grid.set(c, r, k);
                }
            }
        }
    }

    /// Mean filter with a `(2 * box_size + 1)^2` kernel. Taps outside the
    /// field are dropped from the average rather than clamped.
    pub fn box_blur(&mut self, box_size: i64) {
        let width = self.grid.width() as i64;
        let height = self.grid.height() as i64;
        let old: Vec<u8> = self.grid.data().to_vec();
        for r in 0..height {
            for c in 0..width {
                let mut v = 0.0f32;
                let mut n = 0.0f32;
                for kr in (r - box_size)..=(r + box_size) {
                    for kc in (c - box_size)..=(c + box_size) {
                        if kc >= 0 && kc < width && kr >= 0 && kr < height {
                            v += old[(kc + kr * width) as usize] as f32;
                            n += 1.0;
                        }
                    }
                }
                if n != 0.0 {
                    v /= n;
                }
                self.grid.set(c as usize, r as usize, v as u8);
            }
        }
    }

    /// Bilinear field value at world `(x, z)`; 255 outside the grid, edge
    /// replication on the border cells inside it.
    #[inline]
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        if x < self.grid.min_x() as f64
            || z < self.grid.min_z() as f64
            || x >= self.grid.max_x() as f64
            || z >= self.grid.max_z() as f64
        {
            return 255.0;
        }
        self.grid.bilinear_clamped(x, z, 0, 0)
    }

    /// Whether the interpolated field counts as solid here.
    #[inline]
    pub fn is_solid(&self, x: f64, z: f64) -> bool {
        self.sample(x, z) >= 128.0
    }

    /// Central-difference gradient normal of the field, pointing away from
    /// rising values (out of obstacles). Returns zero where the field is
    /// flat.
    pub fn gradient_normal(&self, x: f64, z: f64) -> Vec2 {
        let dx = self.grid.cell_size_x() * 0.5;
        let dz = self.grid.cell_size_z() * 0.5;
        let ax = self.sample(x + dx, z) - self.sample(x - dx, z);
        let az = self.sample(x, z + dz) - self.sample(x, z - dz);
        let d = (ax * ax + az * az).sqrt();
        if d == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new((-ax / d) as f32, (-az / d) as f32)
    }

    /// March the segment `from -> to` against the field. On the first solid
    /// sample the last free position and its normal are returned. A start
    /// position that is already solid yields `None` while
    /// `pass_through_solid_start` is set, and an immediate zero-length hit
    /// otherwise.
    pub fn raycast_line(&self, from: Vec2, to: Vec2) -> Option<LineHit> {
        let (x0, z0) = (from.x as f64, from.y as f64);
        let (x1, z1) = (to.x as f64, to.y as f64);
        if self.is_solid(x0, z0) {
            if self.pass_through_solid_start {
                return None;
            }
            return Some(LineHit {
                pos: from,
                normal: self.gradient_normal(x0, z0),
            });
        }
        let mut xd = x1 - x0;
        let mut zd = z1 - z0;
        let d = (xd * xd + zd * zd).sqrt();
        if d.abs() < 1e-5 {
            return None;
        }
        xd /= d;
        zd /= d;
        // One tenth of a half cell keeps thin walls from being skipped over.
        let mut step = (self.grid.cell_size_x().min(self.grid.cell_size_z())) * 0.5;
        step *= 0.1;
        let mut xp = x0;
        let mut zp = z0;
        loop {
            let lx = xp;
            let lz = zp;
            xp += xd * step;
            zp += zd * step;
            let dx = xp - x0;
            let dz = zp - z0;
            if (dx * dx + dz * dz).sqrt() > d {
                // The endpoint was reached free; whatever lies beyond the
                // segment is not this query's concern.
                return None;
            }
            if self.is_solid(xp, zp) {
                return Some(LineHit {
                    pos: Vec2::new(lx as f32, lz as f32),
                    normal: self.gradient_normal(lx, lz),
                });
            }
        }
    }
}
