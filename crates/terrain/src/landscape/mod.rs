//! The landscape: world bounds, heightmap, soil map, and the master element
//! list, together with the generation procedures that populate it from
//! raster layers.
//!
//! Generation methods run in a caller-chosen order. Each appends to the
//! element list; some also mutate the heightmap (stones raise it, roads
//! carve it), and later height lookups see those edits. The whole module is
//! synchronous and single-threaded; callers bound the cost through strides,
//! modulos and the per-frame detail scale.

mod contour;
mod ground;
mod vegetation;

pub use contour::hit_thresh;

use glam::Vec3;

use crate::element::{Element, ElementKind};
use crate::error::{check_raster_len, TerrainError, TerrainResult};
use crate::grid::Grid;

/// Heightmap values span the full u16 range and rescale to `[min_y, max_y]`.
const HEIGHT_SCALE: f32 = 65535.0;

pub struct Landscape {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
    min_z: f32,
    max_z: f32,
    /// Heightmap and soil map arrive together via `set_height_map`.
    field: Option<HeightField>,
    elements: Vec<Element>,
}

struct HeightField {
    map: Grid<u16>,
    soil: Grid<u8>,
}

impl Landscape {
    /// Create an empty landscape over `[x0, x1) x [z0, z1)` with heights
    /// rescaled into `[y0, y1]`.
    pub fn new(x0: f32, z0: f32, x1: f32, z1: f32, y0: f32, y1: f32) -> TerrainResult<Self> {
        if !(x0 < x1) {
            return Err(TerrainError::InvalidBounds {
                axis: "x",
                min: x0,
                max: x1,
            });
        }
        if !(z0 < z1) {
            return Err(TerrainError::InvalidBounds {
                axis: "z",
                min: z0,
                max: z1,
            });
        }
        if !(y0 <= y1) {
            return Err(TerrainError::InvalidBounds {
                axis: "y",
                min: y0,
                max: y1,
            });
        }
        Ok(Self {
            min_x: x0,
            max_x: x1,
            min_y: y0,
            max_y: y1,
            min_z: z0,
            max_z: z1,
            field: None,
            elements: Vec::new(),
        })
    }

    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    pub fn min_z(&self) -> f32 {
        self.min_z
    }

    pub fn max_z(&self) -> f32 {
        self.max_z
    }

    /// The master element list, in generation order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Heightmap dimensions, or `(0, 0)` before `set_height_map`.
    pub fn height_map_size(&self) -> (usize, usize) {
        match &self.field {
            Some(f) => (f.map.width(), f.map.height()),
            None => (0, 0),
        }
    }

    fn push(&mut self, e: Element) {
        self.elements.push(e);
    }

    /// World X span.
    fn span_x(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// World Z span.
    fn span_z(&self) -> f32 {
        self.max_z - self.min_z
    }

    /// Collect the indices of all elements within their pop-in distance of
    /// the camera. `out` is cleared and refilled in master-list order; its
    /// capacity is kept across frames.
    pub fn collect(&self, out: &mut Vec<u32>, camera: Vec3, detail_scale: f32) {
        out.clear();
        for (i, e) in self.elements.iter().enumerate() {
            if e.distance_sq(camera) < e.cutoff_sq * detail_scale {
                out.push(i as u32);
            }
        }
    }

    /// Drop every element of the given kind. Calling it again is a no-op.
    pub fn remove_kind(&mut self, kind: ElementKind) {
        self.elements.retain(|e| e.kind != kind as u8);
    }

    /// Interpolated height at world `(x, z)`, between `min_y` and `max_y`.
    /// Coordinates clamp to the map, so the borders replicate outward.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        self.height_offset(x, z, 0, 0)
    }

    /// Like `height`, with the four bilinear taps shifted by whole cells.
    /// The offsets make box filters over the heightmap possible.
    pub fn height_offset(&self, x: f32, z: f32, dc: i64, dr: i64) -> f32 {
        let field = match &self.field {
            Some(f) => f,
            None => return self.min_y,
        };
        let x = x.clamp(self.min_x, self.max_x - 0.001);
        let z = z.clamp(self.min_z, self.max_z - 0.001);
        let raw = field.map.bilinear_clamped(x as f64, z as f64, dc, dr) as f32;
        raw * (self.max_y - self.min_y) / HEIGHT_SCALE + self.min_y
    }

    /// Box-filtered height with a `(2 * rad + 1)^2` cell kernel.
    pub fn height_box(&self, x: f32, z: f32, rad: i64) -> f32 {
        let mut h = 0.0;
        let mut n = 0.0;
        for dr in -rad..=rad {
            for dc in -rad..=rad {
                h += self.height_offset(x, z, dc, dr);
                n += 1.0;
            }
        }
        if n > 0.0 {
            h / n
        } else {
            0.0
        }
    }

    /// Write a world-space height into the heightmap cell covering `(x, z)`.
    /// Positions outside the bounds or on the far border rows are ignored.
    pub fn put_height(&mut self, x: f32, z: f32, y: f32) {
        let (min_y, max_y) = (self.min_y, self.max_y);
        let field = match &mut self.field {
            Some(f) => f,
            None => return,
        };
        if x < field.map.min_x() || x >= field.map.max_x() {
            return;
        }
        if z < field.map.min_z() || z >= field.map.max_z() {
            return;
        }
        let c = field.map.to_col(x as f64);
        let r = field.map.to_row(z as f64);
        if c < 0 || c >= field.map.width() as i64 - 1 {
            return;
        }
        if r < 0 || r >= field.map.height() as i64 - 1 {
            return;
        }
        let k = ((y - min_y) / (max_y - min_y) * HEIGHT_SCALE).clamp(0.0, HEIGHT_SCALE);
        field.map.set(c as usize, r as usize, k as u16);
    }

    fn field(&self) -> Option<&HeightField> {
        self.field.as_ref()
    }

    fn install_field(
        &mut self,
        map: Vec<u16>,
        soil: Vec<u8>,
        w: usize,
        h: usize,
    ) -> TerrainResult<()> {
        check_raster_len(map.len(), w, h)?;
        check_raster_len(soil.len(), w, h)?;
        self.field = Some(HeightField {
            map: Grid::from_data(self.min_x, self.min_z, self.max_x, self.max_z, w, h, map)?,
            soil: Grid::from_data(self.min_x, self.min_z, self.max_x, self.max_z, w, h, soil)?,
        });
        Ok(())
    }
}

impl HeightField {
    /// Normalized downhill X direction and soil id at a clamped cell, as the
    /// v0/v1 pair every ground sample carries.
    fn slope_and_soil(&self, c: i64, r: i64) -> (u8, u8) {
        let vn = self.map.at_clamped(c - 1, r) as f32;
        let vp = self.map.at_clamped(c + 1, r) as f32;
        let v_n = self.map.at_clamped(c, r - 1) as f32;
        let v_p = self.map.at_clamped(c, r + 1) as f32;
        let mut dx = vp - vn;
        let dy = v_p - v_n;
        let d = (dx * dx + dy * dy).sqrt();
        if d != 0.0 {
            dx /= d;
        }
        let v0 = (128.0 + dx * 127.0) as u8;
        let v1 = self.soil.at_clamped(c, r);
        (v0, v1)
    }
}

/// Smooth ripple field over world coordinates, in `[0, 1]`. Drives grass
/// lightness, flower color bands and road surface shading.
fn ripple(x: f32, z: f32) -> f32 {
    (x + z + (x * 0.4 - z * 0.2).sin() + (x * 0.7).cos() - (z * 0.9).sin()).sin() * 0.5 + 0.5
}

/// Coarser bump field used to raise stone regions out of the ground.
fn mound(x: f32, z: f32) -> f32 {
    (x + z + x.sin() + z.cos()).sin() * 0.5 + 0.5
}

/// Clamped five-point stencil over a u8 plane: center and the four axis
/// neighbors.
fn stencil5(map: &[u8], x: usize, z: usize, w: usize, h: usize) -> [u8; 5] {
    let xm = if x == 0 { 0 } else { x - 1 };
    let xp = if x + 1 >= w { w - 1 } else { x + 1 };
    let zm = if z == 0 { 0 } else { z - 1 };
    let zp = if z + 1 >= h { h - 1 } else { z + 1 };
    [
        map[x + z * w],
        map[xm + z * w],
        map[xp + z * w],
        map[x + zm * w],
        map[x + zp * w],
    ]
}
