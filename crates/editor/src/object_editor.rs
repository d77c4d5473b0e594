//! In-place object placement editing.
//!
//! The editor owns the RGBA placement raster and its backing PNG. Every
//! mutation persists the raster first and then regenerates the landscape's
//! object elements and the current view, so the world on screen always
//! matches the file on disk. If the save fails the raster mutation is
//! rolled back and nothing is regenerated.

use glam::Vec3;
use log::debug;
use terrain::{BitmapLayer, DelaunayView, ElementKind, Landscape};

use crate::bundle::{read_layer_png, write_layer_png};
use crate::error::EditorResult;

use std::path::{Path, PathBuf};

/// Half extent of the cell box that `rotate_y` and `remove` affect.
const EDIT_BOX: i64 = 2;

pub struct ObjectEditor {
    raster: BitmapLayer,
    path: PathBuf,
}

impl ObjectEditor {
    /// Open the placement raster at `path`, or start a zeroed `w * h` one if
    /// the file does not exist yet.
    pub fn open(path: &Path, w: usize, h: usize) -> EditorResult<Self> {
        let raster = if path.exists() {
            read_layer_png(path)?
        } else {
            BitmapLayer::new(w, h)
        };
        Ok(Self {
            raster,
            path: path.to_path_buf(),
        })
    }

    pub fn raster(&self) -> &BitmapLayer {
        &self.raster
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raster cell covering a world position, or `None` outside the bounds.
    fn cell_of(&self, scape: &Landscape, pos: Vec3) -> Option<(i64, i64)> {
        let cx = ((pos.x - scape.min_x()) / (scape.max_x() - scape.min_x())
            * self.raster.w as f32) as i64;
        let cz = ((pos.z - scape.min_z()) / (scape.max_z() - scape.min_z())
            * self.raster.h as f32) as i64;
        if cx < 0 || cx >= self.raster.w as i64 || cz < 0 || cz >= self.raster.h as i64 {
            return None;
        }
        Some((cx, cz))
    }

    /// Put one object of `object_id` at `pos`, persist and regenerate.
    pub fn place(
        &mut self,
        scape: &mut Landscape,
        view: &mut DelaunayView,
        camera: Vec3,
        detail_scale: f32,
        pos: Vec3,
        object_id: u32,
    ) -> EditorResult<()> {
        let (cx, cz) = match self.cell_of(scape, pos) {
            Some(c) => c,
            None => return Ok(()),
        };
        let r = (object_id & 63) * 4 + 2;
        let old = self.raster.pixel(cx as usize, cz as usize);
        self.raster.set_pixel(cx as usize, cz as usize, r);
        if let Err(e) = write_layer_png(&self.path, &self.raster) {
            self.raster.set_pixel(cx as usize, cz as usize, old);
            return Err(e);
        }
        debug!("placed object {object_id} at cell ({cx}, {cz})");
        self.refresh(scape, view, camera, detail_scale)
    }

    /// Turn every object within the edit box around `pos` to rotation step
    /// `rot` (eighths of a turn). Persists and regenerates only when a cell
    /// actually changed.
    pub fn rotate_y(
        &mut self,
        scape: &mut Landscape,
        view: &mut DelaunayView,
        camera: Vec3,
        detail_scale: f32,
        pos: Vec3,
        rot: u32,
    ) -> EditorResult<()> {
        let (cx, cz) = match self.cell_of(scape, pos) {
            Some(c) => c,
            None => return Ok(()),
        };
        let before = self.raster.rgba.clone();
        let mut some = false;
        for z in (cz - EDIT_BOX)..=(cz + EDIT_BOX) {
            for x in (cx - EDIT_BOX)..=(cx + EDIT_BOX) {
                if x < 0 || x >= self.raster.w as i64 || z < 0 || z >= self.raster.h as i64 {
                    continue;
                }
                let p = self.raster.pixel(x as usize, z as usize);
                if p & 255 != 0 {
                    some = true;
                    let g = (rot * 4 + 2) & 255;
                    let keep = p & 0xFFFF_00FF;
                    self.raster.set_pixel(x as usize, z as usize, keep | g << 8);
                }
            }
        }
        if !some {
            return Ok(());
        }
        if let Err(e) = write_layer_png(&self.path, &self.raster) {
            self.raster.rgba = before;
            return Err(e);
        }
        self.refresh(scape, view, camera, detail_scale)
    }

    /// Clear every object within the edit box around `pos`.
    pub fn remove(
        &mut self,
        scape: &mut Landscape,
        view: &mut DelaunayView,
        camera: Vec3,
        detail_scale: f32,
        pos: Vec3,
    ) -> EditorResult<()> {
        let (cx, cz) = match self.cell_of(scape, pos) {
            Some(c) => c,
            None => return Ok(()),
        };
        let before = self.raster.rgba.clone();
        for z in (cz - EDIT_BOX)..=(cz + EDIT_BOX) {
            for x in (cx - EDIT_BOX)..=(cx + EDIT_BOX) {
                if x < 0 || x >= self.raster.w as i64 || z < 0 || z >= self.raster.h as i64 {
                    continue;
                }
                self.raster.set_pixel(x as usize, z as usize, 0);
            }
        }
        if let Err(e) = write_layer_png(&self.path, &self.raster) {
            self.raster.rgba = before;
            return Err(e);
        }
        self.refresh(scape, view, camera, detail_scale)
    }

    /// Regenerate the object elements from the raster and rebuild the view.
    pub fn refresh(
        &self,
        scape: &mut Landscape,
        view: &mut DelaunayView,
        camera: Vec3,
        detail_scale: f32,
    ) -> EditorResult<()> {
        scape.remove_kind(ElementKind::Object);
        scape.set_objects(&self.raster.rgba, self.raster.w, self.raster.h)?;
        view.update(scape, camera, detail_scale);
        Ok(())
    }
}
