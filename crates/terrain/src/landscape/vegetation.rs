//! Tree, grass and flower placement.
//!
//! All three generators run the same deterministic scheme: a ChaCha stream
//! seeded to 0, exactly seven draws per cell regardless of whether the cell
//! places anything, then mask test, layer test and a modulo thin-out on the
//! first draw. Two landscapes fed the same inputs therefore produce
//! bit-identical element sequences.

use log::debug;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{ripple, Landscape};
use crate::element::{Element, ElementKind};
use crate::error::{check_raster_len, TerrainResult};

const TREE_DIST: f32 = 200.0;
const TREE_DIST_RAND: f32 = 200.0;
const GRASS_DIST: f32 = 200.0;
const FLOWER_DIST: f32 = 75.0;

/// Seven draws per visited cell, always taken in order.
#[inline]
fn draws(rng: &mut ChaCha8Rng) -> [u32; 7] {
    [
        rng.next_u32(),
        rng.next_u32(),
        rng.next_u32(),
        rng.next_u32(),
        rng.next_u32(),
        rng.next_u32(),
        rng.next_u32(),
    ]
}

impl Landscape {
    /// Place trees on every cell where `map` is nonzero, `mask` is zero and
    /// the thin-out modulo passes. Large specimens sink a little deeper into
    /// the ground so their roots don't float on slopes.
    pub fn set_trees(
        &mut self,
        mask: &[u8],
        map: &[u8],
        w: usize,
        h: usize,
        rand_mod: u32,
    ) -> TerrainResult<()> {
        check_raster_len(mask.len(), w, h)?;
        check_raster_len(map.len(), w, h)?;
        let rand_mod = rand_mod.max(1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let before = self.elements().len();
        for z in 0..h {
            for x in 0..w {
                let r = draws(&mut rng);
                if mask[x + z * w] != 0 || map[x + z * w] == 0 {
                    continue;
                }
                if r[0] % rand_mod != 0 {
                    continue;
                }
                let big = if (r[5] & 255) / 220 > 0 { 1u8 } else { 0u8 };
                let px = self.span_x() * x as f32 / w as f32 + self.min_x();
                let pz = self.span_z() * z as f32 / h as f32 + self.min_z();
                let py = self.height(px, pz) - 0.25 - 0.75 * big as f32;
                let siz = TREE_DIST + (r[4] & 255) as f32 / 255.0 * TREE_DIST_RAND;
                self.push(Element {
                    kind: ElementKind::Tree as u8,
                    v0: (r[2] & 255) as u8,       // brightness
                    v1: (r[3] & 255) as u8,       // height
                    v2: (r[5] & 1) as u8 + big * 128, // variant + big flag
                    cutoff_sq: siz * siz,
                    x: px,
                    y: py,
                    z: pz,
                });
            }
        }
        debug!("trees: {} placed", self.elements().len() - before);
        Ok(())
    }

    /// Place grass blades. On top of the usual tests the local heightmap
    /// slope has to stay shallow; blades jitter inside their cell and take
    /// their lightness from the ripple field so neighboring blades shade
    /// together.
    pub fn set_grass(
        &mut self,
        mask: &[u8],
        map: &[u8],
        w: usize,
        h: usize,
        rand_mod: u32,
    ) -> TerrainResult<()> {
        check_raster_len(mask.len(), w, h)?;
        check_raster_len(map.len(), w, h)?;
        let rand_mod = rand_mod.max(1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let before = self.elements().len();
        for z in 0..h {
            for x in 0..w {
                let r = draws(&mut rng);
                if mask[x + z * w] != 0 || map[x + z * w] == 0 {
                    continue;
                }
                let px0 = self.span_x() * x as f32 / w as f32 + self.min_x();
                let pz0 = self.span_z() * z as f32 / h as f32 + self.min_z();
                let k = 3.0 * self.span_x() / w as f32;
                let dx = self.height(px0 + k, pz0) - self.height(px0 - k, pz0);
                let dz = self.height(px0, pz0 + k) - self.height(px0, pz0 - k);
                let not_steep = (dx * dx + dz * dz).sqrt() < 0.5;
                if r[0] % rand_mod != 0 || !not_steep {
                    continue;
                }
                let ox = (r[5] & 255) as f32 / 255.0;
                let oz = (r[6] & 255) as f32 / 255.0;
                let px = self.span_x() * (x as f32 + ox) / w as f32 + self.min_x();
                let pz = self.span_z() * (z as f32 + oz) / h as f32 + self.min_z();
                let py = self.height(px, pz);
                let f = ripple(px * 0.25, pz * 0.25);
                let siz = GRASS_DIST * ((r[4] & 255) as f32 / 255.0 * 0.75 + 0.25);
                self.push(Element {
                    kind: ElementKind::Grass as u8,
                    v0: (f * 8.0 + 22.0) as u8,   // lightness
                    v1: (r[2] & 255) as u8,       // overall size
                    v2: (r[3] & 255) as u8,       // width
                    cutoff_sq: siz * siz,
                    x: px,
                    y: py,
                    z: pz,
                });
            }
        }
        debug!("grass: {} blades placed", self.elements().len() - before);
        Ok(())
    }

    /// Place flowers. Color normally follows the ripple field in bands;
    /// every eighth candidate rerolls a random color so the bands stay
    /// speckled. Small flowers pop in later than large ones.
    pub fn set_flowers(
        &mut self,
        mask: &[u8],
        map: &[u8],
        w: usize,
        h: usize,
        rand_mod: u32,
    ) -> TerrainResult<()> {
        check_raster_len(mask.len(), w, h)?;
        check_raster_len(map.len(), w, h)?;
        let rand_mod = rand_mod.max(1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let before = self.elements().len();
        for z in 0..h {
            for x in 0..w {
                let r = draws(&mut rng);
                if mask[x + z * w] != 0 || map[x + z * w] == 0 {
                    continue;
                }
                if r[0] % rand_mod != 0 {
                    continue;
                }
                let px = self.span_x() * x as f32 / w as f32 + self.min_x();
                let pz = self.span_z() * z as f32 / h as f32 + self.min_z();
                let py = self.height(px, pz) + 0.5;
                let mut f = ripple(px * 0.5, pz * 0.5);
                if r[2] & 7 == 0 {
                    f = (r[3] & 7) as f32 / 7.0;
                }
                let v2 = (r[6] & 255) as u8;
                let siz = FLOWER_DIST
                    * ((r[4] & 255) as f32 / 255.0 * 0.75 + 0.25)
                    * (v2 as f32 / 255.0 * 0.5 + 0.5);
                self.push(Element {
                    kind: ElementKind::Flower as u8,
                    v0: (f * 4.0) as u8 & 3,      // color index
                    v1: (r[4] & 255) as u8,       // sway phase
                    v2,                           // size
                    cutoff_sq: siz * siz,
                    x: px,
                    y: py,
                    z: pz,
                });
            }
        }
        debug!("flowers: {} placed", self.elements().len() - before);
        Ok(())
    }
}
