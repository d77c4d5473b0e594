//! Terrain build recipes.
//!
//! A recipe names the layers of a bundle and carries every generation
//! parameter, so a whole map is described by one JSON file next to its
//! rasters. Heights are 16-bit, split across the red (high) and green (low)
//! channels of the heights layer; every other layer contributes its red
//! channel.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use terrain::{BitmapLayers, Channel, Landscape};

use crate::error::{EditorError, EditorResult};

/// Which layer names feed which generation pass. Empty names switch the
/// pass off; only heights and soil are required.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayerNames {
    pub heights: String,
    pub soil: String,
    pub mask: String,
    pub trees: String,
    pub grass: String,
    pub flowers: String,
    pub stones: String,
    pub water: String,
    pub roads: String,
    pub objects: String,
}

impl Default for LayerNames {
    fn default() -> Self {
        Self {
            heights: "heights".into(),
            soil: "soil".into(),
            mask: "mask".into(),
            trees: "trees".into(),
            grass: "grass".into(),
            flowers: "flowers".into(),
            stones: "stones".into(),
            water: "water".into(),
            roads: "roads".into(),
            objects: "objects".into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerrainRecipe {
    pub min_x: f32,
    pub min_z: f32,
    pub max_x: f32,
    pub max_z: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub layers: LayerNames,
    pub height_step_x: usize,
    pub height_step_z: usize,
    pub height_dist_fact: f32,
    pub height_steep_thresh: f32,
    pub tree_modulo: u32,
    pub grass_modulo: u32,
    pub flower_modulo: u32,
    pub stone_thresh_outer: u8,
    pub stone_thresh_cleanup: u8,
    pub water_thresh_outer: u8,
    pub water_thresh_cleanup: u8,
    pub road_thresh_outer: u8,
    pub road_thresh_inner: u8,
    pub road_thresh_cleanup: u8,
}

impl Default for TerrainRecipe {
    fn default() -> Self {
        Self {
            min_x: -250.0,
            min_z: -250.0,
            max_x: 250.0,
            max_z: 250.0,
            min_y: 0.0,
            max_y: 100.0,
            layers: LayerNames::default(),
            height_step_x: 1,
            height_step_z: 1,
            height_dist_fact: 1.0,
            height_steep_thresh: 1.0,
            tree_modulo: 16,
            grass_modulo: 2,
            flower_modulo: 16,
            stone_thresh_outer: 128,
            stone_thresh_cleanup: 64,
            water_thresh_outer: 128,
            water_thresh_cleanup: 64,
            road_thresh_outer: 100,
            road_thresh_inner: 128,
            road_thresh_cleanup: 64,
        }
    }
}

impl TerrainRecipe {
    pub fn save_json(&self, path: &Path) -> EditorResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| EditorError::io(path, std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        std::fs::write(path, json).map_err(|e| EditorError::io(path, e))
    }

    pub fn load_json(path: &Path) -> EditorResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
        serde_json::from_str(&json)
            .map_err(|e| EditorError::io(path, std::io::Error::new(std::io::ErrorKind::Other, e)))
    }

    /// Run every configured generation pass against the bundle, in the
    /// order the passes depend on each other: ground first, the
    /// heightmap-mutating contours next, then everything that reads
    /// heights.
    pub fn build(&self, layers: &BitmapLayers) -> EditorResult<Landscape> {
        let mut scape = Landscape::new(
            self.min_x, self.min_z, self.max_x, self.max_z, self.min_y, self.max_y,
        )
        .map_err(EditorError::Terrain)?;

        let heights = self.require(layers, &self.layers.heights)?;
        let soil = self.require(layers, &self.layers.soil)?;
        let (w, h) = (heights.w, heights.h);
        let high = heights.channel(Channel::Red);
        let low = heights.channel(Channel::Green);
        let map: Vec<u16> = high
            .iter()
            .zip(&low)
            .map(|(&hi, &lo)| (hi as u16) << 8 | lo as u16)
            .collect();
        let mask = match layers.get(&self.layers.mask) {
            Some(m) => m.channel(Channel::Red),
            None => vec![0u8; w * h],
        };
        scape.set_height_map(
            &mask,
            map,
            w,
            h,
            self.height_step_x,
            self.height_step_z,
            self.height_dist_fact,
            self.height_steep_thresh,
            soil.channel(Channel::Red),
        )?;

        if let Some(stones) = self.optional(layers, &self.layers.stones) {
            let plane = stones.channel(Channel::Red);
            scape.set_stones(
                &plane,
                stones.w,
                stones.h,
                self.stone_thresh_outer,
                self.stone_thresh_cleanup,
            )?;
        }
        if let Some(water) = self.optional(layers, &self.layers.water) {
            let plane = water.channel(Channel::Red);
            scape.set_water(
                &plane,
                water.w,
                water.h,
                self.water_thresh_outer,
                self.water_thresh_cleanup,
            )?;
        }
        if let Some(roads) = self.optional(layers, &self.layers.roads) {
            let plane = roads.channel(Channel::Red);
            scape.set_roads(
                &plane,
                roads.w,
                roads.h,
                self.road_thresh_outer,
                self.road_thresh_inner,
                self.road_thresh_cleanup,
            )?;
        }
        if let Some(objects) = self.optional(layers, &self.layers.objects) {
            scape.set_objects(&objects.rgba, objects.w, objects.h)?;
        }
        if let Some(trees) = self.optional(layers, &self.layers.trees) {
            let plane = trees.channel(Channel::Red);
            scape.set_trees(&mask, &plane, trees.w, trees.h, self.tree_modulo)?;
        }
        if let Some(grass) = self.optional(layers, &self.layers.grass) {
            let plane = grass.channel(Channel::Red);
            scape.set_grass(&mask, &plane, grass.w, grass.h, self.grass_modulo)?;
        }
        if let Some(flowers) = self.optional(layers, &self.layers.flowers) {
            let plane = flowers.channel(Channel::Red);
            scape.set_flowers(&mask, &plane, flowers.w, flowers.h, self.flower_modulo)?;
        }

        info!("recipe built {} elements", scape.elements().len());
        Ok(scape)
    }

    fn require<'a>(
        &self,
        layers: &'a BitmapLayers,
        name: &str,
    ) -> EditorResult<&'a terrain::BitmapLayer> {
        layers.get(name).ok_or_else(|| EditorError::MissingLayer {
            name: name.to_string(),
        })
    }

    fn optional<'a>(
        &self,
        layers: &'a BitmapLayers,
        name: &str,
    ) -> Option<&'a terrain::BitmapLayer> {
        if name.is_empty() {
            return None;
        }
        layers.get(name)
    }
}
