//! The landscape element record.
//!
//! An element is one point-like feature of the world: a ground sample, a
//! tree, a grass blade, a water outline vertex. The master element list can
//! run into the millions, so the record is kept at 24 bytes with 4-byte
//! alignment.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// The element type tag.
///
/// The ordinal values are fixed: external raster encodings and renderers
/// dispatch on these numbers.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Plain ground sample carrying the soil id.
    Height = 0,
    /// A road outline or surface vertex.
    Road = 1,
    /// A single tree.
    Tree = 2,
    /// A single grass blade sprite.
    Grass = 3,
    /// A single flower sprite.
    Flower = 4,
    /// An elevated stone outline vertex.
    Stone = 5,
    /// A water outline vertex.
    Water = 6,
    /// A placed 3D object marker.
    Object = 7,
}

impl ElementKind {
    pub fn from_u8(v: u8) -> Option<ElementKind> {
        Some(match v {
            0 => ElementKind::Height,
            1 => ElementKind::Road,
            2 => ElementKind::Tree,
            3 => ElementKind::Grass,
            4 => ElementKind::Flower,
            5 => ElementKind::Stone,
            6 => ElementKind::Water,
            7 => ElementKind::Object,
            _ => return None,
        })
    }

    /// Ground kinds take part in the per-view triangulation; the rest are
    /// drawn as sprites or meshes by consumers.
    pub fn is_ground(self) -> bool {
        matches!(
            self,
            ElementKind::Height | ElementKind::Road | ElementKind::Stone | ElementKind::Water
        )
    }
}

/// One landscape element. 24 bytes, 4-byte aligned.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Element {
    /// `ElementKind` ordinal.
    pub kind: u8,
    /// Kind-specific parameters (brightness, soil id, size, ...).
    pub v0: u8,
    pub v1: u8,
    pub v2: u8,
    /// Squared camera distance below which this element is collected.
    pub cutoff_sq: f32,
    /// World-space position.
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        ElementKind::from_u8(self.kind).unwrap_or(ElementKind::Height)
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn distance_sq(&self, p: Vec3) -> f32 {
        let dx = self.x - p.x;
        let dy = self.y - p.y;
        let dz = self.z - p.z;
        dx * dx + dy * dy + dz * dz
    }
}
