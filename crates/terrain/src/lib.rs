//! Layer-driven outdoor terrain core.
//!
//! Raster layers (heights, soil, water, roads, stones, vegetation, object
//! dots) seed a master list of typed landscape elements, each with its own
//! camera pop-in distance. Per camera move, a view collects the nearby
//! subset, triangulates the ground kinds with Delaunay, and hands
//! back-to-front ordered triangles plus parallel vertex attribute arrays to
//! the renderer. A separate coarse collision field answers line-vs-obstacle
//! queries with subsample hit points and gradient normals.
//!
//! This crate is framework-agnostic: no file formats, no GPU, no windowing.
//! Use the `editor` crate for layer bundles on disk and in-game authoring.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use terrain::{DelaunayView, Landscape};
//!
//! let mut scape = Landscape::new(-250.0, -250.0, 250.0, 250.0, 0.0, 100.0).unwrap();
//! let w = 64;
//! let mask = vec![0u8; w * w];
//! let heights = vec![1000u16; w * w];
//! let soil = vec![1u8; w * w];
//! scape
//!     .set_height_map(&mask, heights, w, w, 1, 1, 1.0, 1.0, soil)
//!     .unwrap();
//!
//! let mut view = DelaunayView::new();
//! view.update(&scape, Vec3::new(0.0, 10.0, 0.0), 1.0);
//! assert!(!view.triangles().is_empty());
//! ```

pub mod collision;
pub mod element;
pub mod error;
pub mod grid;
pub mod landscape;
pub mod layers;
pub mod triangulate;
pub mod view;

pub use collision::{CollisionField, LineHit};
pub use element::{Element, ElementKind};
pub use error::{TerrainError, TerrainResult};
pub use grid::Grid;
pub use landscape::{hit_thresh, Landscape};
pub use layers::{
    blend_alpha, downsample_area, erase_where_alpha, BitmapLayer, BitmapLayers, Channel,
};
pub use triangulate::Triangulator;
pub use view::{DelaunayView, ViewTriangle};
