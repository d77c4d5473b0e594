//! Authoring shell for the terrain core.
//!
//! Loads PNG layer bundles, builds landscapes from JSON recipes, and edits
//! object placements in place: each edit persists the placement raster and
//! regenerates the affected elements plus the current view.
//!
//! Rendering, windowing and input stay out; this crate ends at files and
//! generated data.

pub mod bundle;
pub mod error;
pub mod object_editor;
pub mod recipe;
pub mod session;

pub use bundle::{load_bundle, read_layer_png, write_layer_png};
pub use error::{EditorError, EditorResult};
pub use object_editor::ObjectEditor;
pub use recipe::{LayerNames, TerrainRecipe};
pub use session::Session;
