//! Error types for landscape construction.
//!
//! Generation itself is total: out-of-range coordinates clamp, empty masks
//! yield no elements. Errors only occur when a caller hands over geometry
//! that cannot describe a world at all.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    /// World bounds are inverted or empty on the named axis.
    #[error("invalid world bounds on {axis}: {min} .. {max}")]
    InvalidBounds {
        axis: &'static str,
        min: f32,
        max: f32,
    },

    /// A raster buffer does not match the dimensions it was declared with.
    #[error("raster of {len} elements does not match declared size {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },
}

pub type TerrainResult<T> = Result<T, TerrainError>;

pub(crate) fn check_raster_len(len: usize, width: usize, height: usize) -> TerrainResult<()> {
    if len != width * height {
        return Err(TerrainError::DimensionMismatch { len, width, height });
    }
    Ok(())
}
