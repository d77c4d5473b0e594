//! Error types for the authoring shell.

use std::path::PathBuf;

use terrain::TerrainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Terrain(#[from] TerrainError),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not decode image {path}")]
    Decode { path: PathBuf },

    #[error("layer bundle is missing layer '{name}'")]
    MissingLayer { name: String },
}

impl EditorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EditorError::Io {
            path: path.into(),
            source,
        }
    }

    /// Fold an image crate error into the taxonomy: I/O stays I/O, anything
    /// else at save time still names the file.
    pub(crate) fn image_write(path: impl Into<PathBuf>, e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(source) => EditorError::Io {
                path: path.into(),
                source,
            },
            other => EditorError::Io {
                path: path.into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, other.to_string()),
            },
        }
    }
}

pub type EditorResult<T> = Result<T, EditorError>;
