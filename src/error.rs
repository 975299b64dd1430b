//! Error types for the book binder library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the book binder library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The user dismissed the file picker without choosing a file
    #[error("No file selected")]
    Cancelled,

    /// Seed file name does not follow `{bookid}_page{N}.webp`
    #[error("File name does not match {{bookid}}_page{{N}}.webp: {0}")]
    FilenameFormat(String),

    /// No sibling page files were found
    #[error("No page files for book '{book_id}' found in {}", .dir.display())]
    NoFilesFound { dir: PathBuf, book_id: String },

    /// A single page image could not be decoded
    #[error("Failed to open image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Every page image failed to load
    #[error("None of the {0} page images could be loaded")]
    NoUsableImages(usize),

    /// Table of contents sidecar could not be read or parsed
    #[error("Invalid table of contents {}: {reason}", .path.display())]
    Sidecar { path: PathBuf, reason: String },

    /// Output PDF could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// Reference resolution must be a positive number
    #[error("Invalid resolution: {0} (expected a positive DPI)")]
    InvalidDpi(f32),

    /// General error
    #[error("{0}")]
    General(String),
}
