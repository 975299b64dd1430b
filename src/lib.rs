//! Book Binder Library
//!
//! Binds the scanned page images of one book into a single PDF.
//! This library provides functionality to:
//! - Parse `{bookid}_page{N}.webp` page file names
//! - Collect and order all pages of a book
//! - Load page images without alpha
//! - Assemble them into a multi-page PDF
//! - Add bookmarks from a `{bookid}_toc.json` table of contents
//! - Inspect the result (page count, title, outline)
//!
//! # Example
//!
//! ```no_run
//! use book_binder::bind::{bind_book, BindOptions};
//!
//! let report = bind_book(&BindOptions::new("scans/novel_page3.webp"))
//!     .expect("Failed to bind book");
//! println!("Wrote {}", report.output_path.display());
//! ```

pub mod error;
pub mod naming;
pub mod collect;
pub mod load;
pub mod toc;
pub mod pdf;
pub mod bind;
#[cfg(feature = "dialog")]
pub mod select;

// Re-export commonly used items
pub use error::{Error, Result};
pub use bind::{bind_book, BindOptions, BindReport, OutlineStatus};
