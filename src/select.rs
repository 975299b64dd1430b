//! Native file picker for the seed page

use std::path::PathBuf;
use crate::error::{Error, Result};
use crate::naming::PAGE_EXTENSION;

/// Ask the user for the first page of a book
///
/// Blocks until the dialog closes. Dismissing it yields `Error::Cancelled`.
pub fn pick_seed_file() -> Result<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select the first page of the book")
        .add_filter("WEBP image", &[PAGE_EXTENSION])
        .pick_file()
        .ok_or(Error::Cancelled)
}
