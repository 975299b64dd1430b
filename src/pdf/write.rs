//! Serializing the bound PDF to disk

use std::fs;
use std::path::Path;
use tracing::debug;
use crate::error::{Error, Result};
use crate::pdf::assemble::AssembledDocument;

/// Compress and write the document to `path`, replacing any existing file
///
/// The whole PDF is serialized in memory first and then written with a
/// single call.
pub fn write_pdf(assembled: AssembledDocument, path: &Path) -> Result<()> {
    let mut doc = assembled.doc;
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    debug!("Serialized PDF: {} bytes", buffer.len());

    fs::write(path, &buffer).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}
