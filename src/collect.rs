//! Sibling page discovery

use std::fs;
use std::path::{Path, PathBuf};
use glob::Pattern;
use tracing::{debug, warn};
use crate::error::{Error, Result};
use crate::naming::{parse_page_name, sibling_glob};

/// One on-disk image belonging to a book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    /// Logical page number parsed from the file name
    pub page_number: u32,
    /// Full path to the image
    pub path: PathBuf,
}

/// Collect every page of `book_id` in `dir`, sorted by page number
///
/// Candidates are matched with the glob `{book_id}_page*.webp` and then
/// re-parsed; files whose parsed id differs from `book_id` (for example
/// `novel_page_x_page1.webp` when binding `novel`) are dropped. When two files
/// name the same page, the first in file-name order wins.
pub fn collect_pages(dir: &Path, book_id: &str) -> Result<Vec<PageFile>> {
    let pattern = Pattern::new(&sibling_glob(book_id))
        .map_err(|e| Error::General(format!("Invalid glob pattern for '{}': {}", book_id, e)))?;

    let mut candidates: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if pattern.matches(&file_name) {
            candidates.push((file_name, entry.path()));
        }
    }

    // read_dir order is unspecified
    candidates.sort();

    let mut pages: Vec<PageFile> = Vec::new();
    for (file_name, path) in candidates {
        match parse_page_name(&file_name) {
            Ok(name) if name.book_id == book_id => pages.push(PageFile {
                page_number: name.page_number,
                path,
            }),
            Ok(name) => debug!("Skipping {}: belongs to book '{}'", file_name, name.book_id),
            Err(_) => debug!("Skipping {}: not a page file name", file_name),
        }
    }

    // Stable sort keeps file-name order among equal page numbers
    pages.sort_by_key(|p| p.page_number);
    pages.dedup_by(|later, first| {
        if later.page_number == first.page_number {
            warn!(
                "Duplicate page {}: keeping {}, ignoring {}",
                first.page_number,
                first.path.display(),
                later.path.display()
            );
            true
        } else {
            false
        }
    });

    if pages.is_empty() {
        return Err(Error::NoFilesFound {
            dir: dir.to_path_buf(),
            book_id: book_id.to_string(),
        });
    }

    Ok(pages)
}
