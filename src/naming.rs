//! Page file naming: `{bookid}_page{N}.webp`
//!
//! Every page image of a book carries the book id and its logical page
//! number in the file name. The id is matched greedily, so an id may itself
//! contain `_page`; the page number is always the rightmost `_page{N}`.

use std::path::Path;
use once_cell::sync::Lazy;
use regex::Regex;
use crate::error::{Error, Result};

/// Extension shared by every page image
pub const PAGE_EXTENSION: &str = "webp";

static PAGE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*)_page([0-9]+)\.webp$").expect("page name pattern is valid")
});

/// Book id and logical page number parsed from a page file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageName {
    /// Identifier grouping all pages of one book
    pub book_id: String,
    /// Logical page number embedded in the file name
    pub page_number: u32,
    /// Number of digits in the file name, including zero padding
    pub digits: usize,
}

impl PageName {
    /// Render the file name for this page, keeping its zero padding
    pub fn file_name(&self) -> String {
        format!(
            "{}_page{:0width$}.{}",
            self.book_id,
            self.page_number,
            PAGE_EXTENSION,
            width = self.digits
        )
    }
}

/// Parse a bare file name such as `novel_page3.webp`
///
/// # Example
///
/// ```
/// use book_binder::naming::parse_page_name;
///
/// let name = parse_page_name("my_book_page12.webp").unwrap();
/// assert_eq!(name.book_id, "my_book");
/// assert_eq!(name.page_number, 12);
/// ```
pub fn parse_page_name(file_name: &str) -> Result<PageName> {
    let caps = PAGE_NAME_RE
        .captures(file_name)
        .ok_or_else(|| Error::FilenameFormat(file_name.to_string()))?;

    let digits = &caps[2];
    let page_number = digits
        .parse::<u32>()
        .map_err(|_| Error::FilenameFormat(file_name.to_string()))?;

    Ok(PageName {
        book_id: caps[1].to_string(),
        page_number,
        digits: digits.len(),
    })
}

/// Parse the file name component of a path
pub fn parse_page_path(path: &Path) -> Result<PageName> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::FilenameFormat(path.display().to_string()))?;

    parse_page_name(file_name)
}

/// Glob pattern (file name only) matching every candidate page of a book
///
/// The book id is escaped so glob metacharacters in it match literally.
pub fn sibling_glob(book_id: &str) -> String {
    format!("{}_page*.{}", glob::Pattern::escape(book_id), PAGE_EXTENSION)
}

/// File name of the table of contents sidecar for a book
pub fn sidecar_file_name(book_id: &str) -> String {
    format!("{}_toc.json", book_id)
}

/// File name of the bound PDF for a book
pub fn output_file_name(book_id: &str) -> String {
    format!("{}.pdf", book_id)
}
