//! The bind pipeline: seed file → collected pages → PDF with outline

use std::path::{Path, PathBuf};
use tracing::{info, warn};
use crate::collect::collect_pages;
use crate::error::{Error, Result};
use crate::load::load_pages;
use crate::naming::{output_file_name, parse_page_path, sidecar_file_name};
use crate::pdf::{assemble_pages, attach_outline, plan_outline, write_pdf, DEFAULT_DPI};
use crate::toc::read_toc;

/// Options for binding one book
#[derive(Debug, Clone)]
pub struct BindOptions {
    /// Any page of the book; its page number is the logical start page
    pub seed_path: PathBuf,
    /// Table of contents sidecar, defaults to `{bookid}_toc.json` beside the pages
    pub toc_path: Option<PathBuf>,
    /// Output PDF, defaults to `{bookid}.pdf` beside the pages
    pub output_path: Option<PathBuf>,
    /// Reference resolution for page sizes
    pub dpi: f32,
    /// Attach bookmarks when a sidecar is available
    pub outline: bool,
}

impl BindOptions {
    /// Options with defaults: 100 DPI, outline on, sidecar and output beside the pages
    pub fn new(seed_path: impl Into<PathBuf>) -> Self {
        Self {
            seed_path: seed_path.into(),
            toc_path: None,
            output_path: None,
            dpi: DEFAULT_DPI,
            outline: true,
        }
    }
}

/// What happened to the bookmark outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineStatus {
    /// Outline generation was turned off
    Disabled,
    /// No sidecar at the given path
    Missing(PathBuf),
    /// Sidecar could not be used; the PDF has no outline
    Invalid(String),
    /// Bookmarks written (may be zero if no entry resolved to a page)
    Attached(usize),
}

/// Summary of a successful bind
#[derive(Debug, Clone)]
pub struct BindReport {
    pub book_id: String,
    pub start_page: u32,
    pub output_path: PathBuf,
    /// Pages in the written PDF
    pub page_count: usize,
    /// Page files that could not be loaded
    pub skipped: Vec<PathBuf>,
    pub outline: OutlineStatus,
}

/// Bind every page of the seed's book into one PDF
///
/// # Example
///
/// ```no_run
/// use book_binder::bind::{bind_book, BindOptions};
///
/// let report = bind_book(&BindOptions::new("scans/novel_page1.webp"))
///     .expect("Failed to bind");
/// println!("{} pages -> {}", report.page_count, report.output_path.display());
/// ```
pub fn bind_book(options: &BindOptions) -> Result<BindReport> {
    if !(options.dpi.is_finite() && options.dpi > 0.0) {
        return Err(Error::InvalidDpi(options.dpi));
    }

    let seed = parse_page_path(&options.seed_path)?;
    let book_id = seed.book_id;
    let start_page = seed.page_number;
    info!("Book '{}', start page {}", book_id, start_page);

    let dir = source_dir(&options.seed_path);
    let pages = collect_pages(&dir, &book_id)?;
    info!("Found {} page files", pages.len());

    let loaded = load_pages(&pages)?;
    let skipped: Vec<PathBuf> = loaded.failures.into_iter().map(|(path, _)| path).collect();

    info!("Assembling PDF from {} images", loaded.pages.len());
    let mut assembled = assemble_pages(loaded.pages, options.dpi, &book_id)?;
    let page_count = assembled.page_count();

    let outline = if options.outline {
        let toc_path = options
            .toc_path
            .clone()
            .unwrap_or_else(|| dir.join(sidecar_file_name(&book_id)));

        match read_toc(&toc_path) {
            Ok(Some(nodes)) => {
                let plan = plan_outline(&nodes, start_page, page_count);
                let written = attach_outline(&mut assembled, &plan)?;
                info!("Added {} bookmarks from {}", written, toc_path.display());
                OutlineStatus::Attached(written)
            }
            Ok(None) => {
                info!("No table of contents at {}, writing without bookmarks", toc_path.display());
                OutlineStatus::Missing(toc_path)
            }
            Err(e) => {
                warn!("{}; writing without bookmarks", e);
                OutlineStatus::Invalid(e.to_string())
            }
        }
    } else {
        OutlineStatus::Disabled
    };

    let output_path = options
        .output_path
        .clone()
        .unwrap_or_else(|| dir.join(output_file_name(&book_id)));
    write_pdf(assembled, &output_path)?;
    info!("Wrote {}", output_path.display());

    Ok(BindReport {
        book_id,
        start_page,
        output_path,
        page_count,
        skipped,
        outline,
    })
}

/// Directory holding the seed file; a bare file name means the current directory
fn source_dir(seed_path: &Path) -> PathBuf {
    match seed_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
