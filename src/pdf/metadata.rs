//! PDF metadata extraction

use std::collections::{HashMap, HashSet};
use std::path::Path;
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::{Error, Result};
use crate::pdf::text::decode_text_string;

/// Count pages by reading the Count field from the Pages dictionary
/// This is more reliable than get_pages() which doesn't handle nested page trees
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let catalog = catalog(doc)?;

    let pages_id = catalog.get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| Error::General("No Pages reference in catalog".to_string()))?;

    let pages_dict = doc.get_object(pages_id)?
        .as_dict()
        .map_err(|_| Error::General("Pages is not a dictionary".to_string()))?;

    match pages_dict.get(b"Count") {
        Ok(Object::Integer(n)) => Ok(*n as usize),
        Ok(_) => Err(Error::General("Count is not an integer".to_string())),
        Err(_) => Err(Error::General("No Count in Pages".to_string())),
    }
}

fn catalog(doc: &Document) -> Result<&Dictionary> {
    let catalog_id = doc.trailer.get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| Error::General("No Root reference in trailer".to_string()))?;

    doc.get_object(catalog_id)?
        .as_dict()
        .map_err(|_| Error::General("Catalog is not a dictionary".to_string()))
}

/// One bookmark read back from a PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntryInfo {
    /// Nesting depth, 0 for top-level bookmarks
    pub level: usize,
    pub title: String,
    /// Zero-based target page, if the destination resolves to a page
    pub page_index: Option<usize>,
}

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Document title (if present)
    pub title: Option<String>,
    /// Bookmarks in pre-order
    pub outline: Vec<OutlineEntryInfo>,
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;

    // Use catalog-based counting for accuracy
    let page_count = count_pages_from_catalog(&doc)?;

    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    let title = doc.trailer.get(b"Info")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_object(id))
        .and_then(Object::as_dict)
        .and_then(|info| info.get(b"Title"))
        .and_then(Object::as_str)
        .map(decode_text_string)
        .ok();

    Ok(PdfMetadata {
        page_count,
        title,
        outline: read_outline(&doc)?,
    })
}

/// Count the number of pages in a PDF file
///
/// This is a quick operation that reads the Count field from the Pages dictionary.
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;

    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(page_count)
}

/// Walk the document outline in pre-order
pub fn read_outline(doc: &Document) -> Result<Vec<OutlineEntryInfo>> {
    let mut entries = Vec::new();

    let Ok(outlines_id) = catalog(doc)?.get(b"Outlines").and_then(Object::as_reference) else {
        return Ok(entries);
    };
    let outlines = doc.get_object(outlines_id)?.as_dict()?;

    let page_indices: HashMap<ObjectId, usize> = doc
        .get_pages()
        .into_values()
        .enumerate()
        .map(|(index, id)| (id, index))
        .collect();

    let mut seen = HashSet::new();
    if let Ok(first) = outlines.get(b"First").and_then(Object::as_reference) {
        walk_siblings(doc, first, 0, &page_indices, &mut seen, &mut entries)?;
    }

    Ok(entries)
}

fn walk_siblings(
    doc: &Document,
    first: ObjectId,
    level: usize,
    page_indices: &HashMap<ObjectId, usize>,
    seen: &mut HashSet<ObjectId>,
    entries: &mut Vec<OutlineEntryInfo>,
) -> Result<()> {
    let mut current = Some(first);

    while let Some(id) = current {
        // Malformed outlines can loop
        if !seen.insert(id) {
            break;
        }
        let item = doc.get_object(id)?.as_dict()?;

        let title = item.get(b"Title")
            .and_then(Object::as_str)
            .map(decode_text_string)
            .unwrap_or_default();

        let page_index = destination_page(item)
            .and_then(|page_id| page_indices.get(&page_id).copied());

        entries.push(OutlineEntryInfo { level, title, page_index });

        if let Ok(child) = item.get(b"First").and_then(Object::as_reference) {
            walk_siblings(doc, child, level + 1, page_indices, seen, entries)?;
        }

        current = item.get(b"Next").and_then(Object::as_reference).ok();
    }

    Ok(())
}

/// Page reference of an outline item's `/Dest` or `/A /GoTo` action
fn destination_page(item: &Dictionary) -> Option<ObjectId> {
    let dest = item.get(b"Dest").ok().or_else(|| {
        item.get(b"A")
            .and_then(Object::as_dict)
            .and_then(|action| action.get(b"D"))
            .ok()
    })?;

    dest.as_array().ok()?.first()?.as_reference().ok()
}
