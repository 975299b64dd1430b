//! Page images to a multi-page PDF using lopdf

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;
use crate::error::{Error, Result};
use crate::load::LoadedPage;
use crate::pdf::text::encode_text_string;

/// Reference resolution used to size pages
pub const DEFAULT_DPI: f32 = 100.0;

/// Resource name of the page image inside each page
const IMAGE_NAME: &[u8] = b"Im0";

const PRODUCER: &str = concat!("book-binder ", env!("CARGO_PKG_VERSION"));

/// An in-memory PDF built from page images
///
/// Owns the document; the outline step borrows it mutably and the writer
/// consumes it.
pub struct AssembledDocument {
    pub(crate) doc: Document,
    pub(crate) catalog_id: ObjectId,
    pub(crate) page_ids: Vec<ObjectId>,
}

impl AssembledDocument {
    /// Number of pages in the document
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Page object ids in document order
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    /// Borrow the underlying lopdf document
    pub fn document(&self) -> &Document {
        &self.doc
    }
}

/// Convert a pixel length to PDF points at `dpi`
pub fn pixels_to_points(pixels: u32, dpi: f32) -> f32 {
    pixels as f32 * 72.0 / dpi
}

/// Build one PDF page per image, in order
///
/// Each page is exactly the size of its image at `dpi` and shows the image
/// full-bleed. The pixel data is embedded unchanged; streams are compressed
/// when the document is written.
pub fn assemble_pages(pages: Vec<LoadedPage>, dpi: f32, title: &str) -> Result<AssembledDocument> {
    if pages.is_empty() {
        return Err(Error::General("No pages to assemble".to_string()));
    }
    if !(dpi.is_finite() && dpi > 0.0) {
        return Err(Error::InvalidDpi(dpi));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(pages.len());

    for page in pages {
        let width = pixels_to_points(page.width, dpi);
        let height = pixels_to_points(page.height, dpi);
        debug!(
            "Page {}: {}x{} px -> {:.1}x{:.1} pt",
            page.page_number, page.width, page.height, width, height
        );

        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => Object::Integer(page.width as i64),
                "Height" => Object::Integer(page.height as i64),
                "ColorSpace" => page.color.color_space(),
                "BitsPerComponent" => Object::Integer(8),
            },
            page.pixels,
        );
        let image_id = doc.add_object(image);

        // Scale the unit square to the page and paint the image into it
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(width),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(height),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width),
                Object::Real(height),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_ids.len() as i64),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let info_id = doc.add_object(dictionary! {
        "Title" => encode_text_string(title),
        "Producer" => encode_text_string(PRODUCER),
    });
    doc.trailer.set("Info", Object::Reference(info_id));

    Ok(AssembledDocument { doc, catalog_id, page_ids })
}
