//! PDF assembly, outline and inspection module

pub mod assemble;
pub mod metadata;
pub mod outline;
pub mod text;
pub mod write;

// Re-export commonly used items
pub use assemble::{assemble_pages, AssembledDocument, DEFAULT_DPI};
pub use metadata::{count_pages, extract_metadata, read_outline, OutlineEntryInfo, PdfMetadata};
pub use outline::{attach_outline, plan_outline, OutlineEntry, OutlinePlan};
pub use write::write_pdf;
