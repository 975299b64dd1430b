//! Table of contents sidecar (`{bookid}_toc.json`)
//!
//! The sidecar is a JSON array of nodes:
//!
//! ```json
//! [{"name": "Chapter 1", "page": "5", "children": [...]}]
//! ```
//!
//! `page` is a logical page number in the same numbering as the page file
//! names. It is usually a string; plain integers are accepted too.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use serde::Deserialize;
use crate::error::{Error, Result};

/// Label used for nodes without a `name`
pub const DEFAULT_TITLE: &str = "Untitled";

fn default_name() -> String {
    DEFAULT_TITLE.to_string()
}

/// Raw `page` field of a node
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PageField {
    Text(String),
    Number(serde_json::Number),
}

impl PageField {
    /// Logical page number, if the field is a non-negative integer
    ///
    /// Text must consist only of ASCII digits; `" 5"`, `"5a"`, `"-1"` and `""`
    /// are not page numbers.
    pub fn page_number(&self) -> Option<u32> {
        match self {
            PageField::Text(s) => {
                if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                    s.parse().ok()
                } else {
                    None
                }
            }
            PageField::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        }
    }
}

/// One entry of the table of contents tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutlineNode {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub page: Option<PageField>,
    #[serde(default)]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Logical page number of this node, if it has a usable one
    pub fn page_number(&self) -> Option<u32> {
        self.page.as_ref().and_then(PageField::page_number)
    }
}

/// Parse a sidecar document
pub fn parse_toc(json: &str) -> serde_json::Result<Vec<OutlineNode>> {
    serde_json::from_str(json)
}

/// Read the sidecar at `path`
///
/// Returns `Ok(None)` when the file does not exist and `Error::Sidecar` when
/// it exists but cannot be read or parsed.
pub fn read_toc(path: &Path) -> Result<Option<Vec<OutlineNode>>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::Sidecar {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    // Editors on Windows like to prepend a BOM
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    parse_toc(text).map(Some).map_err(|e| Error::Sidecar {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
