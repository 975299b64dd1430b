//! PDF text strings (titles, outline labels)

use lopdf::{Object, StringFormat};

const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Encode `text` as a PDF text string
///
/// ASCII goes out as a literal string. Anything else is UTF-16BE with a
/// byte order mark, which every reader understands.
pub fn encode_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }

    let mut bytes = UTF16BE_BOM.to_vec();
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Decode a PDF text string written by [`encode_text_string`] or another producer
///
/// Non-UTF-16 strings are treated as UTF-8 with lossy replacement, which is
/// exact for ASCII.
pub fn decode_text_string(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&UTF16BE_BOM) {
        Some(rest) => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}
