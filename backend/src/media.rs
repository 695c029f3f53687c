//! Inline image rendering
//!
//! Stored avatar and recipe image bytes are returned to the browser as
//! `data:` URIs so they can be dropped straight into an `<img src>`.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Guess an image MIME type from its leading bytes
///
/// Anything unrecognised is labelled JPEG.
pub fn sniff_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/jpeg",
    }
}

/// Encode image bytes as a `data:` URI
pub fn data_uri(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_image_mime(bytes), STANDARD.encode(bytes))
}

/// `data_uri` for an optional blob
pub fn optional_data_uri(bytes: Option<&[u8]>) -> Option<String> {
    bytes.filter(|b| !b.is_empty()).map(data_uri)
}
