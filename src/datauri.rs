//! `data:` URI encoding, used for embedded logos and the conversion request.

use base64::{engine::general_purpose, Engine as _};

use crate::error::ConfigError;

/// `data:<mime>;base64,<payload>`
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}

/// Decodes a base64 `data:` URI. A bare base64 string without the header is
/// accepted too.
pub fn decode(uri: &str) -> Result<Vec<u8>, ConfigError> {
    let payload = match uri.split_once(',') {
        Some((header, payload)) if header.starts_with("data:") && header.ends_with(";base64") => payload,
        Some(_) => return Err(ConfigError::InvalidDataUri),
        None => uri,
    };
    general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|_| ConfigError::InvalidDataUri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_uri() {
        assert_eq!(encode("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_decode_with_and_without_header() {
        assert_eq!(decode("data:image/png;base64,YWJj").unwrap(), b"abc");
        assert_eq!(decode("YWJj").unwrap(), b"abc");
        assert!(decode("data:text/plain,abc").is_err());
        assert!(decode("data:image/png;base64,***").is_err());
    }
}
