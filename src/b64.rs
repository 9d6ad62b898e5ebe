//! Chunked base64-to-buffer conversion.
//!
//! The fallback provider yields its image as a base64 data URI; this module
//! converts the raw payload back into binary image bytes. The decoded bytes
//! are assembled segment by segment so no single intermediate allocation has
//! to cover the whole image.

use base64::Engine as Base64Engine;

use crate::capture::ImageBuffer;
use crate::error::{Error, Result};

/// Default segment size used when assembling the decoded bytes
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Decode a base64 payload into an image buffer tagged with `mime_type`.
pub fn decode(payload: &str, mime_type: &str) -> Result<ImageBuffer> {
    decode_chunked(payload, mime_type, DEFAULT_CHUNK_SIZE)
}

/// Decode a base64 payload, assembling the output in `chunk_size` segments.
///
/// Pure: the same payload always yields byte-identical output, and the chunk
/// size never affects the result. The only failure is malformed base64.
pub fn decode_chunked(payload: &str, mime_type: &str, chunk_size: usize) -> Result<ImageBuffer> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| Error::Decode(format!("Malformed base64 payload: {}", e)))?;

    let chunk_size = chunk_size.max(1);
    let mut segments: Vec<Vec<u8>> = Vec::with_capacity(bytes.len() / chunk_size + 1);
    for slice in bytes.chunks(chunk_size) {
        segments.push(slice.to_vec());
    }

    let mut data = Vec::with_capacity(bytes.len());
    for segment in &segments {
        data.extend_from_slice(segment);
    }

    Ok(ImageBuffer {
        content_type: mime_type.to_string(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn round_trip_preserves_bytes() {
        let original: Vec<u8> = (0u8..=255).collect();
        let payload = encode(&original);
        let buffer = decode(&payload, "image/png").unwrap();
        assert_eq!(buffer.data, original);
        assert_eq!(buffer.content_type, "image/png");
    }

    #[test]
    fn chunk_size_does_not_affect_output() {
        let original = b"a moderately sized payload that spans several chunks".repeat(40);
        let payload = encode(&original);
        let by_default = decode_chunked(&payload, "image/png", DEFAULT_CHUNK_SIZE).unwrap();
        let byte_at_a_time = decode_chunked(&payload, "image/png", 1).unwrap();
        assert_eq!(by_default.data, byte_at_a_time.data);
        assert_eq!(by_default.data, original);
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let payload = encode(b"abc");
        let buffer = decode_chunked(&payload, "text/plain", 0).unwrap();
        assert_eq!(buffer.data, b"abc");
    }

    #[test]
    fn empty_payload_yields_empty_buffer() {
        let buffer = decode("", "image/png").unwrap();
        assert!(buffer.data.is_empty());
    }

    #[test]
    fn malformed_base64_is_a_decode_error() {
        let err = decode("not;;;base64!!", "image/png").unwrap_err();
        match err {
            Error::Decode(msg) => assert!(msg.contains("base64")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
