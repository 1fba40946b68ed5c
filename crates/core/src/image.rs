//! Taxonomy image codec.
//!
//! Legacy data entry left taxonomy images in three stored shapes: raw bytes
//! (a JSON byte array), a base64 string, or a `$binary` wrapper object
//! carrying either of the two. The canonical representation going forward is
//! the base64 string; the other decoders are read-compatibility shims for
//! documents written before normalization.

use crate::{CoreError, CoreResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::Value;

/// Format assumed when a document carries no `image_format`.
pub const DEFAULT_FORMAT: &str = "svg";

const BINARY_WRAPPER_KEY: &str = "$binary";

/// Maps a declared image format to its MIME type.
///
/// Unrecognized formats fall back to a generic binary type.
pub fn mime_type(format: &str) -> &'static str {
    match format.to_ascii_lowercase().as_str() {
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Decodes a base64 payload supplied by a client.
pub fn decode_base64(data: &str) -> CoreResult<Vec<u8>> {
    BASE64
        .decode(data.trim())
        .map_err(|e| CoreError::InvalidArgument(format!("Invalid image data: {e}")))
}

pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// The canonical stored representation: a base64 string.
pub fn canonical(bytes: &[u8]) -> Value {
    Value::String(encode_base64(bytes))
}

/// Builds a `data:` URL with the MIME prefix derived from `format`.
pub fn data_url(bytes: &[u8], format: &str) -> String {
    format!("data:{};base64,{}", mime_type(format), encode_base64(bytes))
}

/// Normalizes any of the three stored shapes into raw bytes.
pub fn decode_stored(value: &Value) -> CoreResult<Vec<u8>> {
    match value {
        Value::String(text) => decode_base64(text),
        Value::Array(items) => byte_array(items),
        Value::Object(map) => match map.get(BINARY_WRAPPER_KEY) {
            Some(Value::Object(inner)) => match inner.get("base64") {
                Some(Value::String(text)) => decode_base64(text),
                _ => Err(malformed("binary wrapper is missing base64 payload")),
            },
            Some(Value::String(text)) => decode_base64(text),
            Some(Value::Array(items)) => byte_array(items),
            _ => Err(malformed("binary wrapper is missing payload")),
        },
        _ => Err(malformed("unsupported stored image representation")),
    }
}

fn byte_array(items: &[Value]) -> CoreResult<Vec<u8>> {
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| malformed("byte array contains non-byte values"))
        })
        .collect()
}

fn malformed(detail: &str) -> CoreError {
    CoreError::InvalidArgument(format!("Invalid image data: {detail}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_round_trip_base64_string_shape() {
        let stored = canonical(SAMPLE);
        assert_eq!(decode_stored(&stored).unwrap(), SAMPLE);
    }

    #[test]
    fn test_round_trip_byte_array_shape() {
        let stored = json!(SAMPLE);
        assert_eq!(decode_stored(&stored).unwrap(), SAMPLE);
    }

    #[test]
    fn test_round_trip_wrapper_shapes() {
        let nested = json!({"$binary": {"base64": encode_base64(SAMPLE)}});
        assert_eq!(decode_stored(&nested).unwrap(), SAMPLE);

        let flat_text = json!({"$binary": encode_base64(SAMPLE)});
        assert_eq!(decode_stored(&flat_text).unwrap(), SAMPLE);

        let flat_bytes = json!({"$binary": SAMPLE});
        assert_eq!(decode_stored(&flat_bytes).unwrap(), SAMPLE);
    }

    #[test]
    fn test_rejects_malformed_payloads() {
        for value in [
            json!(true),
            json!([300, 1]),
            json!({"$binary": {"wrong": "key"}}),
            json!("not!!valid@@base64"),
        ] {
            let err = decode_stored(&value).expect_err("should reject malformed payload");
            assert!(matches!(err, CoreError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_mime_table() {
        assert_eq!(mime_type("svg"), "image/svg+xml");
        assert_eq!(mime_type("PNG"), "image/png");
        assert_eq!(mime_type("jpg"), "image/jpeg");
        assert_eq!(mime_type("jpeg"), "image/jpeg");
        assert_eq!(mime_type("gif"), "image/gif");
        assert_eq!(mime_type("webp"), "image/webp");
        assert_eq!(mime_type("tiff"), "application/octet-stream");
    }

    #[test]
    fn test_data_url_uses_mime_table() {
        let url = data_url(SAMPLE, "svg");
        assert!(url.starts_with("data:image/svg+xml;base64,"));
        assert!(url.ends_with(&encode_base64(SAMPLE)));
    }
}
