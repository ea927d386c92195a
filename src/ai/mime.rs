//! Image payload sniffing and `data:` URI encoding for primary-model output.

use base64::Engine as _;

const FALLBACK_MIME: &str = "image/png";

/// Magic-number prefixes; `None` bytes match anything.
const SIGNATURES: &[(&[Option<u8>], &str)] = &[
    (&[Some(0xFF), Some(0xD8), Some(0xFF)], "image/jpeg"),
    (&[Some(0x89), Some(b'P'), Some(b'N'), Some(b'G')], "image/png"),
    (&[Some(b'G'), Some(b'I'), Some(b'F'), Some(b'8')], "image/gif"),
    (
        &[
            Some(b'R'),
            Some(b'I'),
            Some(b'F'),
            Some(b'F'),
            None,
            None,
            None,
            None,
            Some(b'W'),
            Some(b'E'),
            Some(b'B'),
            Some(b'P'),
        ],
        "image/webp",
    ),
];

fn matches(bytes: &[u8], signature: &[Option<u8>]) -> bool {
    bytes.len() >= signature.len()
        && signature
            .iter()
            .zip(bytes)
            .all(|(expected, actual)| expected.map_or(true, |b| b == *actual))
}

/// MIME type of an encoded image, falling back to PNG for unknown payloads.
pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    SIGNATURES
        .iter()
        .find(|(signature, _)| matches(bytes, signature))
        .map(|(_, mime)| *mime)
        .unwrap_or_else(|| {
            tracing::warn!(
                "Unknown image signature {:02X?}, labelling as {}",
                &bytes[..bytes.len().min(4)],
                FALLBACK_MIME
            );
            FALLBACK_MIME
        })
}

pub fn to_data_uri(bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        detect_image_mime(bytes),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_signatures() {
        assert_eq!(detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(detect_image_mime(b"\x89PNG\r\n\x1a\n"), "image/png");
        assert_eq!(detect_image_mime(b"GIF89a"), "image/gif");
        assert_eq!(detect_image_mime(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
    }

    #[test]
    fn test_truncated_or_unknown_falls_back_to_png() {
        assert_eq!(detect_image_mime(b"RIFF\0\0"), "image/png");
        assert_eq!(detect_image_mime(&[]), "image/png");
    }

    #[test]
    fn test_data_uri_for_jpeg() {
        assert_eq!(to_data_uri(&[0xFF, 0xD8, 0xFF]), "data:image/jpeg;base64,/9j/");
    }
}
