// ============================================================================
// SHARE CODEC — canvas state ⇄ compact URL-safe payload
// ============================================================================
//
// Payload pipeline: surface → lossless PNG bytes → base64 field of a JSON
// record `{image, width, height}` → DEFLATE → URL-safe base64 (no padding).
// Decoding reverses every step and fails atomically: a bad payload yields a
// ShareError and the caller's surface is never touched. Applying a decoded
// image to the session is an explicit separate step.

use std::fmt;
use std::io::{Read, Write};

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::canvas::Surface;

/// JSON record embedded in the compressed payload.
#[derive(Serialize, Deserialize)]
struct ShareRecord {
    /// Base64 (standard alphabet) PNG bytes.
    image: String,
    width: u32,
    height: u32,
}

/// Result of a successful decode. Callers apply it to a surface of the
/// recorded dimensions themselves.
pub struct DecodedShare {
    pub image: RgbaImage,
    pub width: u32,
    pub height: u32,
}

// ----------------------------------------------------------------------------
// Errors
// ----------------------------------------------------------------------------

/// Why a payload could not be produced or understood.
#[derive(Debug)]
pub enum ShareError {
    /// The outer URL-safe base64 layer did not decode.
    Transport(base64::DecodeError),
    /// DEFLATE (de)compression failed.
    Compression(std::io::Error),
    /// The JSON record was malformed.
    Record(serde_json::Error),
    /// The embedded PNG failed to encode or decode.
    Image(image::ImageError),
    /// The PNG's dimensions disagree with the record's.
    DimensionMismatch {
        recorded: (u32, u32),
        actual: (u32, u32),
    },
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareError::Transport(e) => write!(f, "payload is not valid base64: {}", e),
            ShareError::Compression(e) => write!(f, "payload compression error: {}", e),
            ShareError::Record(e) => write!(f, "payload record is malformed: {}", e),
            ShareError::Image(e) => write!(f, "payload image error: {}", e),
            ShareError::DimensionMismatch { recorded, actual } => write!(
                f,
                "payload dimensions {}x{} do not match image {}x{}",
                recorded.0, recorded.1, actual.0, actual.1
            ),
        }
    }
}

impl std::error::Error for ShareError {}

// ----------------------------------------------------------------------------
// Encode / decode
// ----------------------------------------------------------------------------

/// Serialize the surface into a shareable payload string.
pub fn encode(surface: &Surface) -> Result<String, ShareError> {
    let mut png = Vec::new();
    let encoder = PngEncoder::new(&mut png);
    encoder
        .encode(
            surface.as_raw(),
            surface.width(),
            surface.height(),
            ColorType::Rgba8,
        )
        .map_err(ShareError::Image)?;

    let record = ShareRecord {
        image: STANDARD.encode(&png),
        width: surface.width(),
        height: surface.height(),
    };
    let json = serde_json::to_vec(&record).map_err(ShareError::Record)?;

    let mut deflater = DeflateEncoder::new(Vec::new(), Compression::default());
    deflater.write_all(&json).map_err(ShareError::Compression)?;
    let compressed = deflater.finish().map_err(ShareError::Compression)?;

    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Parse a payload string back into pixels. Never mutates any surface.
pub fn decode(payload: &str) -> Result<DecodedShare, ShareError> {
    let compressed = URL_SAFE_NO_PAD
        .decode(payload.trim())
        .map_err(ShareError::Transport)?;

    let mut json = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(ShareError::Compression)?;

    let record: ShareRecord = serde_json::from_slice(&json).map_err(ShareError::Record)?;

    let png = STANDARD
        .decode(record.image.as_bytes())
        .map_err(ShareError::Transport)?;
    let image = image::load_from_memory_with_format(&png, ImageFormat::Png)
        .map_err(ShareError::Image)?
        .to_rgba8();

    if (image.width(), image.height()) != (record.width, record.height) {
        return Err(ShareError::DimensionMismatch {
            recorded: (record.width, record.height),
            actual: (image.width(), image.height()),
        });
    }

    Ok(DecodedShare {
        width: record.width,
        height: record.height,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BACKGROUND;
    use image::Rgba;

    #[test]
    fn garbage_payload_is_rejected() {
        assert!(decode("not!!valid@@payload").is_err());
        // Valid base64 that is not DEFLATE data.
        assert!(decode("aGVsbG8gd29ybGQ").is_err());
    }

    #[test]
    fn payload_is_url_safe() {
        let mut s = Surface::new(32, 32, BACKGROUND);
        s.set(3, 3, Rgba([1, 2, 3, 4]));
        let payload = encode(&s).unwrap();
        assert!(payload
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
