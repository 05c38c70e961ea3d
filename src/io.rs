// ============================================================================
// FILE I/O — lossless export and arbitrary-image import
// ============================================================================

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, RgbaImage};

use crate::canvas::Surface;

/// Supported export encodings. PNG is the lossless default; JPEG is kept
/// for users who ask for it explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveFormat {
    Png,
    Bmp,
    Jpeg,
}

impl SaveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Png => "png",
            SaveFormat::Bmp => "bmp",
            SaveFormat::Jpeg => "jpg",
        }
    }

    /// Infer a format from a file extension, defaulting to PNG.
    pub fn from_extension(ext: &str) -> SaveFormat {
        match ext.to_lowercase().as_str() {
            "bmp" => SaveFormat::Bmp,
            "jpg" | "jpeg" => SaveFormat::Jpeg,
            _ => SaveFormat::Png,
        }
    }
}

/// Encode the surface and write it to `path`.
pub fn export_surface(surface: &Surface, path: &Path, format: SaveFormat) -> Result<(), String> {
    let bytes = encode_surface(surface, format)?;
    let file =
        File::create(path).map_err(|e| format!("could not create {}: {}", path.display(), e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| format!("could not write {}: {}", path.display(), e))
}

/// Encode the surface to an in-memory byte stream (downloads, tests).
pub fn encode_surface(surface: &Surface, format: SaveFormat) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    let (raw, w, h) = (surface.as_raw(), surface.width(), surface.height());
    match format {
        SaveFormat::Png => {
            let encoder = PngEncoder::new(&mut bytes);
            encoder
                .encode(raw, w, h, ColorType::Rgba8)
                .map_err(|e| format!("PNG encode failed: {}", e))?;
        }
        SaveFormat::Bmp => {
            let mut encoder = BmpEncoder::new(&mut bytes);
            encoder
                .encode(raw, w, h, ColorType::Rgba8)
                .map_err(|e| format!("BMP encode failed: {}", e))?;
        }
        SaveFormat::Jpeg => {
            // JPEG has no alpha channel; flatten onto the opaque buffer.
            let rgb = image::DynamicImage::ImageRgba8(surface.image().clone()).to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut bytes, 90);
            encoder
                .encode(&rgb, w, h, ColorType::Rgb8)
                .map_err(|e| format!("JPEG encode failed: {}", e))?;
        }
    }
    Ok(bytes)
}

/// Decode a user-supplied image file (PNG/JPEG/BMP, any dimensions) into
/// an RGBA buffer suitable for `EditorSession::load_image`.
pub fn load_image(path: &Path) -> Result<RgbaImage, String> {
    let file =
        File::open(path).map_err(|e| format!("could not open {}: {}", path.display(), e))?;
    let reader = BufReader::new(file);
    let decoded = image::io::Reader::new(reader)
        .with_guessed_format()
        .map_err(|e| format!("could not probe {}: {}", path.display(), e))?
        .decode()
        .map_err(|e| format!("could not decode {}: {}", path.display(), e))?;
    Ok(decoded.to_rgba8())
}

/// Decode an in-memory image byte stream of unknown format.
pub fn load_image_bytes(bytes: &[u8]) -> Result<RgbaImage, String> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| format!("could not decode image bytes: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BACKGROUND;
    use image::Rgba;

    #[test]
    fn png_bytes_round_trip_losslessly() {
        let mut s = Surface::new(9, 7, BACKGROUND);
        s.set(2, 5, Rgba([10, 20, 30, 40]));
        let bytes = encode_surface(&s, SaveFormat::Png).unwrap();
        let back = load_image_bytes(&bytes).unwrap();
        assert_eq!(back.as_raw(), s.as_raw());
    }
}
