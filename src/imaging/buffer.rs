//! The working image as an encoded byte sequence.
//!
//! Every transform takes an [`ImageBuffer`] and returns a new one; nothing is
//! mutated in place. The bytes are always PNG so a round trip through
//! [`ImageBuffer::decode`] / [`ImageBuffer::encode`] is lossless.

use super::calculations::thumbnail_dimensions;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BufferError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {source_name}: {reason}")]
    Decode { source_name: String, reason: String },
    #[error("Failed to encode {format}: {reason}")]
    Encode { format: &'static str, reason: String },
}

/// PNG-encoded image bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer(Vec<u8>);

impl ImageBuffer {
    /// Wrap bytes that are expected to be PNG. Nothing is validated until
    /// the buffer is decoded.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Encode a decoded image as PNG.
    pub fn encode(image: &DynamicImage) -> Result<Self, BufferError> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| BufferError::Encode {
                format: "PNG",
                reason: e.to_string(),
            })?;
        Ok(Self(bytes))
    }

    /// Read any supported image file from disk and re-encode it as PNG.
    pub fn open(path: &Path) -> Result<Self, BufferError> {
        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BufferError::Decode {
                source_name: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Self::encode(&image)
    }

    pub fn decode(&self) -> Result<DynamicImage, BufferError> {
        image::load_from_memory_with_format(&self.0, ImageFormat::Png).map_err(|e| {
            BufferError::Decode {
                source_name: "image buffer".to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Read the width and height from the PNG header without decoding pixels.
    pub fn dimensions(&self) -> Result<(u32, u32), BufferError> {
        ImageReader::with_format(Cursor::new(&self.0), ImageFormat::Png)
            .into_dimensions()
            .map_err(|e| BufferError::Decode {
                source_name: "image buffer".to_string(),
                reason: e.to_string(),
            })
    }

    /// Write the PNG bytes to `path` unchanged.
    pub fn save(&self, path: &Path) -> Result<(), BufferError> {
        std::fs::write(path, &self.0)?;
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageBuffer({} bytes)", self.0.len())
    }
}

/// Downsample a buffer for display: the longer edge becomes `size`.
///
/// Nearest-neighbor sampling; previews favor speed over smoothness.
pub fn thumbnail(buffer: &ImageBuffer, size: u32) -> Result<ImageBuffer, BufferError> {
    let image = buffer.decode()?;
    let (w, h) = thumbnail_dimensions((image.width(), image.height()), size);
    ImageBuffer::encode(&image.resize_exact(w, h, FilterType::Nearest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_image, write_jpeg};
    use image::GenericImageView;

    #[test]
    fn png_roundtrip_preserves_pixels() {
        let original = gradient_image(64, 48);
        let buffer = ImageBuffer::encode(&original).unwrap();
        let decoded = buffer.decode().unwrap();
        assert_eq!(decoded.to_rgba8(), original.to_rgba8());
    }

    #[test]
    fn dimensions_reads_png_header() {
        let buffer = ImageBuffer::encode(&gradient_image(120, 80)).unwrap();
        assert_eq!(buffer.dimensions().unwrap(), (120, 80));
    }

    #[test]
    fn open_reencodes_jpeg_as_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("photo.jpg");
        write_jpeg(&path, 40, 30);

        let buffer = ImageBuffer::open(&path).unwrap();
        assert!(buffer.as_bytes().starts_with(b"\x89PNG"));
        assert_eq!(buffer.dimensions().unwrap(), (40, 30));
    }

    #[test]
    fn open_nonexistent_file_is_io_error() {
        let result = ImageBuffer::open(Path::new("/nonexistent/photo.png"));
        assert!(matches!(result, Err(BufferError::Io(_))));
    }

    #[test]
    fn open_garbage_is_decode_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("notes.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let result = ImageBuffer::open(&path);
        assert!(matches!(result, Err(BufferError::Decode { .. })));
    }

    #[test]
    fn decode_rejects_non_png_bytes() {
        let buffer = ImageBuffer::from_bytes(b"garbage".to_vec());
        assert!(buffer.decode().is_err());
    }

    #[test]
    fn save_writes_exact_bytes() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.png");
        let buffer = ImageBuffer::encode(&gradient_image(10, 10)).unwrap();

        buffer.save(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), buffer.as_bytes());
    }

    #[test]
    fn thumbnail_scales_longer_edge() {
        let buffer = ImageBuffer::encode(&gradient_image(1000, 800)).unwrap();
        let thumb = thumbnail(&buffer, 500).unwrap();
        assert_eq!(thumb.dimensions().unwrap(), (500, 400));
    }

    #[test]
    fn thumbnail_portrait() {
        let buffer = ImageBuffer::encode(&gradient_image(60, 120)).unwrap();
        let thumb = thumbnail(&buffer, 500).unwrap();
        let decoded = thumb.decode().unwrap();
        assert_eq!(decoded.dimensions(), (250, 500));
    }

    #[test]
    fn debug_shows_size_not_bytes() {
        let buffer = ImageBuffer(vec![0; 12]);
        assert_eq!(format!("{buffer:?}"), "ImageBuffer(12 bytes)");
    }
}
