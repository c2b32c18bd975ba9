// Base64 transport codec for images
//
// The generative service exchanges images as base64 text. Loaded images are
// serialized to PNG before encoding so exact pixel values survive the round
// trip; file paths are encoded byte-for-byte without re-encoding pixel data.

use base64::{engine::general_purpose, Engine};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::core::errors::{CodecError, CodecResult};

/// Input accepted by [`encode`]: either an on-disk file or a loaded image
#[derive(Debug)]
pub enum ImageSource<'a> {
    Path(&'a Path),
    Image(&'a DynamicImage),
}

/// Serialize an image to PNG bytes without touching the filesystem.
///
/// PNG is lossless, which matters for masks: a lossy format could smear the
/// two sentinel values into intermediate ones.
pub fn png_bytes(image: &DynamicImage) -> CodecResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(CodecError::Encode)?;
    Ok(bytes)
}

/// Encode an image or an image file as base64 text for wire transport.
///
/// A path is read and encoded as-is; a loaded image is serialized to PNG
/// first. Pure transform, no side effects.
pub fn encode(source: ImageSource<'_>) -> CodecResult<String> {
    match source {
        ImageSource::Path(path) => {
            if !path.exists() {
                return Err(CodecError::NotFound {
                    path: path.display().to_string(),
                });
            }
            if !path.is_file() {
                return Err(CodecError::Unsupported {
                    path: path.display().to_string(),
                });
            }
            let bytes = std::fs::read(path).map_err(|source| CodecError::Io {
                path: path.display().to_string(),
                source,
            })?;
            Ok(general_purpose::STANDARD.encode(bytes))
        }
        ImageSource::Image(image) => Ok(general_purpose::STANDARD.encode(png_bytes(image)?)),
    }
}

/// Decode base64 text from a service response back into an image.
pub fn decode(data: &str) -> CodecResult<DynamicImage> {
    let bytes = general_purpose::STANDARD.decode(data)?;
    image::load_from_memory(&bytes).map_err(CodecError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba, RgbaImage};

    #[test]
    fn test_round_trip_preserves_exact_pixels() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        img.put_pixel(2, 1, Rgba([200, 0, 100, 255]));
        let original = DynamicImage::ImageRgba8(img);

        let encoded = encode(ImageSource::Image(&original)).unwrap();
        let decoded = decode(&encoded).unwrap();

        assert_eq!(decoded.to_rgba8().as_raw(), original.to_rgba8().as_raw());
    }

    #[test]
    fn test_round_trip_preserves_binary_mask_values() {
        let mask = image::GrayImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        });
        let original = DynamicImage::ImageLuma8(mask);

        let encoded = encode(ImageSource::Image(&original)).unwrap();
        let decoded = decode(&encoded).unwrap().to_luma8();

        assert!(decoded.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let result = encode(ImageSource::Path(Path::new("/nonexistent/input.png")));
        assert!(matches!(result, Err(CodecError::NotFound { .. })));
    }

    #[test]
    fn test_directory_path_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let result = encode(ImageSource::Path(dir.path()));
        assert!(matches!(result, Err(CodecError::Unsupported { .. })));
    }

    #[test]
    fn test_path_encodes_raw_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.png");
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255])));
        image.save(&path).unwrap();

        let encoded = encode(ImageSource::Path(&path)).unwrap();
        let raw = std::fs::read(&path).unwrap();
        assert_eq!(encoded, general_purpose::STANDARD.encode(raw));
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        assert!(matches!(
            decode("not valid base64!!!"),
            Err(CodecError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_image_payload() {
        let payload = general_purpose::STANDARD.encode(b"plain text, not an image");
        assert!(matches!(decode(&payload), Err(CodecError::Malformed(_))));
    }
}
