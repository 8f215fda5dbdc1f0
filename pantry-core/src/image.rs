//! Validation for ingredient photos before they are sent to the model.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};

use crate::ai::ImageData;
use crate::error::ImageError;

/// Allowed image formats for ingredient photos.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum file size for photos (5MB).
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Check size and format, returning the detected content type (e.g., "image/jpeg").
pub fn validate_image(data: &[u8]) -> Result<String, ImageError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(ImageError::TooLarge {
            size: data.len(),
            max: MAX_FILE_SIZE,
        });
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::Unreadable(e.to_string()))?;

    let format = reader
        .format()
        .ok_or_else(|| ImageError::Unreadable("Could not detect image format".to_string()))?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(ImageError::UnsupportedFormat(format!("{:?}", format)));
    }

    Ok(format.to_mime_type().to_string())
}

/// Wrap validated bytes for attaching to a model request.
pub fn image_from_bytes(data: Vec<u8>) -> Result<ImageData, ImageError> {
    let mime_type = validate_image(&data)?;
    Ok(ImageData { mime_type, data })
}

/// Read and validate a photo from disk.
pub fn load_image(path: &Path) -> Result<ImageData, ImageError> {
    let data = std::fs::read(path)?;
    image_from_bytes(data)
}
