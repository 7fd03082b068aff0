//! Turns the returned base64 payloads into renderable image sources.

use base64::{engine::general_purpose::STANDARD, Engine};
use eframe::egui::ColorImage;

/// MIME type the analysis service encodes both images with.
pub const IMAGE_MIME: &str = "image/png";

/// Errors raised when turning an image source into pixels.
#[derive(Debug, thiserror::Error)]
pub enum ImageDecodeError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid image data: {0}")]
    Image(#[from] image::ImageError),
}

/// A displayable image, held as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    data_uri: String,
}

impl ImageSource {
    fn prefix() -> String {
        format!("data:{};base64,", IMAGE_MIME)
    }

    /// Wraps a base64 payload without inspecting it.
    pub fn from_base64(payload: &str) -> Self {
        Self {
            data_uri: format!("{}{}", Self::prefix(), payload),
        }
    }

    /// The full `data:image/png;base64,...` URI.
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// The base64 payload with the data URI prefix stripped.
    pub fn payload(&self) -> &str {
        let prefix_len = Self::prefix().len();
        &self.data_uri[prefix_len..]
    }

    /// Raw encoded image bytes.
    pub fn bytes(&self) -> Result<Vec<u8>, ImageDecodeError> {
        Ok(STANDARD.decode(self.payload())?)
    }

    /// Decodes the payload into pixels for texture upload.
    pub fn decode_pixels(&self) -> Result<ColorImage, ImageDecodeError> {
        let bytes = self.bytes()?;
        let rgba = image::load_from_memory(&bytes)?.to_rgba8();
        Ok(ColorImage::from_rgba_unmultiplied(
            [rgba.width() as usize, rgba.height() as usize],
            rgba.as_raw(),
        ))
    }
}

/// The pair of images returned by one successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Generation of the request that produced this result.
    pub generation: u64,
    /// Source satellite image (Sentinel-2 RGB)
    pub source_image: ImageSource,
    /// Predicted deforestation mask
    pub mask_image: ImageSource,
}

/// Wraps the two returned payloads as image sources.
pub fn decode(generation: u64, rgb_base64: &str, mask_base64: &str) -> AnalysisResult {
    AnalysisResult {
        generation,
        source_image: ImageSource::from_base64(rgb_base64),
        mask_image: ImageSource::from_base64(mask_base64),
    }
}
