//! Texture cache for the returned analysis images.
//!
//! Decoding a PNG every frame is wasteful, so both images of the current
//! result are uploaded once and kept until a newer result replaces them.

use crate::analysis::{AnalysisResult, ImageSource};
use eframe::egui::{self, TextureHandle, TextureOptions};

/// A decoded image, or the reason it could not be decoded.
pub type DecodedTexture = Result<TextureHandle, String>;

pub struct ResultTextureCache {
    /// Generation of the result the textures belong to
    generation: Option<u64>,
    source: Option<DecodedTexture>,
    mask: Option<DecodedTexture>,
}

impl Default for ResultTextureCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultTextureCache {
    pub fn new() -> Self {
        Self {
            generation: None,
            source: None,
            mask: None,
        }
    }

    /// Returns true if the cache holds textures for the given result.
    pub fn is_valid(&self, result: &AnalysisResult) -> bool {
        self.generation == Some(result.generation)
    }

    /// Uploads both images of `result` unless already cached.
    pub fn sync(&mut self, ctx: &egui::Context, result: &AnalysisResult) {
        if self.is_valid(result) {
            return;
        }

        log::debug!("Uploading textures for analysis #{}", result.generation);
        self.source = Some(load(ctx, "analysis_source", &result.source_image));
        self.mask = Some(load(ctx, "analysis_mask", &result.mask_image));
        self.generation = Some(result.generation);
    }

    pub fn source(&self) -> Option<&DecodedTexture> {
        self.source.as_ref()
    }

    pub fn mask(&self) -> Option<&DecodedTexture> {
        self.mask.as_ref()
    }
}

fn load(ctx: &egui::Context, name: &str, image: &ImageSource) -> DecodedTexture {
    match image.decode_pixels() {
        Ok(pixels) => Ok(ctx.load_texture(name, pixels, TextureOptions::LINEAR)),
        Err(e) => {
            log::warn!("Failed to decode {}: {}", name, e);
            Err(e.to_string())
        }
    }
}
