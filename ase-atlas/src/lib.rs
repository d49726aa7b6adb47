//! Aseprite Atlas Library
//!
//! This library flattens a decoded [`ase_core::Document`] into a single wide
//! pixel atlas: every frame composited bottom layer first, then packed side
//! by side with one source rectangle per frame.

pub mod atlas;
pub mod blend;
pub mod compositor;
pub mod export;

#[cfg(test)]
mod test_support;

use ase_core::{BlendMode, Document};

pub use atlas::{Atlas, AtlasBuilder, PixelBuffer, Rect};
pub use blend::Blender;
pub use compositor::Compositor;

/// Result type for ase-atlas operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ase-atlas operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Aseprite core error: {0}")]
    Core(#[from] ase_core::Error),

    #[error("layer {layer} uses unsupported blend mode {mode:?}")]
    UnsupportedBlendMode { layer: usize, mode: BlendMode },

    #[error("atlas of {frames} frames at {width}x{height} is too large")]
    AtlasTooLarge {
        width: u32,
        height: u32,
        frames: usize,
    },
}

/// Compositing options
#[derive(Debug, Clone)]
pub struct CompositeConfig {
    /// Draw layers even when they or an ancestor group are hidden
    pub include_hidden_layers: bool,
    /// Layers whose name starts with this are metadata and never drawn
    pub metadata_prefix: char,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            include_hidden_layers: false,
            metadata_prefix: '@',
        }
    }
}

/// Composites every frame of `doc` into one atlas with the default options
pub fn composite(doc: &Document) -> Result<(PixelBuffer, Vec<Rect>)> {
    composite_with(doc, &CompositeConfig::default())
}

#[tracing::instrument(skip_all, fields(frames = doc.frames.len(), layers = doc.layers.len()))]
pub fn composite_with(doc: &Document, config: &CompositeConfig) -> Result<(PixelBuffer, Vec<Rect>)> {
    let atlas = AtlasBuilder::new(config.clone()).build(doc)?;
    Ok(atlas.into_parts())
}
