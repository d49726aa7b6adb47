//! Aseprite Core Library
//!
//! This library decodes the chunked binary sprite format written by Aseprite
//! into an immutable in-memory [`Document`]: the fixed header, every frame,
//! and the typed chunks each frame carries (layers, cels, palettes, color
//! profiles, tags and user data).
//!
//! Unknown chunk types are skipped, never rejected: every chunk's declared
//! length is authoritative and the decoder always resumes at the end of it.

pub mod chunk;
pub mod chunks;
pub mod cursor;
pub mod decoder;
pub mod document;
pub mod header;
pub mod pixels;

#[cfg(test)]
mod test_support;

pub use chunks::cel::{Cel, CelContent, ImageCel, TilemapCel};
pub use chunk::ChunkType;
pub use chunks::color_profile::{ColorProfile, ColorProfileKind};
pub use chunks::layer::{BlendMode, Layer, LayerFlags, LayerType};
pub use chunks::palette::{Color, Palette, PaletteEntry, PaletteKind};
pub use chunks::tags::{FrameTag, LoopMode};
pub use chunks::user_data::UserData;
pub use cursor::ByteCursor;
pub use decoder::decode;
pub use document::{Document, Frame};
pub use header::{ColorDepth, Grid, Header};
pub use pixels::PixelData;

/// Result type for ase-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ase-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("format error: {0}")]
    Format(String),

    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    UnexpectedEndOfData {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("string at offset {offset:#x} is not valid UTF-8: {source}")]
    InvalidString {
        offset: usize,
        source: std::string::FromUtf8Error,
    },

    #[error("decode error: {0}")]
    Decode(String),
}

impl Error {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}
