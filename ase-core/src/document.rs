//! Decoded document: header, ordered frames and the tables they reference

use std::ops::Range;

use crate::{Cel, ColorProfile, FrameTag, Header, Layer, Palette, UserData};

/// One frame and the chunks decoded from it
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Frame {
    /// Frame duration in milliseconds
    pub duration_ms: u16,
    /// Chunk count resolved from the frame header
    pub chunk_count: u32,
    /// Indices into [`Document::layers`] declared by this frame
    pub layers: Range<usize>,
    /// Indices into [`Document::tags`] declared by this frame
    pub tags: Range<usize>,
    /// Cels in arrival order
    pub cels: Vec<Cel>,
    pub palettes: Vec<Palette>,
    pub color_profiles: Vec<ColorProfile>,
}

impl Frame {
    /// The cel a layer contributes to this frame, if any
    pub fn cel_for_layer(&self, layer_index: u16) -> Option<&Cel> {
        self.cels.iter().find(|cel| cel.layer_index == layer_index)
    }
}

/// A fully decoded sprite. Immutable once [`crate::decode`] returns it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Document {
    pub header: Header,
    pub frames: Vec<Frame>,
    /// Every layer, in declaration order
    pub layers: Vec<Layer>,
    /// Every tag, in declaration order
    pub tags: Vec<FrameTag>,
    /// User data that arrived before any owner in its frame; the first one wins
    pub user_data: Option<UserData>,
}

impl Document {
    /// Canvas size in pixels
    pub fn canvas_size(&self) -> (u32, u32) {
        (u32::from(self.header.width), u32::from(self.header.height))
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn tags(&self) -> &[FrameTag] {
        &self.tags
    }

    /// Finds a tag by name
    pub fn tag(&self, name: &str) -> Option<&FrameTag> {
        self.tags.iter().find(|tag| tag.name == name)
    }

    /// Most recent palette at or before `frame_index`
    pub fn palette_for_frame(&self, frame_index: usize) -> Option<&Palette> {
        self.frames
            .iter()
            .take(frame_index.saturating_add(1))
            .rev()
            .find_map(|frame| frame.palettes.last())
    }

    /// The last palette declared anywhere in the document
    pub fn palette(&self) -> Option<&Palette> {
        self.frames.iter().rev().find_map(|frame| frame.palettes.last())
    }

    /// Total animation length in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.frames
            .iter()
            .map(|frame| u64::from(frame.duration_ms))
            .sum()
    }

    /// Serializes the document structure (without pixel data) as JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
