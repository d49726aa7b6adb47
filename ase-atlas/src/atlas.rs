//! Atlas packing: every composited frame side by side in one buffer

use ase_core::pixels::unpack_rgba;
use ase_core::Document;
use tracing::debug;

use crate::compositor::{CanvasRegion, Compositor};
use crate::{CompositeConfig, Error, Result};

/// Source rectangle of one frame inside the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Row-major packed pixels, straight alpha, bytes `[r, g, b, a]` in
/// little-endian order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl PixelBuffer {
    /// A fully transparent buffer
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.pixels.get(index).copied().map(unpack_rgba)
    }
}

/// Composited frames packed left to right, one rectangle per frame
#[derive(Debug, Clone)]
pub struct Atlas {
    pub buffer: PixelBuffer,
    pub frames: Vec<Rect>,
}

impl Atlas {
    pub fn into_parts(self) -> (PixelBuffer, Vec<Rect>) {
        (self.buffer, self.frames)
    }
}

/// Builds an [`Atlas`] by compositing each frame into its own slice
#[derive(Debug, Clone, Default)]
pub struct AtlasBuilder {
    config: CompositeConfig,
}

impl AtlasBuilder {
    pub fn new(config: CompositeConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, doc: &Document) -> Result<Atlas> {
        let (frame_width, frame_height) = doc.canvas_size();
        let frame_count = doc.frames.len();

        let too_large = || Error::AtlasTooLarge {
            width: frame_width,
            height: frame_height,
            frames: frame_count,
        };
        let atlas_width = u32::try_from(frame_count)
            .ok()
            .and_then(|n| frame_width.checked_mul(n))
            .ok_or_else(too_large)?;
        (atlas_width as usize)
            .checked_mul(frame_height as usize)
            .ok_or_else(too_large)?;

        debug!(
            frames = frame_count,
            width = atlas_width,
            height = frame_height,
            "building atlas"
        );

        let mut buffer = PixelBuffer::transparent(atlas_width, frame_height);
        let mut frames = Vec::with_capacity(frame_count);
        let compositor = Compositor::new(doc, &self.config);

        for index in 0..frame_count {
            let x = index as u32 * frame_width;
            let mut canvas = CanvasRegion::new(
                &mut buffer.pixels,
                atlas_width as usize,
                x as usize,
                frame_width as usize,
                frame_height as usize,
            );
            compositor.composite_frame(index, &mut canvas)?;
            frames.push(Rect {
                x,
                y: 0,
                width: frame_width,
                height: frame_height,
            });
        }

        Ok(Atlas { buffer, frames })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn atlas_size_and_rects_follow_frame_order() {
        let doc = document(
            (5, 3),
            vec![normal_layer("a", 0)],
            vec![vec![], vec![], vec![], vec![]],
        );
        let atlas = AtlasBuilder::default().build(&doc).unwrap();

        assert_eq!((atlas.buffer.width, atlas.buffer.height), (20, 3));
        assert_eq!(atlas.buffer.pixels.len(), 5 * 3 * 4);
        assert_eq!(atlas.frames.len(), 4);
        for (i, rect) in atlas.frames.iter().enumerate() {
            assert_eq!(
                *rect,
                Rect {
                    x: i as u32 * 5,
                    y: 0,
                    width: 5,
                    height: 3
                }
            );
        }
        assert!(atlas
            .frames
            .windows(2)
            .all(|pair| pair[0].x + pair[0].width <= pair[1].x));
    }

    #[test]
    fn frames_do_not_bleed_into_neighbours() {
        let red = [255, 0, 0, 255];
        let doc = document(
            (2, 2),
            vec![normal_layer("a", 0)],
            vec![vec![], vec![solid_cel(0, (1, 0), (4, 4), red)], vec![]],
        );
        let atlas = AtlasBuilder::default().build(&doc).unwrap();
        let buffer = &atlas.buffer;

        for y in 0..2 {
            assert_eq!(buffer.pixel(0, y), Some([0; 4]));
            assert_eq!(buffer.pixel(1, y), Some([0; 4]));
            assert_eq!(buffer.pixel(2, y), Some([0; 4]));
            assert_eq!(buffer.pixel(3, y), Some(red));
            assert_eq!(buffer.pixel(4, y), Some([0; 4]));
            assert_eq!(buffer.pixel(5, y), Some([0; 4]));
        }
        assert_eq!(buffer.pixel(6, 0), None);
    }

    #[test]
    fn empty_document_gives_empty_atlas() {
        let doc = document((4, 4), Vec::new(), Vec::new());
        let atlas = AtlasBuilder::default().build(&doc).unwrap();
        assert_eq!(atlas.buffer.width, 0);
        assert!(atlas.buffer.pixels.is_empty());
        assert!(atlas.frames.is_empty());
    }
}
