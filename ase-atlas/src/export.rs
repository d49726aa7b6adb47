//! Conversion of atlas pixels to `image` buffers

use image::{ImageBuffer, RgbaImage};

use crate::atlas::{Atlas, PixelBuffer};

impl PixelBuffer {
    /// Copies the buffer into an [`RgbaImage`]
    pub fn to_rgba_image(&self) -> RgbaImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixel(x, y).unwrap_or([0; 4]))
        })
    }
}

impl Atlas {
    /// Crops frame `index` out of the atlas, `None` if there is no such frame
    pub fn frame_image(&self, index: usize) -> Option<RgbaImage> {
        let rect = self.frames.get(index)?;
        Some(ImageBuffer::from_fn(rect.width, rect.height, |x, y| {
            image::Rgba(
                self.buffer
                    .pixel(rect.x + x, rect.y + y)
                    .unwrap_or([0; 4]),
            )
        }))
    }
}
