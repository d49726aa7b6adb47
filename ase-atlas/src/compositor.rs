//! Frame compositor for flattening layers

use ase_core::pixels::unpack_rgba;
use ase_core::{Cel, CelContent, ColorDepth, Document, ImageCel, Layer, LayerFlags, Palette};
use tracing::{trace, warn};

use crate::blend::{Blender, Rgba8};
use crate::{CompositeConfig, Error, Result};

/// A canvas-sized window into a wider pixel buffer
pub struct CanvasRegion<'b> {
    pixels: &'b mut [u32],
    stride: usize,
    x_offset: usize,
    width: usize,
    height: usize,
}

impl<'b> CanvasRegion<'b> {
    /// Views `width x height` pixels of `pixels`, starting at column `x_offset`
    /// of a buffer whose rows are `stride` pixels long
    pub fn new(
        pixels: &'b mut [u32],
        stride: usize,
        x_offset: usize,
        width: usize,
        height: usize,
    ) -> Self {
        debug_assert!(x_offset + width <= stride);
        debug_assert!(stride * height <= pixels.len());
        Self {
            pixels,
            stride,
            x_offset,
            width,
            height,
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.stride + self.x_offset + x
    }

    fn get(&self, x: usize, y: usize) -> Rgba8 {
        unpack_rgba(self.pixels[self.index(x, y)])
    }

    fn set(&mut self, x: usize, y: usize, color: Rgba8) {
        let index = self.index(x, y);
        self.pixels[index] = u32::from_le_bytes(color);
    }
}

/// Flattens the cels of one frame onto a canvas
pub struct Compositor<'d> {
    doc: &'d Document,
    config: &'d CompositeConfig,
}

impl<'d> Compositor<'d> {
    pub fn new(doc: &'d Document, config: &'d CompositeConfig) -> Self {
        Self { doc, config }
    }

    /// Composites frame `frame_index` into `canvas`, bottom layer first
    pub fn composite_frame(&self, frame_index: usize, canvas: &mut CanvasRegion<'_>) -> Result<()> {
        let Some(frame) = self.doc.frame(frame_index) else {
            return Ok(());
        };
        let palette = self.doc.palette_for_frame(frame_index);

        // Stable, so cels on the same layer keep their arrival order.
        let mut cels: Vec<&'d Cel> = frame.cels.iter().collect();
        cels.sort_by_key(|cel| cel.layer_index);

        for cel in cels {
            let layer_index = usize::from(cel.layer_index);
            let Some(layer) = self.doc.layer(layer_index) else {
                warn!(frame = frame_index, layer = layer_index, "cel references a missing layer");
                continue;
            };

            if layer.name.starts_with(self.config.metadata_prefix) || layer.is_group() {
                continue;
            }
            if !self.config.include_hidden_layers && !self.is_visible(layer_index) {
                trace!(frame = frame_index, layer = layer_index, "layer hidden, skipping cel");
                continue;
            }

            let blender = Blender::for_mode(layer.blend_mode).ok_or(Error::UnsupportedBlendMode {
                layer: layer_index,
                mode: layer.blend_mode,
            })?;

            let layer_opacity = if self.doc.header.layer_opacity_valid() {
                layer.opacity
            } else {
                255
            };
            let opacity = layer_opacity.min(cel.opacity);
            if opacity == 0 {
                continue;
            }

            let Some(image) = self.resolve_image(frame_index, cel) else {
                continue;
            };
            let source = SourceColors {
                depth: image.pixels.depth,
                palette,
                transparent_index: (!layer.flags.contains(LayerFlags::BACKGROUND))
                    .then_some(self.doc.header.transparent_index),
            };
            draw(canvas, cel, image, &source, blender, opacity);
        }

        Ok(())
    }

    /// Whether a layer and every ancestor are visible
    pub fn is_visible(&self, layer_index: usize) -> bool {
        let layers = &self.doc.layers;
        let mut index = layer_index;
        loop {
            if !layers[index].is_visible() {
                return false;
            }
            match parent_of(layers, index) {
                Some(parent) => index = parent,
                None => return true,
            }
        }
    }

    /// Follows linked cels to the pixel block they share
    fn resolve_image(&self, frame_index: usize, cel: &'d Cel) -> Option<&'d ImageCel> {
        let mut current = cel;
        for _ in 0..=self.doc.frames.len() {
            match &current.content {
                CelContent::Image(image) => return Some(image),
                CelContent::Linked { frame } => {
                    let target = self
                        .doc
                        .frame(usize::from(*frame))
                        .and_then(|linked| linked.cel_for_layer(current.layer_index));
                    match target {
                        Some(target) => current = target,
                        None => {
                            warn!(
                                frame = frame_index,
                                layer = cel.layer_index,
                                linked_frame = frame,
                                "linked cel has no target, skipping"
                            );
                            return None;
                        }
                    }
                }
                CelContent::Tilemap(_) | CelContent::Unknown(_) => return None,
            }
        }
        warn!(frame = frame_index, layer = cel.layer_index, "linked cels form a cycle, skipping");
        None
    }
}

/// The nearest preceding layer exactly one nesting level up
pub fn parent_of(layers: &[Layer], index: usize) -> Option<usize> {
    let level = layers[index].child_level;
    if level == 0 {
        return None;
    }
    layers[..index]
        .iter()
        .rposition(|layer| layer.child_level == level - 1)
}

/// How packed cel pixels map to straight RGBA
struct SourceColors<'p> {
    depth: ColorDepth,
    palette: Option<&'p Palette>,
    transparent_index: Option<u8>,
}

impl SourceColors<'_> {
    fn rgba(&self, pixel: u32) -> Rgba8 {
        match self.depth {
            ColorDepth::TrueColor => unpremultiply(unpack_rgba(pixel)),
            ColorDepth::Grayscale => {
                let [value, alpha, _, _] = unpack_rgba(pixel);
                [value, value, value, alpha]
            }
            ColorDepth::Indexed => {
                let index = pixel as u8;
                if self.transparent_index == Some(index) {
                    return [0; 4];
                }
                self.palette
                    .and_then(|palette| palette.color(usize::from(index)))
                    .map_or([0; 4], |color| color.to_array())
            }
        }
    }
}

fn unpremultiply([r, g, b, a]: Rgba8) -> Rgba8 {
    if a == 0 {
        return [0; 4];
    }
    let scale = |c: u8| ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8;
    [scale(r), scale(g), scale(b), a]
}

/// Blends a cel's pixels onto the canvas, dropping whatever falls outside it
fn draw(
    canvas: &mut CanvasRegion<'_>,
    cel: &Cel,
    image: &ImageCel,
    source: &SourceColors<'_>,
    blender: Blender,
    opacity: u8,
) {
    let cel_x = i64::from(cel.x);
    let cel_y = i64::from(cel.y);
    let width = i64::from(image.width);
    let height = i64::from(image.height);

    let x_start = cel_x.max(0);
    let y_start = cel_y.max(0);
    let x_end = (cel_x + width).min(canvas.width as i64);
    let y_end = (cel_y + height).min(canvas.height as i64);
    if x_start >= x_end || y_start >= y_end {
        return;
    }

    for y in y_start..y_end {
        let row = ((y - cel_y) * width) as usize;
        for x in x_start..x_end {
            let src = source.rgba(image.pixels.pixels[row + (x - cel_x) as usize]);
            let (x, y) = (x as usize, y as usize);
            let backdrop = canvas.get(x, y);
            canvas.set(x, y, blender.blend(backdrop, src, opacity));
        }
    }
}
