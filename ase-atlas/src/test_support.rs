//! In-memory documents for compositor tests

use ase_core::pixels::{premultiply, PixelData};
use ase_core::{
    BlendMode, Cel, CelContent, Color, ColorDepth, Document, Frame, Header, ImageCel, Layer,
    LayerFlags, LayerType, Palette, PaletteEntry, PaletteKind,
};

pub(crate) fn header(width: u16, height: u16, frames: usize, depth: ColorDepth) -> Header {
    Header {
        file_size: 0,
        frame_count: frames as u16,
        width,
        height,
        color_depth: depth,
        flags: 1,
        transparent_index: 0,
        color_count: 0,
        pixel_width: 1,
        pixel_height: 1,
        grid: None,
    }
}

pub(crate) fn document(
    (width, height): (u16, u16),
    layers: Vec<Layer>,
    frames: Vec<Vec<Cel>>,
) -> Document {
    Document {
        header: header(width, height, frames.len(), ColorDepth::TrueColor),
        frames: frames
            .into_iter()
            .map(|cels| Frame {
                duration_ms: 100,
                cels,
                ..Frame::default()
            })
            .collect(),
        layers,
        tags: Vec::new(),
        user_data: None,
    }
}

pub(crate) fn indexed_document(layers: Vec<Layer>, cels: Vec<Cel>, colors: &[[u8; 4]]) -> Document {
    let (width, height) = match &cels[0].content {
        CelContent::Image(image) => (image.width, image.height),
        _ => (1, 1),
    };
    let palette = Palette {
        kind: PaletteKind::Current,
        size: colors.len() as u32,
        first_index: 0,
        last_index: colors.len() as u32 - 1,
        entries: colors
            .iter()
            .map(|&[r, g, b, a]| PaletteEntry {
                color: Color::new(r, g, b, a),
                name: None,
            })
            .collect(),
    };
    let mut doc = document((width, height), layers, vec![cels]);
    doc.header.color_depth = ColorDepth::Indexed;
    doc.frames[0].palettes.push(palette);
    doc
}

pub(crate) fn layer(name: &str, child_level: u16, layer_type: LayerType, visible: bool) -> Layer {
    let mut flags = LayerFlags::EDITABLE;
    flags.set(LayerFlags::VISIBLE, visible);
    Layer {
        flags,
        layer_type,
        child_level,
        blend_mode: BlendMode::Normal,
        opacity: 255,
        name: name.to_string(),
        tileset_index: None,
        uuid: None,
        user_data: None,
    }
}

pub(crate) fn normal_layer(name: &str, child_level: u16) -> Layer {
    layer(name, child_level, LayerType::Normal, true)
}

pub(crate) fn group(name: &str, child_level: u16, visible: bool) -> Layer {
    layer(name, child_level, LayerType::Group, visible)
}

pub(crate) fn raw_cel(
    layer_index: u16,
    (width, height): (u16, u16),
    depth: ColorDepth,
    pixels: Vec<u32>,
) -> Cel {
    Cel {
        layer_index,
        x: 0,
        y: 0,
        opacity: 255,
        z_index: 0,
        content: CelContent::Image(ImageCel {
            width,
            height,
            compressed: false,
            pixels: PixelData { depth, pixels },
        }),
        user_data: None,
    }
}

/// A true-color cel filled with one straight-alpha color
pub(crate) fn solid_cel(
    layer_index: u16,
    (x, y): (i16, i16),
    (width, height): (u16, u16),
    rgba: [u8; 4],
) -> Cel {
    let pixels = vec![premultiply(rgba); usize::from(width) * usize::from(height)];
    Cel {
        x,
        y,
        ..raw_cel(layer_index, (width, height), ColorDepth::TrueColor, pixels)
    }
}

pub(crate) fn indexed_cel(layer_index: u16, size: (u16, u16), indices: &[u8]) -> Cel {
    let pixels = indices.iter().map(|&i| u32::from(i)).collect();
    raw_cel(layer_index, size, ColorDepth::Indexed, pixels)
}

pub(crate) fn linked_cel(layer_index: u16, frame: u16) -> Cel {
    Cel {
        layer_index,
        x: 0,
        y: 0,
        opacity: 255,
        z_index: 0,
        content: CelContent::Linked { frame },
        user_data: None,
    }
}
