//! Builders for synthetic files used by the unit tests

use crate::chunk::{CHUNK_HEADER_SIZE, FRAME_MAGIC};
use crate::header::MAGIC;

#[derive(Default)]
pub(crate) struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub(crate) fn u8(mut self, v: u8) -> Self {
        self.buf.push(v);
        self
    }

    pub(crate) fn u16(mut self, v: u16) -> Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub(crate) fn i16(mut self, v: i16) -> Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub(crate) fn u32(mut self, v: u32) -> Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub(crate) fn bytes(mut self, v: &[u8]) -> Self {
        self.buf.extend_from_slice(v);
        self
    }

    pub(crate) fn zeros(mut self, n: usize) -> Self {
        self.buf.resize(self.buf.len() + n, 0);
        self
    }

    pub(crate) fn string(self, s: &str) -> Self {
        self.u16(s.len() as u16).bytes(s.as_bytes())
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.buf
    }
}

pub(crate) struct HeaderSpec {
    pub(crate) frames: u16,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) depth: u16,
    pub(crate) flags: u32,
    pub(crate) transparent_index: u8,
    pub(crate) grid: (i16, i16, u16, u16),
}

impl Default for HeaderSpec {
    fn default() -> Self {
        Self {
            frames: 1,
            width: 4,
            height: 4,
            depth: 32,
            flags: 1,
            transparent_index: 0,
            grid: (0, 0, 16, 16),
        }
    }
}

impl HeaderSpec {
    pub(crate) fn to_bytes(&self, file_size: u32) -> Vec<u8> {
        ByteWriter::default()
            .u32(file_size)
            .u16(MAGIC)
            .u16(self.frames)
            .u16(self.width)
            .u16(self.height)
            .u16(self.depth)
            .u32(self.flags)
            .u16(100)
            .zeros(8)
            .u8(self.transparent_index)
            .zeros(3)
            .u16(0)
            .u8(1)
            .u8(1)
            .i16(self.grid.0)
            .i16(self.grid.1)
            .u16(self.grid.2)
            .u16(self.grid.3)
            .zeros(84)
            .finish()
    }
}

/// Wraps a payload in a chunk header whose length covers both
pub(crate) fn chunk(kind: u16, payload: &[u8]) -> Vec<u8> {
    ByteWriter::default()
        .u32((CHUNK_HEADER_SIZE + payload.len()) as u32)
        .u16(kind)
        .bytes(payload)
        .finish()
}

pub(crate) fn frame(duration: u16, chunks: &[Vec<u8>]) -> Vec<u8> {
    frame_with_counts(duration, chunks.len() as u16, 0, chunks)
}

pub(crate) fn frame_with_counts(
    duration: u16,
    old_count: u16,
    new_count: u32,
    chunks: &[Vec<u8>],
) -> Vec<u8> {
    let body: Vec<u8> = chunks.concat();
    ByteWriter::default()
        .u32((16 + body.len()) as u32)
        .u16(FRAME_MAGIC)
        .u16(old_count)
        .u16(duration)
        .zeros(2)
        .u32(new_count)
        .bytes(&body)
        .finish()
}

pub(crate) fn file(header: HeaderSpec, frames: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = frames.concat();
    let mut bytes = header.to_bytes((128 + body.len()) as u32);
    bytes.extend_from_slice(&body);
    bytes
}

pub(crate) fn layer_payload(
    flags: u16,
    kind: u16,
    child_level: u16,
    blend_mode: u16,
    opacity: u8,
    name: &str,
) -> Vec<u8> {
    ByteWriter::default()
        .u16(flags)
        .u16(kind)
        .u16(child_level)
        .u16(0)
        .u16(0)
        .u16(blend_mode)
        .u8(opacity)
        .zeros(3)
        .string(name)
        .finish()
}

fn cel_prefix(layer: u16, x: i16, y: i16, opacity: u8, kind: u16) -> ByteWriter {
    ByteWriter::default()
        .u16(layer)
        .i16(x)
        .i16(y)
        .u8(opacity)
        .u16(kind)
        .i16(0)
        .zeros(5)
}

pub(crate) fn raw_cel_payload(
    layer: u16,
    (x, y): (i16, i16),
    opacity: u8,
    (width, height): (u16, u16),
    pixels: &[u8],
) -> Vec<u8> {
    cel_prefix(layer, x, y, opacity, 0)
        .u16(width)
        .u16(height)
        .bytes(pixels)
        .finish()
}

pub(crate) fn compressed_cel_payload(
    layer: u16,
    (x, y): (i16, i16),
    opacity: u8,
    (width, height): (u16, u16),
    pixels: &[u8],
) -> Vec<u8> {
    cel_prefix(layer, x, y, opacity, 2)
        .u16(width)
        .u16(height)
        .bytes(&miniz_oxide::deflate::compress_to_vec_zlib(pixels, 6))
        .finish()
}

pub(crate) fn linked_cel_payload(layer: u16, frame: u16) -> Vec<u8> {
    cel_prefix(layer, 0, 0, 255, 1).u16(frame).finish()
}

pub(crate) fn tilemap_cel_payload(
    layer: u16,
    (width, height): (u16, u16),
    masks: [u32; 4],
    tiles: &[u8],
) -> Vec<u8> {
    cel_prefix(layer, 0, 0, 255, 3)
        .u16(width)
        .u16(height)
        .u16(32)
        .u32(masks[0])
        .u32(masks[1])
        .u32(masks[2])
        .u32(masks[3])
        .zeros(10)
        .bytes(tiles)
        .finish()
}

pub(crate) fn tags_payload(tags: &[(u16, u16, u8, &str)]) -> Vec<u8> {
    let mut w = ByteWriter::default().u16(tags.len() as u16).zeros(8);
    for &(from, to, direction, name) in tags {
        w = w
            .u16(from)
            .u16(to)
            .u8(direction)
            .u16(0)
            .zeros(6)
            .bytes(&[10, 20, 30])
            .u8(0)
            .string(name);
    }
    w.finish()
}

pub(crate) fn user_data_payload(text: Option<&str>, color: Option<[u8; 4]>) -> Vec<u8> {
    let flags = u32::from(text.is_some()) | (u32::from(color.is_some()) << 1);
    let mut w = ByteWriter::default().u32(flags);
    if let Some(text) = text {
        w = w.string(text);
    }
    if let Some(color) = color {
        w = w.bytes(&color);
    }
    w.finish()
}

pub(crate) fn palette_payload(first: u32, colors: &[[u8; 4]]) -> Vec<u8> {
    let last = first + colors.len() as u32 - 1;
    let mut w = ByteWriter::default()
        .u32(last + 1)
        .u32(first)
        .u32(last)
        .zeros(8);
    for color in colors {
        w = w.u16(0).bytes(color);
    }
    w.finish()
}

/// A legacy palette with a single packet starting at index 0
pub(crate) fn old_palette_payload(colors: &[[u8; 3]]) -> Vec<u8> {
    let mut w = ByteWriter::default().u16(1).u8(0).u8(colors.len() as u8);
    for color in colors {
        w = w.bytes(color);
    }
    w.finish()
}
