//! Cel pixel decoding: inflate and per-depth conversion to packed pixels

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

use crate::header::ColorDepth;
use crate::{ByteCursor, Error, Result};

/// Decoded cel pixels, one packed `u32` per pixel, row-major.
///
/// The meaning of a packed value depends on `depth`:
/// - `TrueColor`: premultiplied RGBA, bytes `[r, g, b, a]` in little-endian order
/// - `Grayscale`: value in the low byte, alpha in the next, not premultiplied
/// - `Indexed`: the palette index, unresolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelData {
    pub depth: ColorDepth,
    pub pixels: Vec<u32>,
}

/// Packs four channel bytes into one pixel
pub fn pack_rgba([r, g, b, a]: [u8; 4]) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

pub fn unpack_rgba(pixel: u32) -> [u8; 4] {
    pixel.to_le_bytes()
}

/// Scales each color channel by `alpha / 255`, keeping alpha in the top byte
pub fn premultiply([r, g, b, a]: [u8; 4]) -> u32 {
    pack_rgba([mul_div255(r, a), mul_div255(g, a), mul_div255(b, a), a])
}

fn mul_div255(x: u8, y: u8) -> u8 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u8
}

fn expected_len(width: u16, height: u16, depth: ColorDepth) -> Result<usize> {
    usize::from(width)
        .checked_mul(usize::from(height))
        .and_then(|n| n.checked_mul(depth.bytes_per_pixel()))
        .ok_or_else(|| Error::format(format!("cel of {width}x{height} is too large")))
}

/// Reads an uncompressed pixel block of exactly `width * height` pixels
pub fn decode_raw(
    cursor: &mut ByteCursor<'_>,
    width: u16,
    height: u16,
    depth: ColorDepth,
) -> Result<PixelData> {
    let len = expected_len(width, height, depth)?;
    let bytes = cursor.bytes(len)?;
    Ok(convert(bytes, depth))
}

/// Inflates a zlib stream into a pooled scratch buffer and converts it
///
/// The stream must produce at least `width * height` pixels; anything beyond
/// that is ignored. The scratch buffer goes back to the pool on every exit.
pub fn decode_compressed(
    compressed: &[u8],
    width: u16,
    height: u16,
    depth: ColorDepth,
    pool: &ScratchPool,
) -> Result<PixelData> {
    use miniz_oxide::inflate::{decompress_slice_iter_to_slice, TINFLStatus};

    let len = expected_len(width, height, depth)?;
    let mut scratch = pool.acquire(len);

    match decompress_slice_iter_to_slice(&mut scratch, std::iter::once(compressed), true, false) {
        Ok(written) if written < len => {
            return Err(Error::UnexpectedEndOfData {
                offset: written,
                need: len - written,
                have: 0,
            });
        }
        Ok(_) | Err(TINFLStatus::HasMoreOutput) => {}
        Err(status) => {
            return Err(Error::Decode(format!("inflate failed: {status:?}")));
        }
    }

    Ok(convert(&scratch, depth))
}

fn convert(bytes: &[u8], depth: ColorDepth) -> PixelData {
    let pixels = match depth {
        ColorDepth::TrueColor => bytes
            .chunks_exact(4)
            .map(|p| premultiply([p[0], p[1], p[2], p[3]]))
            .collect(),
        ColorDepth::Grayscale => bytes
            .chunks_exact(2)
            .map(|p| u32::from(p[0]) | (u32::from(p[1]) << 8))
            .collect(),
        ColorDepth::Indexed => bytes.iter().map(|&index| u32::from(index)).collect(),
    };
    PixelData { depth, pixels }
}

/// Reusable byte buffers for inflating cel payloads within one decode call
#[derive(Debug, Default)]
pub struct ScratchPool {
    free: RefCell<Vec<Vec<u8>>>,
}

impl ScratchPool {
    /// Takes a zeroed buffer of `len` bytes, returned to the pool on drop
    pub fn acquire(&self, len: usize) -> Scratch<'_> {
        let mut buf = self.free.borrow_mut().pop().unwrap_or_default();
        buf.clear();
        buf.resize(len, 0);
        Scratch { pool: self, buf }
    }

    /// Buffers currently waiting for reuse
    pub fn idle(&self) -> usize {
        self.free.borrow().len()
    }
}

/// A buffer borrowed from a [`ScratchPool`]
#[derive(Debug)]
pub struct Scratch<'p> {
    pool: &'p ScratchPool,
    buf: Vec<u8>,
}

impl Deref for Scratch<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf
    }
}

impl DerefMut for Scratch<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.pool.free.borrow_mut().push(buf);
    }
}
