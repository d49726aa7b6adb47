//! Cel chunk (0x2005)

use crate::chunks::user_data::UserData;
use crate::header::ColorDepth;
use crate::pixels::{self, PixelData, ScratchPool};
use crate::{ByteCursor, Result};

/// A pixel block owned by a cel
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImageCel {
    pub width: u16,
    pub height: u16,
    /// Whether the block was stored zlib-compressed
    pub compressed: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pixels: PixelData,
}

/// Tile indices of a tilemap cel, kept compressed
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TilemapCel {
    /// Width in tiles
    pub width: u16,
    /// Height in tiles
    pub height: u16,
    pub bits_per_tile: u16,
    pub tile_id_mask: u32,
    pub x_flip_mask: u32,
    pub y_flip_mask: u32,
    pub diagonal_flip_mask: u32,
    /// zlib stream of tile entries
    #[cfg_attr(feature = "serde", serde(skip))]
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CelContent {
    Image(ImageCel),
    /// Shares the pixels of the cel on the same layer in another frame
    Linked { frame: u16 },
    Tilemap(TilemapCel),
    /// A cel type this decoder does not know
    Unknown(u16),
}

/// What one layer contributes to one frame
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cel {
    pub layer_index: u16,
    /// Offset on the canvas; may be negative or past the canvas edge
    pub x: i16,
    pub y: i16,
    pub opacity: u8,
    pub z_index: i16,
    pub content: CelContent,
    pub user_data: Option<UserData>,
}

impl Cel {
    /// Parses a cel whose payload ends at `chunk_end`
    pub fn parse(
        cursor: &mut ByteCursor<'_>,
        chunk_end: usize,
        depth: ColorDepth,
        pool: &ScratchPool,
    ) -> Result<Self> {
        let layer_index = cursor.u16()?;
        let x = cursor.i16()?;
        let y = cursor.i16()?;
        let opacity = cursor.u8()?;
        let cel_type = cursor.u16()?;
        let z_index = cursor.i16()?;
        cursor.skip(5)?;

        let content = match cel_type {
            0 => {
                let width = cursor.u16()?;
                let height = cursor.u16()?;
                let pixels = pixels::decode_raw(cursor, width, height, depth)?;
                CelContent::Image(ImageCel {
                    width,
                    height,
                    compressed: false,
                    pixels,
                })
            }
            1 => CelContent::Linked {
                frame: cursor.u16()?,
            },
            2 => {
                let width = cursor.u16()?;
                let height = cursor.u16()?;
                let compressed = payload_until(cursor, chunk_end)?;
                let pixels = pixels::decode_compressed(compressed, width, height, depth, pool)?;
                CelContent::Image(ImageCel {
                    width,
                    height,
                    compressed: true,
                    pixels,
                })
            }
            3 => {
                let width = cursor.u16()?;
                let height = cursor.u16()?;
                let bits_per_tile = cursor.u16()?;
                let tile_id_mask = cursor.u32()?;
                let x_flip_mask = cursor.u32()?;
                let y_flip_mask = cursor.u32()?;
                let diagonal_flip_mask = cursor.u32()?;
                cursor.skip(10)?;
                let data = payload_until(cursor, chunk_end)?.to_vec();
                CelContent::Tilemap(TilemapCel {
                    width,
                    height,
                    bits_per_tile,
                    tile_id_mask,
                    x_flip_mask,
                    y_flip_mask,
                    diagonal_flip_mask,
                    data,
                })
            }
            other => CelContent::Unknown(other),
        };

        Ok(Self {
            layer_index,
            x,
            y,
            opacity,
            z_index,
            content,
            user_data: None,
        })
    }
}

/// The rest of the chunk payload from the cursor position
fn payload_until<'a>(cursor: &mut ByteCursor<'a>, chunk_end: usize) -> Result<&'a [u8]> {
    let len = chunk_end.saturating_sub(cursor.position());
    cursor.bytes(len)
}
