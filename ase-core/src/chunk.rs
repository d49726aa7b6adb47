//! Frame and chunk framing: the headers that precede every frame and chunk

use crate::{ByteCursor, Error, Result};

/// Magic number at the start of every frame
pub const FRAME_MAGIC: u16 = 0xF1FA;

/// Size of a frame header in bytes
pub const FRAME_HEADER_SIZE: usize = 16;

/// Size of a chunk header (length + type) in bytes
pub const CHUNK_HEADER_SIZE: usize = 6;

const LEGACY_COUNT_UNKNOWN: u16 = 0xFFFF;

/// Chunk type codes understood by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkType {
    /// 0x0004, packet-encoded 8-bit palette
    OldPalette,
    /// 0x0011, packet-encoded 6-bit palette
    OldPalette64,
    Layer,
    Cel,
    CelExtra,
    ColorProfile,
    ExternalFiles,
    Mask,
    Path,
    Tags,
    Palette,
    UserData,
    Slice,
    Tileset,
    Unknown(u16),
}

impl From<u16> for ChunkType {
    fn from(code: u16) -> Self {
        match code {
            0x0004 => Self::OldPalette,
            0x0011 => Self::OldPalette64,
            0x2004 => Self::Layer,
            0x2005 => Self::Cel,
            0x2006 => Self::CelExtra,
            0x2007 => Self::ColorProfile,
            0x2008 => Self::ExternalFiles,
            0x2016 => Self::Mask,
            0x2017 => Self::Path,
            0x2018 => Self::Tags,
            0x2019 => Self::Palette,
            0x2020 => Self::UserData,
            0x2022 => Self::Slice,
            0x2023 => Self::Tileset,
            other => Self::Unknown(other),
        }
    }
}

/// Per-frame header
#[derive(Debug, Clone, Copy)]
pub struct FrameHeader {
    /// Length of the frame in bytes, header included
    pub length: u32,
    /// Legacy 16-bit chunk count
    pub old_chunk_count: u16,
    /// Frame duration in milliseconds
    pub duration_ms: u16,
    /// 32-bit chunk count, 0 when unused
    pub new_chunk_count: u32,
}

impl FrameHeader {
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let length = cursor.u32()?;
        let magic = cursor.u16()?;
        if magic != FRAME_MAGIC {
            return Err(Error::format(format!(
                "bad frame magic at offset {:#x}: expected {FRAME_MAGIC:#06x}, found {magic:#06x}",
                cursor.position() - 2
            )));
        }
        let old_chunk_count = cursor.u16()?;
        let duration_ms = cursor.u16()?;
        cursor.skip(2)?;
        let new_chunk_count = cursor.u32()?;

        Ok(Self {
            length,
            old_chunk_count,
            duration_ms,
            new_chunk_count,
        })
    }

    /// Number of chunks in the frame
    ///
    /// The 32-bit field supersedes the legacy one whenever it is nonzero.
    /// A legacy value of 0xFFFF only says "see the new field", so with the
    /// new field unset there is nothing left to trust and the count is 0.
    pub fn chunk_count(&self) -> u32 {
        if self.new_chunk_count != 0 {
            self.new_chunk_count
        } else if self.old_chunk_count == LEGACY_COUNT_UNKNOWN {
            0
        } else {
            u32::from(self.old_chunk_count)
        }
    }
}

/// Chunk header: length (inclusive of this header) and type
#[derive(Debug, Clone, Copy)]
pub struct ChunkHeader {
    pub length: u32,
    pub chunk_type: ChunkType,
}

impl ChunkHeader {
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let offset = cursor.position();
        let length = cursor.u32()?;
        let chunk_type = ChunkType::from(cursor.u16()?);
        if (length as usize) < CHUNK_HEADER_SIZE {
            return Err(Error::format(format!(
                "chunk at offset {offset:#x} declares length {length}, smaller than its header"
            )));
        }
        Ok(Self { length, chunk_type })
    }
}
