//! File header: the fixed 128-byte preamble

use crate::{ByteCursor, Error, Result};

/// Magic number identifying an Aseprite file
pub const MAGIC: u16 = 0xA5E0;

/// Size of the header in bytes
pub const HEADER_SIZE: usize = 128;

const FLAG_LAYER_OPACITY_VALID: u32 = 1;
const FLAG_LAYERS_HAVE_UUID: u32 = 4;

/// Bits per pixel of every cel in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ColorDepth {
    /// 8 bpp, one palette index per pixel
    Indexed,
    /// 16 bpp, value then alpha
    Grayscale,
    /// 32 bpp, R, G, B, A
    TrueColor,
}

impl ColorDepth {
    /// Maps the header's bits-per-pixel field
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(Self::Indexed),
            16 => Some(Self::Grayscale),
            32 => Some(Self::TrueColor),
            _ => None,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Indexed => 1,
            Self::Grayscale => 2,
            Self::TrueColor => 4,
        }
    }
}

/// Editor grid settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Grid {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

/// Aseprite file header
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Header {
    /// Declared file size in bytes
    pub file_size: u32,
    /// Number of frames
    pub frame_count: u16,
    /// Canvas width in pixels
    pub width: u16,
    /// Canvas height in pixels
    pub height: u16,
    /// Color depth shared by every cel
    pub color_depth: ColorDepth,
    /// Raw header flags
    pub flags: u32,
    /// Palette index treated as transparent in indexed sprites
    pub transparent_index: u8,
    /// Declared number of palette colors (0 means 256)
    pub color_count: u16,
    /// Pixel aspect ratio numerator as stored (0 when unset)
    pub pixel_width: u8,
    /// Pixel aspect ratio denominator as stored (0 when unset)
    pub pixel_height: u8,
    /// Grid settings, `None` when the grid has no size
    pub grid: Option<Grid>,
}

impl Header {
    /// Reads the header from the start of the file
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let file_size = cursor.u32()?;

        let magic = cursor.u16()?;
        if magic != MAGIC {
            return Err(Error::format(format!(
                "bad magic: expected {MAGIC:#06x}, found {magic:#06x}"
            )));
        }

        let frame_count = cursor.u16()?;
        let width = cursor.u16()?;
        let height = cursor.u16()?;
        let depth = cursor.u16()?;
        let color_depth = ColorDepth::from_bits(depth)
            .ok_or_else(|| Error::format(format!("unsupported color depth: {depth}")))?;
        let flags = cursor.u32()?;

        // Deprecated speed, superseded by per-frame durations.
        let _speed = cursor.u16()?;
        cursor.skip(8)?;

        let transparent_index = cursor.u8()?;
        cursor.skip(3)?;
        let color_count = cursor.u16()?;
        let pixel_width = cursor.u8()?;
        let pixel_height = cursor.u8()?;

        let grid_x = cursor.i16()?;
        let grid_y = cursor.i16()?;
        let grid_width = cursor.u16()?;
        let grid_height = cursor.u16()?;
        let grid = (grid_width > 0 && grid_height > 0).then_some(Grid {
            x: grid_x,
            y: grid_y,
            width: grid_width,
            height: grid_height,
        });

        cursor.skip(84)?;

        Ok(Self {
            file_size,
            frame_count,
            width,
            height,
            color_depth,
            flags,
            transparent_index,
            color_count,
            pixel_width,
            pixel_height,
            grid,
        })
    }

    /// Whether layer opacity values are meaningful
    pub fn layer_opacity_valid(&self) -> bool {
        self.flags & FLAG_LAYER_OPACITY_VALID != 0
    }

    /// Whether every layer chunk carries a trailing UUID
    pub fn layers_have_uuid(&self) -> bool {
        self.flags & FLAG_LAYERS_HAVE_UUID != 0
    }

    /// Pixel aspect ratio, with an unset component read as 1:1
    pub fn pixel_ratio(&self) -> (u8, u8) {
        if self.pixel_width == 0 || self.pixel_height == 0 {
            (1, 1)
        } else {
            (self.pixel_width, self.pixel_height)
        }
    }
}
