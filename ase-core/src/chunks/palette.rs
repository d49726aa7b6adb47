//! Palette chunks: the current format (0x2019) and the packet-encoded
//! legacy formats (0x0004, 0x0011)

use crate::{ByteCursor, Error, Result};

const ENTRY_HAS_NAME: u16 = 1;

/// An RGBA color with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// One palette slot
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PaletteEntry {
    pub color: Color,
    pub name: Option<String>,
}

/// Which chunk a palette was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PaletteKind {
    /// Palette chunk (0x2019)
    Current,
    /// Legacy palette chunk (0x0004 or 0x0011)
    Legacy,
}

/// A run of palette entries covering `first_index..=last_index`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Palette {
    pub kind: PaletteKind,
    /// Total palette size declared by the chunk
    pub size: u32,
    pub first_index: u32,
    pub last_index: u32,
    pub entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Parses a current-format palette chunk
    pub fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let size = cursor.u32()?;
        let first_index = cursor.u32()?;
        let last_index = cursor.u32()?;
        cursor.skip(8)?;

        if last_index < first_index {
            return Err(Error::format(format!(
                "palette range {first_index}..={last_index} is empty"
            )));
        }

        let count = (last_index - first_index) as usize + 1;
        // Each entry is at least 6 bytes; cap the reservation by what is left.
        let mut entries = Vec::with_capacity(count.min(cursor.remaining() / 6));
        for _ in 0..count {
            let flags = cursor.u16()?;
            let rgba = cursor.bytes(4)?;
            let name = if flags & ENTRY_HAS_NAME != 0 {
                Some(cursor.string()?)
            } else {
                None
            };
            entries.push(PaletteEntry {
                color: Color::new(rgba[0], rgba[1], rgba[2], rgba[3]),
                name,
            });
        }

        Ok(Self {
            kind: PaletteKind::Current,
            size,
            first_index,
            last_index,
            entries,
        })
    }

    /// Parses a legacy packet-encoded palette chunk
    ///
    /// Each packet skips some entries then sets a run of RGB colors. Entries
    /// between written runs are opaque black. The 6-bit variant is stored
    /// with its channel values untouched.
    pub fn parse_legacy(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let packets = cursor.u16()?;

        let mut written: Vec<(u32, Color)> = Vec::new();
        let mut index: u32 = 0;
        for _ in 0..packets {
            index += u32::from(cursor.u8()?);
            let count = match cursor.u8()? {
                0 => 256,
                n => u32::from(n),
            };
            for _ in 0..count {
                let rgb = cursor.bytes(3)?;
                written.push((index, Color::opaque(rgb[0], rgb[1], rgb[2])));
                index += 1;
            }
        }

        let Some(first_index) = written.iter().map(|(i, _)| *i).min() else {
            return Ok(Self {
                kind: PaletteKind::Legacy,
                size: 0,
                first_index: 0,
                last_index: 0,
                entries: Vec::new(),
            });
        };
        let last_index = written.iter().map(|(i, _)| *i).max().unwrap_or(first_index);

        let mut entries = vec![
            PaletteEntry {
                color: Color::opaque(0, 0, 0),
                name: None,
            };
            (last_index - first_index) as usize + 1
        ];
        for (i, color) in written {
            entries[(i - first_index) as usize].color = color;
        }

        Ok(Self {
            kind: PaletteKind::Legacy,
            size: last_index + 1,
            first_index,
            last_index,
            entries,
        })
    }

    /// Color stored at an absolute palette index
    pub fn color(&self, index: usize) -> Option<Color> {
        let offset = index.checked_sub(self.first_index as usize)?;
        self.entries.get(offset).map(|entry| entry.color)
    }
}
