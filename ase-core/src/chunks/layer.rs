//! Layer chunk (0x2004)

use crate::chunks::user_data::UserData;
use crate::{ByteCursor, Result};

bitflags::bitflags! {
    /// Layer flags as stored in the file
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub struct LayerFlags: u16 {
        const VISIBLE = 1;
        const EDITABLE = 2;
        const LOCK_MOVEMENT = 4;
        const BACKGROUND = 8;
        const PREFER_LINKED_CELS = 16;
        const COLLAPSED = 32;
        const REFERENCE = 64;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LayerType {
    Normal,
    Group,
    Tilemap,
    Unknown(u16),
}

impl From<u16> for LayerType {
    fn from(code: u16) -> Self {
        match code {
            0 => Self::Normal,
            1 => Self::Group,
            2 => Self::Tilemap,
            other => Self::Unknown(other),
        }
    }
}

/// Blend modes the format can name. Only some of them can be composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BlendMode {
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    Addition,
    Subtract,
    Divide,
    Other(u16),
}

impl From<u16> for BlendMode {
    fn from(code: u16) -> Self {
        match code {
            0 => Self::Normal,
            1 => Self::Multiply,
            2 => Self::Screen,
            3 => Self::Overlay,
            4 => Self::Darken,
            5 => Self::Lighten,
            6 => Self::ColorDodge,
            7 => Self::ColorBurn,
            8 => Self::HardLight,
            9 => Self::SoftLight,
            10 => Self::Difference,
            11 => Self::Exclusion,
            12 => Self::Hue,
            13 => Self::Saturation,
            14 => Self::Color,
            15 => Self::Luminosity,
            16 => Self::Addition,
            17 => Self::Subtract,
            18 => Self::Divide,
            other => Self::Other(other),
        }
    }
}

/// A layer. Its position in [`crate::Document::layers`] is its identity.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Layer {
    pub flags: LayerFlags,
    pub layer_type: LayerType,
    /// Nesting depth; the parent is the nearest preceding layer one level up
    pub child_level: u16,
    pub blend_mode: BlendMode,
    pub opacity: u8,
    pub name: String,
    /// Tileset used by a tilemap layer
    pub tileset_index: Option<u32>,
    pub uuid: Option<[u8; 16]>,
    pub user_data: Option<UserData>,
}

impl Layer {
    pub fn parse(cursor: &mut ByteCursor<'_>, has_uuid: bool) -> Result<Self> {
        let flags = LayerFlags::from_bits_retain(cursor.u16()?);
        let layer_type = LayerType::from(cursor.u16()?);
        let child_level = cursor.u16()?;
        // Default width and height are ignored by the format.
        cursor.skip(4)?;
        let blend_mode = BlendMode::from(cursor.u16()?);
        let opacity = cursor.u8()?;
        cursor.skip(3)?;
        let name = cursor.string()?;

        let tileset_index = if layer_type == LayerType::Tilemap {
            Some(cursor.u32()?)
        } else {
            None
        };

        let uuid = if has_uuid {
            let mut uuid = [0u8; 16];
            uuid.copy_from_slice(cursor.bytes(16)?);
            Some(uuid)
        } else {
            None
        };

        Ok(Self {
            flags,
            layer_type,
            child_level,
            blend_mode,
            opacity,
            name,
            tileset_index,
            uuid,
            user_data: None,
        })
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(LayerFlags::VISIBLE)
    }

    pub fn is_group(&self) -> bool {
        self.layer_type == LayerType::Group
    }
}
