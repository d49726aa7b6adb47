//! User data chunk (0x2020)

use crate::chunks::palette::Color;
use crate::{ByteCursor, Result};

const HAS_TEXT: u32 = 1;
const HAS_COLOR: u32 = 2;

/// Free-form text and color attached to a sprite, layer, cel or tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UserData {
    pub text: Option<String>,
    pub color: Option<Color>,
}

impl UserData {
    pub fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let flags = cursor.u32()?;

        let text = if flags & HAS_TEXT != 0 {
            Some(cursor.string()?)
        } else {
            None
        };

        let color = if flags & HAS_COLOR != 0 {
            let rgba = cursor.bytes(4)?;
            Some(Color::new(rgba[0], rgba[1], rgba[2], rgba[3]))
        } else {
            None
        };

        // Property maps (flag 4) are not decoded.
        Ok(Self { text, color })
    }
}
