//! Tags chunk (0x2018)

use crate::chunks::palette::Color;
use crate::chunks::user_data::UserData;
use crate::{ByteCursor, Result};

/// Playback direction of a tagged frame range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LoopMode {
    Forward,
    Reverse,
    PingPong,
    PingPongReverse,
    Unknown(u8),
}

impl From<u8> for LoopMode {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::Forward,
            1 => Self::Reverse,
            2 => Self::PingPong,
            3 => Self::PingPongReverse,
            other => Self::Unknown(other),
        }
    }
}

/// A named, inclusive frame range
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrameTag {
    pub from_frame: u16,
    pub to_frame: u16,
    pub loop_mode: LoopMode,
    /// Times to play the range, 0 for forever
    pub repeat: u16,
    /// Deprecated tag color, superseded by user data
    pub legacy_color: [u8; 3],
    pub name: String,
    pub user_data: Option<UserData>,
}

impl FrameTag {
    /// Parses every tag of a tags chunk, in declaration order
    pub fn parse_all(cursor: &mut ByteCursor<'_>) -> Result<Vec<Self>> {
        let count = cursor.u16()?;
        cursor.skip(8)?;

        let mut tags = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let from_frame = cursor.u16()?;
            let to_frame = cursor.u16()?;
            let loop_mode = LoopMode::from(cursor.u8()?);
            let repeat = cursor.u16()?;
            cursor.skip(6)?;
            let rgb = cursor.bytes(3)?;
            cursor.skip(1)?;
            let name = cursor.string()?;

            tags.push(Self {
                from_frame,
                to_frame,
                loop_mode,
                repeat,
                legacy_color: [rgb[0], rgb[1], rgb[2]],
                name,
                user_data: None,
            });
        }
        Ok(tags)
    }

    /// Tag color: the attached user data color if any, else the legacy RGB
    pub fn color(&self) -> Color {
        self.user_data
            .as_ref()
            .and_then(|data| data.color)
            .unwrap_or_else(|| {
                let [r, g, b] = self.legacy_color;
                Color::opaque(r, g, b)
            })
    }

    /// Number of frames covered by the tag
    pub fn frame_count(&self) -> usize {
        usize::from(self.to_frame.saturating_sub(self.from_frame)) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::tags_payload;

    #[test]
    fn parses_tags_in_order() {
        let bytes = tags_payload(&[(0, 3, 0, "walk"), (4, 4, 2, "idle"), (5, 6, 3, "jump")]);
        let tags = FrameTag::parse_all(&mut ByteCursor::new(&bytes)).unwrap();
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0].name, "walk");
        assert_eq!(tags[0].frame_count(), 4);
        assert_eq!(tags[1].loop_mode, LoopMode::PingPong);
        assert_eq!(tags[2].loop_mode, LoopMode::PingPongReverse);
        assert_eq!(tags[2].from_frame, 5);
        assert_eq!(tags[2].to_frame, 6);
    }

    #[test]
    fn user_data_color_overrides_legacy_color() {
        let bytes = tags_payload(&[(0, 0, 0, "a")]);
        let mut tag = FrameTag::parse_all(&mut ByteCursor::new(&bytes))
            .unwrap()
            .remove(0);
        assert_eq!(tag.color(), Color::opaque(10, 20, 30));

        tag.user_data = Some(UserData {
            text: None,
            color: Some(Color::new(1, 2, 3, 4)),
        });
        assert_eq!(tag.color(), Color::new(1, 2, 3, 4));
    }
}
