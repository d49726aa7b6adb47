//! Color profile chunk (0x2007). Profiles are recorded, never applied.

use crate::{ByteCursor, Result};

const FLAG_FIXED_GAMMA: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ColorProfileKind {
    None,
    Srgb,
    Icc,
    Unknown(u16),
}

impl From<u16> for ColorProfileKind {
    fn from(code: u16) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Srgb,
            2 => Self::Icc,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColorProfile {
    pub kind: ColorProfileKind,
    pub flags: u16,
    /// Gamma from the 16.16 fixed-point field
    pub gamma: f32,
    /// Embedded ICC profile bytes
    #[cfg_attr(feature = "serde", serde(skip))]
    pub icc: Option<Vec<u8>>,
}

impl ColorProfile {
    pub fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let kind = ColorProfileKind::from(cursor.u16()?);
        let flags = cursor.u16()?;
        let gamma = cursor.u32()? as f32 / 65536.0;
        cursor.skip(8)?;

        let icc = if kind == ColorProfileKind::Icc {
            let len = cursor.u32()? as usize;
            Some(cursor.bytes(len)?.to_vec())
        } else {
            None
        };

        Ok(Self {
            kind,
            flags,
            gamma,
            icc,
        })
    }

    pub fn has_fixed_gamma(&self) -> bool {
        self.flags & FLAG_FIXED_GAMMA != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ByteWriter;

    #[test]
    fn parses_srgb_profile() {
        let bytes = ByteWriter::default()
            .u16(1)
            .u16(1)
            .u32(0x0002_8000)
            .zeros(8)
            .finish();
        let profile = ColorProfile::parse(&mut ByteCursor::new(&bytes)).unwrap();
        assert_eq!(profile.kind, ColorProfileKind::Srgb);
        assert!(profile.has_fixed_gamma());
        assert_eq!(profile.gamma, 2.5);
        assert!(profile.icc.is_none());
    }

    #[test]
    fn keeps_icc_bytes() {
        let bytes = ByteWriter::default()
            .u16(2)
            .u16(0)
            .u32(0)
            .zeros(8)
            .u32(3)
            .bytes(&[7, 8, 9])
            .finish();
        let profile = ColorProfile::parse(&mut ByteCursor::new(&bytes)).unwrap();
        assert_eq!(profile.kind, ColorProfileKind::Icc);
        assert_eq!(profile.icc.as_deref(), Some(&[7u8, 8, 9][..]));
    }
}
