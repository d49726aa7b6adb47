//! Per-pixel blend functions on straight-alpha RGBA

use ase_core::BlendMode;

pub type Rgba8 = [u8; 4];

/// The blend modes the compositor can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blender {
    Normal,
    Multiply,
}

impl Blender {
    /// Maps a layer blend mode, `None` when it cannot be composited
    pub fn for_mode(mode: BlendMode) -> Option<Self> {
        match mode {
            BlendMode::Normal => Some(Self::Normal),
            BlendMode::Multiply => Some(Self::Multiply),
            _ => None,
        }
    }

    pub fn blend(self, backdrop: Rgba8, src: Rgba8, opacity: u8) -> Rgba8 {
        match self {
            Self::Normal => normal(backdrop, src, opacity),
            Self::Multiply => multiply(backdrop, src, opacity),
        }
    }
}

/// `a * b / 255`, rounded
pub fn mul_un8(a: u8, b: u8) -> u8 {
    let t = u32::from(a) * u32::from(b) + 0x80;
    (((t >> 8) + t) >> 8) as u8
}

/// Source-over with the source alpha scaled by `opacity`
pub fn normal(backdrop: Rgba8, src: Rgba8, opacity: u8) -> Rgba8 {
    let sa = mul_un8(src[3], opacity);
    if sa == 0 {
        return backdrop;
    }
    if backdrop[3] == 0 {
        return [src[0], src[1], src[2], sa];
    }

    let ba = backdrop[3];
    let ra = i32::from(sa) + i32::from(ba) - i32::from(mul_un8(ba, sa));
    let sa = i32::from(sa);
    let channel = |b: u8, s: u8| {
        let b = i32::from(b);
        (b + (i32::from(s) - b) * sa / ra) as u8
    };

    [
        channel(backdrop[0], src[0]),
        channel(backdrop[1], src[1]),
        channel(backdrop[2], src[2]),
        ra as u8,
    ]
}

/// Multiplies the source color by the backdrop, then composites as [`normal`]
pub fn multiply(backdrop: Rgba8, src: Rgba8, opacity: u8) -> Rgba8 {
    let multiplied = [
        mul_un8(backdrop[0], src[0]),
        mul_un8(backdrop[1], src[1]),
        mul_un8(backdrop[2], src[2]),
        src[3],
    ];
    normal(backdrop, multiplied, opacity)
}
