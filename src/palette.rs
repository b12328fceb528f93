//! Categorical color palettes and the ordinal scale that assigns them.
//!
//! Colors only ever encode categories here (chromosome identity, genome of
//! origin, or flip state), so everything is a fixed table of [`RGB8`] values
//! plus an index-wrapping lookup.

use rgb::RGB8;
use serde::{Deserialize, Serialize};

const fn rgb(r: u8, g: u8, b: u8) -> RGB8 {
    RGB8 { r, g, b }
}

/// 12 light pastel colors.
pub const LIGHT_1: [RGB8; 12] = [
    rgb(0x8d, 0xd3, 0xc7),
    rgb(0xff, 0xff, 0xb3),
    rgb(0xbe, 0xba, 0xda),
    rgb(0xfb, 0x80, 0x72),
    rgb(0x80, 0xb1, 0xd3),
    rgb(0xfd, 0xb4, 0x62),
    rgb(0xb3, 0xde, 0x69),
    rgb(0xfc, 0xcd, 0xe5),
    rgb(0xd9, 0xd9, 0xd9),
    rgb(0xbc, 0x80, 0xbd),
    rgb(0xcc, 0xeb, 0xc5),
    rgb(0xff, 0xed, 0x6f),
];

/// 9 light colors.
pub const LIGHT_2: [RGB8; 9] = [
    rgb(0xfb, 0xb4, 0xae),
    rgb(0xb3, 0xcd, 0xe3),
    rgb(0xcc, 0xeb, 0xc5),
    rgb(0xde, 0xcb, 0xe4),
    rgb(0xfe, 0xd9, 0xa6),
    rgb(0xff, 0xff, 0xcc),
    rgb(0xe5, 0xd8, 0xbd),
    rgb(0xfd, 0xda, 0xec),
    rgb(0xf2, 0xf2, 0xf2),
];

/// 8 saturated dark colors.
pub const DARK_1: [RGB8; 8] = [
    rgb(0x1b, 0x9e, 0x77),
    rgb(0xd9, 0x5f, 0x02),
    rgb(0x75, 0x70, 0xb3),
    rgb(0xe7, 0x29, 0x8a),
    rgb(0x66, 0xa6, 0x1e),
    rgb(0xe6, 0xab, 0x02),
    rgb(0xa6, 0x76, 0x1d),
    rgb(0x66, 0x66, 0x66),
];

/// 9 saturated dark colors.
pub const DARK_2: [RGB8; 9] = [
    rgb(0xe4, 0x1a, 0x1c),
    rgb(0x37, 0x7e, 0xb8),
    rgb(0x4d, 0xaf, 0x4a),
    rgb(0x98, 0x4e, 0xa3),
    rgb(0xff, 0x7f, 0x00),
    rgb(0xff, 0xff, 0x33),
    rgb(0xa6, 0x56, 0x28),
    rgb(0xf7, 0x81, 0xbf),
    rgb(0x99, 0x99, 0x99),
];

/// The binary flip-state range: index 0 for unflipped, 1 for flipped.
pub const FLIP_STATE: [RGB8; 2] = [rgb(0xb3, 0xb3, 0xb3), rgb(0xea, 0x48, 0x48)];

/// A named categorical palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Palette {
    #[default]
    Light1,
    Light2,
    Dark1,
    Dark2,
}

impl Palette {
    /// The palette's color table.
    pub fn colors(&self) -> &'static [RGB8] {
        match self {
            Palette::Light1 => &LIGHT_1,
            Palette::Light2 => &LIGHT_2,
            Palette::Dark1 => &DARK_1,
            Palette::Dark2 => &DARK_2,
        }
    }
}

/// How chromosome colors are assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    /// One color per chromosome, keyed by sorted position.
    PerChromosome(Palette),
    /// All chromosomes of a genome partition share one color, keyed by
    /// partition position.
    PerGenome(Palette),
    /// Color encodes flip state only ([`FLIP_STATE`]).
    FlipState,
}

impl Default for ColorMode {
    fn default() -> Self {
        ColorMode::PerChromosome(Palette::default())
    }
}

/// An ordinal color scale: maps integer indices onto a fixed categorical
/// range, wrapping around when the domain outgrows the range.
#[derive(Clone, Debug)]
pub struct OrdinalScale {
    range: Vec<RGB8>,
}

impl OrdinalScale {
    /// Create a scale over the given color range.
    ///
    /// # Panics
    /// Panics if `range` is empty.
    pub fn new(range: &[RGB8]) -> Self {
        assert!(!range.is_empty(), "ordinal scale range must be non-empty");
        Self {
            range: range.to_vec(),
        }
    }

    /// The color for the given domain index.
    pub fn color(&self, index: usize) -> RGB8 {
        self.range[index % self.range.len()]
    }
}

/// Format a color as a `#rrggbb` hex string.
pub fn to_hex(color: RGB8) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_wraps() {
        let scale = OrdinalScale::new(&DARK_1);
        assert_eq!(scale.color(0), DARK_1[0]);
        assert_eq!(scale.color(7), DARK_1[7]);
        assert_eq!(scale.color(8), DARK_1[0]);
        assert_eq!(scale.color(19), DARK_1[3]);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(rgb(0x8d, 0xd3, 0xc7)), "#8dd3c7");
        assert_eq!(to_hex(rgb(0, 0, 0)), "#000000");
    }

    #[test]
    fn test_default_mode() {
        assert_eq!(
            ColorMode::default(),
            ColorMode::PerChromosome(Palette::Light1)
        );
    }
}
