use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 7 caractères: la rampe de la démo, du vide au plus dense.
pub const CHARSET_DEMO: &str = " .:-+-%";

/// 15 caractères: gradient classique des effets ASCII WebGL.
pub const CHARSET_CLASSIC: &str = " .,:;i1tfLCG08@";

/// 10 caractères: compact, bon contraste.
pub const CHARSET_COMPACT: &str = " .:-=+*#%@";

/// 70 caractères: Paul Bourke extended.
pub const CHARSET_STANDARD: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Blocs Unicode: pseudo-pixels.
pub const CHARSET_BLOCKS: &str = " ░▒▓█";

/// Rampe utilisée quand aucune n'est configurée.
pub const DEFAULT_RAMP: &str = CHARSET_DEMO;

/// Ordered, non-empty sequence of glyphs, sparsest first.
///
/// The only way to get one is through [`CharacterRamp::new`] (or parsing),
/// so an empty ramp never reaches a compositor.
///
/// # Example
/// ```
/// use gs_core::charset::CharacterRamp;
/// let ramp = CharacterRamp::new(" .:#@").unwrap();
/// assert_eq!(ramp.len(), 5);
/// assert_eq!(ramp.first(), ' ');
/// assert_eq!(ramp.last(), '@');
/// assert!(CharacterRamp::new("").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterRamp {
    chars: Vec<char>,
}

impl CharacterRamp {
    /// Build a ramp from a string ordered sparsest → densest.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyRamp`] if `glyphs` is empty.
    pub fn new(glyphs: &str) -> Result<Self, CoreError> {
        let chars: Vec<char> = glyphs.chars().collect();
        if chars.is_empty() {
            return Err(CoreError::EmptyRamp);
        }
        Ok(Self { chars })
    }

    /// Number of glyphs. Always ≥ 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Glyphs in ramp order.
    #[must_use]
    pub fn glyphs(&self) -> &[char] {
        &self.chars
    }

    /// Sparsest glyph.
    #[must_use]
    pub fn first(&self) -> char {
        self.chars[0]
    }

    /// Densest glyph.
    #[must_use]
    pub fn last(&self) -> char {
        self.chars[self.chars.len() - 1]
    }
}

impl Default for CharacterRamp {
    fn default() -> Self {
        Self {
            chars: DEFAULT_RAMP.chars().collect(),
        }
    }
}

impl FromStr for CharacterRamp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CharacterRamp {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CharacterRamp> for String {
    fn from(ramp: CharacterRamp) -> Self {
        ramp.chars.into_iter().collect()
    }
}

impl fmt::Display for CharacterRamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.chars {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

/// Lookup table mapping luminance [0..255] → glyph.
///
/// Pre-computed once per compositor: ramp and invert flag are baked in,
/// which is why changing either means building a new compositor.
///
/// # Example
/// ```
/// use gs_core::charset::{CharacterRamp, LuminanceLut};
/// let ramp = CharacterRamp::new(" .:#@").unwrap();
/// let lut = LuminanceLut::new(&ramp, false);
/// assert_eq!(lut.map(0), ' ');
/// assert_eq!(lut.map(255), '@');
///
/// let inverted = LuminanceLut::new(&ramp, true);
/// assert_eq!(inverted.map(0), '@');
/// assert_eq!(inverted.map(255), ' ');
/// ```
#[derive(Clone)]
pub struct LuminanceLut {
    glyphs: [char; 256],
    indices: [u16; 256],
}

impl LuminanceLut {
    /// Build a LUT from a ramp ordered sparsest → densest.
    ///
    /// Index for luminance `l` is `l * (n - 1) / 255`, mirrored when `invert`.
    #[must_use]
    pub fn new(ramp: &CharacterRamp, invert: bool) -> Self {
        let chars = ramp.glyphs();
        let last = chars.len() - 1;
        let mut glyphs = [' '; 256];
        let mut indices = [0u16; 256];
        for (lum, (glyph, index)) in glyphs.iter_mut().zip(indices.iter_mut()).enumerate() {
            let forward = lum * last / 255;
            let idx = if invert { last - forward } else { forward };
            *glyph = chars[idx];
            *index = idx as u16;
        }
        Self { glyphs, indices }
    }

    /// Map a luminance value to a glyph.
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance: u8) -> char {
        self.glyphs[luminance as usize]
    }

    /// Ramp position selected for a luminance value.
    #[inline(always)]
    #[must_use]
    pub fn index(&self, luminance: u8) -> usize {
        usize::from(self.indices[luminance as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(s: &str) -> CharacterRamp {
        CharacterRamp::new(s).unwrap()
    }

    #[test]
    fn empty_ramp_is_rejected() {
        assert_eq!(CharacterRamp::new(""), Err(CoreError::EmptyRamp));
        assert!("".parse::<CharacterRamp>().is_err());
    }

    #[test]
    fn luminance_lut_maps_extremes() {
        let lut = LuminanceLut::new(&ramp(CHARSET_DEMO), false);
        assert_eq!(lut.map(0), ' ');
        assert_eq!(lut.map(255), '%');
    }

    #[test]
    fn luminance_lut_monotonic_and_in_range() {
        for invert in [false, true] {
            let r = ramp(CHARSET_STANDARD);
            let lut = LuminanceLut::new(&r, invert);
            let mut prev = lut.index(0);
            for l in 0..=255u8 {
                let idx = lut.index(l);
                assert!(idx < r.len(), "index {idx} hors rampe à luminance {l}");
                if invert {
                    assert!(idx <= prev, "LUT inversée non monotone à {l}");
                } else {
                    assert!(idx >= prev, "LUT non monotone à {l}");
                }
                prev = idx;
            }
        }
    }

    #[test]
    fn lut_covers_whole_ramp() {
        let r = ramp(CHARSET_COMPACT);
        let lut = LuminanceLut::new(&r, false);
        let mut seen = vec![false; r.len()];
        for l in 0..=255u8 {
            seen[lut.index(l)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn single_glyph_ramp_maps_everything_to_it() {
        let r = ramp("#");
        for invert in [false, true] {
            let lut = LuminanceLut::new(&r, invert);
            for l in 0..=255u8 {
                assert_eq!(lut.map(l), '#');
            }
        }
    }

    #[test]
    fn ramp_survives_string_conversions() {
        let r = ramp(CHARSET_BLOCKS);
        assert_eq!(r.to_string(), CHARSET_BLOCKS);
        let s: String = r.clone().into();
        assert_eq!(CharacterRamp::try_from(s).unwrap(), r);
    }
}
