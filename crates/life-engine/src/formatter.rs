//! Cell sample to colour word.
//!
//! Colour words are 12-bit RGB444, red in the high nibble.

/// Colour word emitted outside active video.
pub const BLANK: u16 = 0x000;

/// Two-colour palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub alive: u16,
    pub dead: u16,
}

impl Palette {
    #[must_use]
    pub const fn new(alive: u16, dead: u16) -> Self {
        Self {
            alive: alive & 0xFFF,
            dead: dead & 0xFFF,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(0xFFF, 0x000)
    }
}

/// Maps one cell sample per pixel to an output colour.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelFormatter {
    palette: Palette,
}

impl PixelFormatter {
    #[must_use]
    pub const fn new(palette: Palette) -> Self {
        Self { palette }
    }

    #[must_use]
    pub const fn palette(&self) -> Palette {
        self.palette
    }

    /// Colour for one pixel. `sample` is `None` for active pixels outside
    /// the grid, which show the dead colour.
    #[must_use]
    pub const fn format(&self, active: bool, sample: Option<bool>) -> u16 {
        match (active, sample) {
            (false, _) => BLANK,
            (true, Some(true)) => self.palette.alive,
            (true, Some(false) | None) => self.palette.dead,
        }
    }
}

/// Expand an RGB444 colour word to opaque ARGB32.
#[must_use]
pub const fn rgb444_to_argb32(colour: u16) -> u32 {
    let r = ((colour >> 8) & 0xF) as u32;
    let g = ((colour >> 4) & 0xF) as u32;
    let b = (colour & 0xF) as u32;
    // 0xN -> 0xNN scales a nibble to the full byte range.
    0xFF00_0000 | (r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blanking_is_black_regardless_of_sample() {
        let formatter = PixelFormatter::default();
        assert_eq!(formatter.format(false, Some(true)), BLANK);
        assert_eq!(formatter.format(false, None), BLANK);
    }

    #[test]
    fn active_pixels_use_palette() {
        let formatter = PixelFormatter::new(Palette::new(0x0F0, 0x001));
        assert_eq!(formatter.format(true, Some(true)), 0x0F0);
        assert_eq!(formatter.format(true, Some(false)), 0x001);
        assert_eq!(formatter.format(true, None), 0x001);
    }

    #[test]
    fn palette_masks_to_twelve_bits() {
        let palette = Palette::new(0xFFFF, 0x1234);
        assert_eq!(palette.alive, 0xFFF);
        assert_eq!(palette.dead, 0x234);
    }

    #[test]
    fn argb_expansion() {
        assert_eq!(rgb444_to_argb32(0xFFF), 0xFFFF_FFFF);
        assert_eq!(rgb444_to_argb32(0x000), 0xFF00_0000);
        assert_eq!(rgb444_to_argb32(0xF80), 0xFFFF_8800);
        assert_eq!(rgb444_to_argb32(0x12A), 0xFF11_22AA);
    }
}
