//! Construction-time options.

use crate::palette::Palette;

/// VDP configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VdpConfig {
    /// RGB values for the 16 colour indices.
    pub palette: Palette,
    /// Drop sprites beyond the fourth on a line, as the chip does. When
    /// off, every sprite is drawn but 5S is still reported.
    pub sprite_limit: bool,
}

impl Default for VdpConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            sprite_limit: true,
        }
    }
}
