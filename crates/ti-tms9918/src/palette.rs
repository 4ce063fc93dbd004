//! TMS9918A 16-colour palette.
//!
//! The chip generates luminance/colour-difference signals rather than RGB,
//! so every emulator picks its own approximation. These values are the
//! commonly used measured set. Index 0 is "transparent": the layer below
//! shows through, and at the bottom of the stack it renders as black.

/// An 8-bit-per-channel RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque ARGB32, the framebuffer format the host renderers use.
    #[must_use]
    pub const fn to_argb32(self) -> u32 {
        0xFF00_0000 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Colour index reserved for transparency.
pub const TRANSPARENT: u8 = 0;

/// Standard palette, indexed by 4-bit colour code.
pub const TMS9918A_PALETTE: [Rgb; 16] = [
    Rgb::new(0x00, 0x00, 0x00), // 0: Transparent
    Rgb::new(0x00, 0x00, 0x00), // 1: Black
    Rgb::new(0x21, 0xC9, 0x42), // 2: Medium green
    Rgb::new(0x5E, 0xDC, 0x78), // 3: Light green
    Rgb::new(0x54, 0x55, 0xED), // 4: Dark blue
    Rgb::new(0x7D, 0x75, 0xFC), // 5: Light blue
    Rgb::new(0xD3, 0x52, 0x4D), // 6: Dark red
    Rgb::new(0x43, 0xEB, 0xF6), // 7: Cyan
    Rgb::new(0xFD, 0x55, 0x54), // 8: Medium red
    Rgb::new(0xFF, 0x79, 0x78), // 9: Light red
    Rgb::new(0xD3, 0xC1, 0x53), // 10: Dark yellow
    Rgb::new(0xE5, 0xCE, 0x80), // 11: Light yellow
    Rgb::new(0x21, 0xB0, 0x3C), // 12: Dark green
    Rgb::new(0xC9, 0x5B, 0xBA), // 13: Magenta
    Rgb::new(0xCC, 0xCC, 0xCC), // 14: Grey
    Rgb::new(0xFF, 0xFF, 0xFF), // 15: White
];

/// Immutable colour lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    entries: [Rgb; 16],
}

impl Palette {
    #[must_use]
    pub const fn new(entries: [Rgb; 16]) -> Self {
        Self { entries }
    }

    /// Map a colour index (low nibble only) to RGB.
    #[must_use]
    pub fn rgb(&self, index: u8) -> Rgb {
        self.entries[usize::from(index & 0x0F)]
    }

    #[must_use]
    pub fn entries(&self) -> &[Rgb; 16] {
        &self.entries
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(TMS9918A_PALETTE)
    }
}

/// Resolve a layer colour: transparent falls through to `below`.
#[must_use]
pub fn resolve(color: u8, below: u8) -> u8 {
    if color & 0x0F == TRANSPARENT {
        below
    } else {
        color & 0x0F
    }
}
