//! Control registers R0-R7.
//!
//! The raw bytes are decoded once, when they are written, into named fields
//! and byte addresses. The renderer never looks at a raw register.
//!
//! | Reg | Bits        | Meaning                                        |
//! |-----|-------------|------------------------------------------------|
//! | R0  | `------M3E` | M3 = Graphics II, E = external video input     |
//! | R1  | `KBIM1M2-SZ`| 16K, blank, IRQ enable, M1, M2, size, zoom     |
//! | R2  | `----NNNN`  | Name table base / $400                         |
//! | R3  | `CCCCCCCC`  | Colour table base / $40                        |
//! | R4  | `-----PPP`  | Pattern table base / $800                      |
//! | R5  | `-AAAAAAA`  | Sprite attribute table base / $80              |
//! | R6  | `-----SSS`  | Sprite pattern table base / $800               |
//! | R7  | `FFFFBBBB`  | Text foreground, backdrop                      |
//!
//! Graphics II reuses the low bits of R3 and R4 as masks rather than base
//! bits: R3 bits 0-4 gate the pattern name, R3 bits 5-6 and R4 bits 0-1
//! gate the screen-third bank. See [`Registers::name_mask`],
//! [`Registers::pattern_bank_mask`] and [`Registers::color_bank_mask`].

use bitflags::bitflags;

use crate::error::VdpError;

/// Number of write-only control registers.
pub const NUM_REGISTERS: usize = 8;

bitflags! {
    /// R0 mode/control bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Control0: u8 {
        const M3 = 0x02;
        const EXTERNAL_VIDEO = 0x01;
    }
}

bitflags! {
    /// R1 mode/control bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Control1: u8 {
        const VRAM_16K = 0x80;
        /// Clear = blank the display (backdrop only).
        const DISPLAY_ENABLE = 0x40;
        const INT_ENABLE = 0x20;
        const M1 = 0x10;
        const M2 = 0x08;
        const SPRITE_16 = 0x02;
        const SPRITE_MAG = 0x01;
    }
}

/// Display mode selected by M1/M2/M3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    GraphicsI,
    GraphicsII,
    Multicolor,
    Text,
}

impl Mode {
    /// M3 wins outright. M1+M2 together is undefined on the chip and falls
    /// back to Graphics I.
    #[must_use]
    pub fn decode(r0: Control0, r1: Control1) -> Self {
        if r0.contains(Control0::M3) {
            return Mode::GraphicsII;
        }
        match (r1.contains(Control1::M1), r1.contains(Control1::M2)) {
            (false, false) => Mode::GraphicsI,
            (false, true) => Mode::Multicolor,
            (true, false) => Mode::Text,
            (true, true) => Mode::GraphicsI,
        }
    }

    /// Sprites are never shown in Text mode.
    #[must_use]
    pub fn has_sprites(self) -> bool {
        self != Mode::Text
    }
}

/// Decoded register bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    raw: [u8; NUM_REGISTERS],
    control0: Control0,
    control1: Control1,
    mode: Mode,
    name_table: u16,
    color_table: u16,
    pattern_table: u16,
    name_mask: u8,
    pattern_bank_mask: u8,
    color_bank_mask: u8,
    sprite_attributes: u16,
    sprite_patterns: u16,
    text_color: u8,
    backdrop: u8,
}

impl Registers {
    /// Decode a full register snapshot. Exactly eight bytes are required.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VdpError> {
        let raw: [u8; NUM_REGISTERS] =
            bytes.try_into().map_err(|_| VdpError::InvalidLength {
                expected: NUM_REGISTERS,
                actual: bytes.len(),
            })?;
        Ok(Self::from_array(raw))
    }

    #[must_use]
    pub fn from_array(raw: [u8; NUM_REGISTERS]) -> Self {
        let control0 = Control0::from_bits_retain(raw[0]);
        let control1 = Control1::from_bits_retain(raw[1]);
        let mode = Mode::decode(control0, control1);

        let (color_table, pattern_table, name_mask, pattern_bank_mask, color_bank_mask) =
            if mode == Mode::GraphicsII {
                let pattern_bank_mask = raw[4] & 0x03;
                (
                    u16::from(raw[3] & 0x80) << 6,
                    u16::from(raw[4] & 0x04) << 11,
                    ((raw[3] & 0x7F) << 3) | 0x07,
                    pattern_bank_mask,
                    pattern_bank_mask & ((raw[3] >> 5) & 0x03),
                )
            } else {
                (
                    u16::from(raw[3]) << 6,
                    u16::from(raw[4] & 0x07) << 11,
                    0xFF,
                    0x03,
                    0x03,
                )
            };

        let regs = Self {
            raw,
            control0,
            control1,
            mode,
            name_table: u16::from(raw[2] & 0x0F) << 10,
            color_table,
            pattern_table,
            name_mask,
            pattern_bank_mask,
            color_bank_mask,
            sprite_attributes: u16::from(raw[5] & 0x7F) << 7,
            sprite_patterns: u16::from(raw[6] & 0x07) << 11,
            text_color: raw[7] >> 4,
            backdrop: raw[7] & 0x0F,
        };
        log::debug!(
            "registers {:02X?}: {:?}, names ${:04X}, colours ${:04X}, patterns ${:04X}, \
             sprite attrs ${:04X}, sprite patterns ${:04X}",
            regs.raw,
            regs.mode,
            regs.name_table,
            regs.color_table,
            regs.pattern_table,
            regs.sprite_attributes,
            regs.sprite_patterns,
        );
        regs
    }

    /// Return a copy with register `index & 7` replaced and re-decoded.
    #[must_use]
    pub fn with_register(&self, index: u8, value: u8) -> Self {
        let mut raw = self.raw;
        raw[usize::from(index) & (NUM_REGISTERS - 1)] = value;
        Self::from_array(raw)
    }

    #[must_use]
    pub fn raw(&self) -> &[u8; NUM_REGISTERS] {
        &self.raw
    }

    #[must_use]
    pub fn control0(&self) -> Control0 {
        self.control0
    }

    #[must_use]
    pub fn control1(&self) -> Control1 {
        self.control1
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn display_enabled(&self) -> bool {
        self.control1.contains(Control1::DISPLAY_ENABLE)
    }

    #[must_use]
    pub fn interrupt_enabled(&self) -> bool {
        self.control1.contains(Control1::INT_ENABLE)
    }

    /// Source sprite size in pixels (8 or 16), before magnification.
    #[must_use]
    pub fn sprite_size(&self) -> u8 {
        if self.control1.contains(Control1::SPRITE_16) {
            16
        } else {
            8
        }
    }

    #[must_use]
    pub fn sprite_magnified(&self) -> bool {
        self.control1.contains(Control1::SPRITE_MAG)
    }

    #[must_use]
    pub fn name_table(&self) -> u16 {
        self.name_table
    }

    #[must_use]
    pub fn color_table(&self) -> u16 {
        self.color_table
    }

    #[must_use]
    pub fn pattern_table(&self) -> u16 {
        self.pattern_table
    }

    /// AND mask applied to name table entries before the pattern and
    /// colour lookups. Graphics II takes it from R3 bits 0-4; elsewhere all
    /// 256 names pass.
    #[must_use]
    pub fn name_mask(&self) -> u8 {
        self.name_mask
    }

    /// AND mask on the Graphics II screen third (0-2) that picks the
    /// pattern bank: R4 bits 0-1.
    #[must_use]
    pub fn pattern_bank_mask(&self) -> u8 {
        self.pattern_bank_mask
    }

    /// AND mask on the Graphics II screen third that picks the colour bank:
    /// the pattern bank mask further gated by R3 bits 5-6.
    #[must_use]
    pub fn color_bank_mask(&self) -> u8 {
        self.color_bank_mask
    }

    #[must_use]
    pub fn sprite_attribute_table(&self) -> u16 {
        self.sprite_attributes
    }

    #[must_use]
    pub fn sprite_pattern_table(&self) -> u16 {
        self.sprite_patterns
    }

    /// Text mode foreground colour (R7 high nibble), unresolved.
    #[must_use]
    pub fn text_color(&self) -> u8 {
        self.text_color
    }

    /// Backdrop colour (R7 low nibble).
    #[must_use]
    pub fn backdrop(&self) -> u8 {
        self.backdrop
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::from_array([0; NUM_REGISTERS])
    }
}
