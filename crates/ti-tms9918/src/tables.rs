//! VRAM table addressing.
//!
//! Turns (mode, register fields, cell coordinates) into byte addresses in
//! the 16K space. Every address returned here is already wrapped to 14
//! bits; tables that straddle $3FFF continue at $0000 exactly as the chip's
//! address counter does.

use crate::registers::{Mode, Registers};
use crate::vram::VRAM_MASK;

/// Bytes per 8x8 pattern.
pub const PATTERN_BYTES: u16 = 8;
/// Bytes per sprite attribute entry.
pub const SPRITE_ATTR_BYTES: u16 = 4;

pub const GRAPHICS_COLUMNS: u8 = 32;
pub const TEXT_COLUMNS: u8 = 40;
pub const ROWS: u8 = 24;

/// Graphics I shares one colour byte between each group of 8 patterns.
const GFX1_COLOR_GROUP_SHIFT: u8 = 3;

/// Address calculator for the tables selected by a register bank.
#[derive(Debug, Clone, Copy)]
pub struct TableResolver<'a> {
    regs: &'a Registers,
}

impl<'a> TableResolver<'a> {
    #[must_use]
    pub fn new(regs: &'a Registers) -> Self {
        Self { regs }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.regs.mode()
    }

    /// Name table columns per row (40 in Text mode, 32 otherwise).
    #[must_use]
    pub fn columns(&self) -> u8 {
        if self.regs.mode() == Mode::Text {
            TEXT_COLUMNS
        } else {
            GRAPHICS_COLUMNS
        }
    }

    /// Name table entry for the cell at (`row`, `col`).
    #[must_use]
    pub fn name_address(&self, row: u8, col: u8) -> u16 {
        let offset = u16::from(row) * u16::from(self.columns()) + u16::from(col);
        wrap(self.regs.name_table().wrapping_add(offset))
    }

    /// Pattern byte for `name` at pixel row `line` (0-7) within a cell on
    /// name table row `row`.
    ///
    /// Graphics II selects one of three 2K banks from the screen third the
    /// row falls in, gated by the R4 mask bits. The name is gated by R3.
    #[must_use]
    pub fn pattern_address(&self, name: u8, row: u8, line: u8) -> u16 {
        let base = self.regs.pattern_table();
        if self.regs.mode() == Mode::GraphicsII {
            let bank = Self::third(row) & self.regs.pattern_bank_mask();
            wrap(base | self.bank_offset(bank, name, line))
        } else {
            wrap(base.wrapping_add(u16::from(name) * PATTERN_BYTES + u16::from(line)))
        }
    }

    /// Colour byte for `name` at pixel row `line` on name table row `row`.
    ///
    /// Graphics I has one byte per group of 8 patterns; Graphics II one byte
    /// per pattern row, banked like the pattern table. Multicolor and Text
    /// have no colour table.
    #[must_use]
    pub fn color_address(&self, name: u8, row: u8, line: u8) -> Option<u16> {
        let base = self.regs.color_table();
        match self.regs.mode() {
            Mode::GraphicsI => {
                let group = u16::from(name >> GFX1_COLOR_GROUP_SHIFT);
                Some(wrap(base.wrapping_add(group)))
            }
            Mode::GraphicsII => {
                let bank = Self::third(row) & self.regs.color_bank_mask();
                Some(wrap(base | self.bank_offset(bank, name, line)))
            }
            Mode::Multicolor | Mode::Text => None,
        }
    }

    /// Multicolor block byte for `name` on name table row `row` at screen
    /// line `y`.
    ///
    /// Each name entry covers an 8x8 cell split into 2x2 blocks of 4x4
    /// pixels. The pattern row used depends on the name table row modulo 4,
    /// so four successive rows sharing a name walk through all 8 bytes.
    #[must_use]
    pub fn multicolor_address(&self, name: u8, row: u8, y: u8) -> u16 {
        let pattern_row = (row & 0x03) * 2 + ((y >> 2) & 0x01);
        wrap(
            self.regs
                .pattern_table()
                .wrapping_add(u16::from(name) * PATTERN_BYTES + u16::from(pattern_row)),
        )
    }

    /// First byte (Y) of sprite attribute entry `index`.
    #[must_use]
    pub fn sprite_attribute_address(&self, index: u8) -> u16 {
        wrap(
            self.regs
                .sprite_attribute_table()
                .wrapping_add(u16::from(index) * SPRITE_ATTR_BYTES),
        )
    }

    /// Sprite pattern byte for pattern `name` at byte offset `offset`
    /// (0-31; 16x16 sprites use all four 8-byte quadrants).
    #[must_use]
    pub fn sprite_pattern_address(&self, name: u8, offset: u8) -> u16 {
        wrap(
            self.regs
                .sprite_pattern_table()
                .wrapping_add(u16::from(name) * PATTERN_BYTES + u16::from(offset)),
        )
    }

    /// Screen third (0-2) of a name table row.
    fn third(row: u8) -> u8 {
        (row >> 3) & 0x03
    }

    /// 13-bit Graphics II offset `BB NNNNNNNN LLL`, name gated by R3.
    fn bank_offset(&self, bank: u8, name: u8, line: u8) -> u16 {
        let name = name & self.regs.name_mask();
        (u16::from(bank) << 11) | (u16::from(name) << 3) | u16::from(line & 0x07)
    }
}

fn wrap(addr: u16) -> u16 {
    addr & VRAM_MASK
}
