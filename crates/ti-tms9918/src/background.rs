//! Background (pattern) layer, one scanline at a time.
//!
//! Each mode fills a 256-entry line of 4-bit colour indices. Index 0 is
//! left in place for transparent pixels; the compositor substitutes the
//! backdrop.

use crate::registers::{Mode, Registers};
use crate::tables::TableResolver;
use crate::vram::Vram;
use crate::{SCREEN_WIDTH, ScanlineBuffer};

/// Text mode glyphs are 6 pixels wide (bits 7-2 of each pattern byte).
const TEXT_CHAR_WIDTH: usize = 6;
/// Left/right border width in Text mode: (256 - 40 * 6) / 2.
const TEXT_BORDER: usize = 8;

/// Render the background for screen line `y` (0-191) into `line`.
pub fn render_line(vram: &Vram, regs: &Registers, y: u8, line: &mut ScanlineBuffer) {
    let tables = TableResolver::new(regs);
    match regs.mode() {
        Mode::GraphicsI | Mode::GraphicsII => tile_line(vram, &tables, y, line),
        Mode::Multicolor => multicolor_line(vram, &tables, y, line),
        Mode::Text => text_line(vram, &tables, regs, y, line),
    }
}

/// Graphics I and II: 32 cells of 8 pixels, colours from the colour table.
///
/// The two modes differ only in where the pattern and colour bytes live,
/// which the table resolver already accounts for.
fn tile_line(vram: &Vram, tables: &TableResolver<'_>, y: u8, line: &mut ScanlineBuffer) {
    let row = y >> 3;
    let pattern_line = y & 0x07;

    for (col, cell) in line.chunks_exact_mut(8).enumerate() {
        let name = vram.read(tables.name_address(row, col as u8));
        let pattern = vram.read(tables.pattern_address(name, row, pattern_line));
        let colors = tables
            .color_address(name, row, pattern_line)
            .map_or(0, |addr| vram.read(addr));
        let fg = colors >> 4;
        let bg = colors & 0x0F;

        for (bit, pixel) in cell.iter_mut().enumerate() {
            *pixel = if pattern & (0x80 >> bit) != 0 { fg } else { bg };
        }
    }
}

/// Multicolor: each cell is a 2x2 grid of 4x4 blocks. The "pattern" byte
/// holds the left block colour in the high nibble and the right block
/// colour in the low nibble.
fn multicolor_line(vram: &Vram, tables: &TableResolver<'_>, y: u8, line: &mut ScanlineBuffer) {
    let row = y >> 3;

    for (col, cell) in line.chunks_exact_mut(8).enumerate() {
        let name = vram.read(tables.name_address(row, col as u8));
        let colors = vram.read(tables.multicolor_address(name, row, y));
        let (left, right) = cell.split_at_mut(4);
        left.fill(colors >> 4);
        right.fill(colors & 0x0F);
    }
}

/// Text: 40 glyphs of 6 pixels between 8-pixel backdrop borders, two
/// colours from R7 only.
fn text_line(
    vram: &Vram,
    tables: &TableResolver<'_>,
    regs: &Registers,
    y: u8,
    line: &mut ScanlineBuffer,
) {
    let row = y >> 3;
    let pattern_line = y & 0x07;
    let fg = regs.text_color();
    let bg = regs.backdrop();

    line[..TEXT_BORDER].fill(bg);
    line[SCREEN_WIDTH - TEXT_BORDER..].fill(bg);

    let glyphs = &mut line[TEXT_BORDER..SCREEN_WIDTH - TEXT_BORDER];
    for (col, glyph) in glyphs.chunks_exact_mut(TEXT_CHAR_WIDTH).enumerate() {
        let name = vram.read(tables.name_address(row, col as u8));
        let pattern = vram.read(tables.pattern_address(name, row, pattern_line));
        for (bit, pixel) in glyph.iter_mut().enumerate() {
            *pixel = if pattern & (0x80 >> bit) != 0 { fg } else { bg };
        }
    }
}
