//! Sprite engine.
//!
//! Per scanline the chip walks the sprite attribute table in index order,
//! collecting the sprites whose vertical extent covers the line. Processing
//! stops at a Y of $D0 or after entry 31. Only four sprites fit in the
//! line buffer: finding a fifth latches the 5S status flag and its index,
//! and ends the walk.
//!
//! Attribute entry layout (4 bytes):
//!
//! | Byte | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Y (sprite appears from line Y+1; >$E0 is above 0) |
//! | 1    | X                                                |
//! | 2    | Pattern name (low 2 bits ignored for 16x16)      |
//! | 3    | `E---CCCC`: early clock, colour                  |

use crate::registers::Registers;
use crate::tables::TableResolver;
use crate::vram::Vram;
use crate::{SCREEN_WIDTH, ScanlineBuffer};

/// Entries in the sprite attribute table.
pub const MAX_SPRITES: usize = 32;
/// Sprites the chip can display on one line.
pub const SPRITES_PER_LINE: usize = 4;
/// Y value that terminates the attribute table walk.
pub const LAST_SPRITE_Y: u8 = 0xD0;

/// Y values above this are treated as negative (sprite partly above line 0).
const Y_WRAP_THRESHOLD: i16 = 0xE0;
/// Early clock shifts the sprite this many pixels left.
const EARLY_CLOCK_SHIFT: i16 = 32;
/// Offset of the right-hand 8x16 half of a 16x16 sprite pattern.
const RIGHT_HALF_OFFSET: u8 = 16;

/// One attribute table entry, decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpriteAttributes {
    pub y: u8,
    pub x: u8,
    pub name: u8,
    pub color: u8,
    pub early_clock: bool,
}

impl SpriteAttributes {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            y: bytes[0],
            x: bytes[1],
            name: bytes[2],
            color: bytes[3] & 0x0F,
            early_clock: bytes[3] & 0x80 != 0,
        }
    }

    /// Left edge in screen pixels; may be negative with the early clock.
    #[must_use]
    pub fn screen_x(&self) -> i16 {
        let x = i16::from(self.x);
        if self.early_clock {
            x - EARLY_CLOCK_SHIFT
        } else {
            x
        }
    }

    /// First screen line covered. The chip displays a sprite starting one
    /// line below its Y value, and treats Y > $E0 as negative.
    #[must_use]
    pub fn top_line(&self) -> i16 {
        let y = i16::from(self.y);
        let y = if y > Y_WRAP_THRESHOLD { y - 256 } else { y };
        y + 1
    }
}

/// A sprite selected for the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveSprite {
    pub index: u8,
    pub attributes: SpriteAttributes,
    /// Source pattern row (0..size), after undoing magnification.
    pub pattern_row: u8,
}

/// Flags raised while evaluating and drawing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineStatus {
    /// Index of the first sprite that did not fit on the line.
    pub fifth_sprite: Option<u8>,
    /// Two sprites had opaque pattern pixels on the same screen pixel.
    pub collision: bool,
}

/// Where the attribute table walk stands. A $D0 entry or the end of the
/// table ends it outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    /// Looking for sprites with room left on the line.
    Collecting,
    /// Line is full; keep scanning only to honour a disabled limit.
    Overflowed,
}

/// Sprites found on one line, in priority (index) order.
#[derive(Debug, Clone)]
pub struct LineSprites {
    entries: [ActiveSprite; MAX_SPRITES],
    len: usize,
    fifth_sprite: Option<u8>,
}

impl LineSprites {
    #[must_use]
    pub fn as_slice(&self) -> &[ActiveSprite] {
        &self.entries[..self.len]
    }

    #[must_use]
    pub fn fifth_sprite(&self) -> Option<u8> {
        self.fifth_sprite
    }

    fn push(&mut self, sprite: ActiveSprite) {
        self.entries[self.len] = sprite;
        self.len += 1;
    }
}

/// Walk the attribute table for screen line `y`.
///
/// With `limit` set (the real chip), collection ends at the fifth match.
/// Without it every matching sprite is kept, but the fifth is still
/// reported so the status register behaves the same.
#[must_use]
pub fn evaluate_line(vram: &Vram, regs: &Registers, y: u8, limit: bool) -> LineSprites {
    let tables = TableResolver::new(regs);
    let size = i16::from(regs.sprite_size());
    let magnified = regs.sprite_magnified();

    let mut found = LineSprites {
        entries: [ActiveSprite::default(); MAX_SPRITES],
        len: 0,
        fifth_sprite: None,
    };
    let mut walk = Walk::Collecting;

    for index in 0..MAX_SPRITES as u8 {
        let addr = tables.sprite_attribute_address(index);
        let attributes = SpriteAttributes::from_bytes([
            vram.read(addr),
            vram.read(addr.wrapping_add(1)),
            vram.read(addr.wrapping_add(2)),
            vram.read(addr.wrapping_add(3)),
        ]);
        if attributes.y == LAST_SPRITE_Y {
            break;
        }

        let mut row = i16::from(y) - attributes.top_line();
        if magnified {
            // Arithmetic shift keeps -1 negative; division would round it to 0.
            row >>= 1;
        }
        if row < 0 || row >= size {
            continue;
        }

        let sprite = ActiveSprite {
            index,
            attributes,
            pattern_row: row as u8,
        };
        match walk {
            Walk::Collecting if found.len < SPRITES_PER_LINE => found.push(sprite),
            Walk::Collecting => {
                found.fifth_sprite = Some(index);
                walk = Walk::Overflowed;
                if limit {
                    break;
                }
                found.push(sprite);
            }
            Walk::Overflowed => found.push(sprite),
        }
    }

    found
}

/// Draw the sprites selected for a line.
///
/// `colors` receives the winning sprite colour per pixel, 0 where no
/// opaque sprite pixel lands. Lower indices are drawn first and keep the
/// pixel. Collision is tested on pattern coverage alone, so a sprite in
/// colour 0 still collides even though it draws nothing.
pub fn draw_line(
    vram: &Vram,
    regs: &Registers,
    sprites: &[ActiveSprite],
    colors: &mut ScanlineBuffer,
) -> bool {
    let tables = TableResolver::new(regs);
    let size = regs.sprite_size();
    let zoom: i16 = if regs.sprite_magnified() { 2 } else { 1 };
    let name_mask = if size == 16 { 0xFC } else { 0xFF };

    let mut coverage = [false; SCREEN_WIDTH];
    let mut collision = false;
    colors.fill(0);

    for sprite in sprites {
        let name = sprite.attributes.name & name_mask;
        let left = vram.read(tables.sprite_pattern_address(name, sprite.pattern_row));
        let right = if size == 16 {
            vram.read(tables.sprite_pattern_address(name, sprite.pattern_row + RIGHT_HALF_OFFSET))
        } else {
            0
        };
        let bits = u16::from_be_bytes([left, right]);
        if bits == 0 {
            continue;
        }

        let x0 = sprite.attributes.screen_x();
        let color = sprite.attributes.color;
        for px in 0..i16::from(size) * zoom {
            if bits & (0x8000 >> (px / zoom)) == 0 {
                continue;
            }
            let x = x0 + px;
            if !(0..SCREEN_WIDTH as i16).contains(&x) {
                continue;
            }
            let x = x as usize;
            if coverage[x] {
                collision = true;
            } else {
                coverage[x] = true;
            }
            if color != 0 && colors[x] == 0 {
                colors[x] = color;
            }
        }
    }

    collision
}

/// Evaluate and draw the sprite layer for line `y`.
pub fn render_line(
    vram: &Vram,
    regs: &Registers,
    y: u8,
    limit: bool,
    colors: &mut ScanlineBuffer,
) -> LineStatus {
    let found = evaluate_line(vram, regs, y, limit);
    let collision = draw_line(vram, regs, found.as_slice(), colors);
    LineStatus {
        fifth_sprite: found.fifth_sprite(),
        collision,
    }
}
