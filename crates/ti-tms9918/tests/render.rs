//! Whole-frame rendering through the public API.

use ti_tms9918::{
    Frame, Mode, Palette, Rgb, SCREEN_HEIGHT, SCREEN_WIDTH, TMS9918A_PALETTE, Tms9918, VRAM_SIZE,
    VdpConfig, VdpError,
};

/// Graphics I with sprites: names $1800, colours $2000, patterns $0000,
/// sprite attributes $1B00, sprite patterns $3800.
const GFX1: [u8; 8] = [0x00, 0xC0, 0x06, 0x80, 0x00, 0x36, 0x07, 0x01];
const NAMES: usize = 0x1800;
const COLOURS: usize = 0x2000;
const SPRITE_ATTRS: usize = 0x1B00;
const SPRITE_PATTERNS: usize = 0x3800;

fn gfx1() -> Tms9918 {
    let mut vdp = Tms9918::new();
    vdp.set_registers(&GFX1).expect("registers");
    vdp.set_vram(SPRITE_ATTRS, &[0xD0]).expect("no sprites");
    vdp
}

fn assert_solid(frame: &Frame, color: Rgb) {
    assert_eq!(frame.pixels().len(), SCREEN_WIDTH * SCREEN_HEIGHT);
    assert!(frame.pixels().iter().all(|&p| p == color));
}

#[test]
fn render_is_deterministic() {
    let mut vdp = gfx1();
    let noise: Vec<u8> = (0..VRAM_SIZE).map(|i| (i * 7 + i / 13) as u8).collect();
    vdp.set_vram(0, &noise).expect("fill");

    let first = vdp.render();
    let second = vdp.render();
    assert_eq!(first, second);
    assert_eq!(first.to_rgb24(), second.to_rgb24());
}

#[test]
fn vram_round_trip_leaves_neighbours_alone() {
    let mut vdp = Tms9918::new();
    vdp.set_vram(0x1000, &[0x11, 0x22, 0x33]).expect("write");
    assert_eq!(&vdp.vram()[0x0FFF..0x1004], &[0x00, 0x11, 0x22, 0x33, 0x00]);
}

#[test]
fn out_of_range_vram_write_is_rejected() {
    let mut vdp = Tms9918::new();
    vdp.set_vram(0x3FF0, &[0xAB; 16]).expect("fits exactly");
    let before = vdp.vram().to_vec();

    let err = vdp.set_vram(0x3FF8, &[0xCD; 9]).expect_err("one byte too many");
    assert!(matches!(
        err,
        VdpError::OutOfRange {
            offset: 0x3FF8,
            len: 9,
            ..
        }
    ));
    assert_eq!(vdp.vram(), &before[..]);

    assert!(vdp.set_vram(VRAM_SIZE, &[0]).is_err());
    assert!(vdp.set_vram(VRAM_SIZE, &[]).is_ok());
}

#[test]
fn wrong_register_count_is_rejected() {
    let mut vdp = gfx1();
    for len in [0, 7, 9] {
        let err = vdp.set_registers(&vec![0xFF; len]).expect_err("bad length");
        assert_eq!(
            err,
            VdpError::InvalidLength {
                expected: 8,
                actual: len
            }
        );
        assert_eq!(vdp.registers().raw(), &GFX1);
    }
}

#[test]
fn solid_fill_backdrop() {
    for k in 1..16u8 {
        let mut vdp = gfx1();
        // All names 0, pattern 0 all zero, colour group 0 background K
        vdp.set_vram(COLOURS, &[k]).expect("colour");
        let frame = vdp.render();
        assert_solid(&frame, TMS9918A_PALETTE[usize::from(k)]);
    }
}

#[test]
fn transparent_background_shows_backdrop() {
    let mut vdp = gfx1();
    let mut regs = GFX1;
    regs[7] = 0x0D;
    vdp.set_registers(&regs).expect("registers");
    assert_solid(&vdp.render(), TMS9918A_PALETTE[13]);
}

#[test]
fn sprite_priority_lower_index_wins() {
    let mut vdp = gfx1();
    vdp.set_vram(
        SPRITE_ATTRS,
        &[
            0x1F, 0x40, 0x01, 0x06, // sprite 0: dark red
            0x1F, 0x40, 0x01, 0x0F, // sprite 1: white, same spot
            0xD0,
        ],
    )
    .expect("sprites");
    vdp.set_vram(SPRITE_PATTERNS + 8, &[0xFF; 8]).expect("pattern 1");

    let frame = vdp.render();
    for y in 0x20..0x28 {
        for x in 0x40..0x48 {
            assert_eq!(frame.pixel(x, y), Some(TMS9918A_PALETTE[6]), "({x}, {y})");
        }
    }
    assert_eq!(frame.pixel(0x48, 0x20), Some(TMS9918A_PALETTE[1]));
    assert!(frame.status().collision());
}

#[test]
fn sprite_sentinel_hides_later_entries() {
    let mut vdp = gfx1();
    let mut attrs = Vec::new();
    for i in 0..8u8 {
        attrs.extend_from_slice(&[0x0F + i * 16, i * 24, 0x00, 0x0F]);
    }
    vdp.set_vram(SPRITE_ATTRS, &attrs).expect("sprites");
    vdp.set_vram(SPRITE_PATTERNS, &[0xFF; 8]).expect("pattern 0");

    let all = vdp.render();
    for i in 0..8usize {
        assert_eq!(all.index(i * 24, 0x10 + i * 16), Some(15), "sprite {i}");
    }

    // Terminate at entry 3
    vdp.set_vram(SPRITE_ATTRS + 3 * 4, &[0xD0]).expect("sentinel");
    let cut = vdp.render();
    for i in 0..3usize {
        assert_eq!(cut.index(i * 24, 0x10 + i * 16), Some(15), "sprite {i}");
    }
    for i in 3..8usize {
        assert_eq!(cut.index(i * 24, 0x10 + i * 16), Some(1), "sprite {i}");
    }
}

#[test]
fn fifth_sprite_is_reported_and_dropped() {
    let mut vdp = gfx1();
    let mut attrs = Vec::new();
    for i in 0..5u8 {
        attrs.extend_from_slice(&[0x3F, i * 16, 0x00, 0x0A]);
    }
    attrs.push(0xD0);
    vdp.set_vram(SPRITE_ATTRS, &attrs).expect("sprites");
    vdp.set_vram(SPRITE_PATTERNS, &[0xFF; 8]).expect("pattern 0");

    let frame = vdp.render();
    assert_eq!(frame.status().fifth_sprite(), Some(4));
    assert!(!frame.status().collision());
    assert_eq!(frame.index(48, 0x40), Some(10));
    assert_eq!(frame.index(64, 0x40), Some(1));

    let mut relaxed = Tms9918::with_config(VdpConfig {
        sprite_limit: false,
        ..VdpConfig::default()
    });
    relaxed.set_registers(&GFX1).expect("registers");
    relaxed.set_vram(SPRITE_ATTRS, &attrs).expect("sprites");
    relaxed.set_vram(SPRITE_PATTERNS, &[0xFF; 8]).expect("pattern 0");
    let frame = relaxed.render();
    assert_eq!(frame.status().fifth_sprite(), Some(4));
    assert_eq!(frame.index(64, 0x40), Some(10));
}

#[test]
fn graphics_i_and_text_lay_out_the_same_vram_differently() {
    let mut vdp = gfx1();
    // Pattern 1 is a left-aligned bar; names 0..=1 alternate along row 0
    vdp.set_vram(8, &[0xF0; 8]).expect("pattern 1");
    let row: Vec<u8> = (0..40).map(|i| (i % 2) as u8).collect();
    vdp.set_vram(NAMES, &row).expect("names");
    vdp.set_vram(COLOURS, &[0xF4]).expect("white on blue");

    let graphics = vdp.render();
    assert_eq!(vdp.mode(), Mode::GraphicsI);
    // Cell 1 starts at x=8 and lights 4 pixels
    assert_eq!(graphics.index(8, 0), Some(15));
    assert_eq!(graphics.index(11, 0), Some(15));
    assert_eq!(graphics.index(12, 0), Some(4));

    // Same tables viewed in Text mode, white on blue from R7
    let mut text_regs = GFX1;
    text_regs[1] = 0xD0;
    text_regs[7] = 0xF4;
    vdp.set_registers(&text_regs).expect("registers");
    let text = vdp.render();
    assert_eq!(vdp.mode(), Mode::Text);
    // Left border, then glyph 0 (blank) at 8..14, glyph 1 at 14..20
    assert_eq!(text.index(7, 0), Some(4));
    assert_eq!(text.index(8, 0), Some(4));
    assert_eq!(text.index(14, 0), Some(15));
    assert_eq!(text.index(17, 0), Some(15));
    assert_eq!(text.index(18, 0), Some(4));
    assert_eq!(text.index(255, 0), Some(4));

    assert_ne!(graphics, text);
}

#[test]
fn custom_palette_is_used_for_rgb_output() {
    let mut entries = TMS9918A_PALETTE;
    entries[1] = Rgb::new(0x10, 0x20, 0x30);
    let mut vdp = Tms9918::with_config(VdpConfig {
        palette: Palette::new(entries),
        ..VdpConfig::default()
    });
    vdp.set_registers(&GFX1).expect("registers");
    vdp.set_vram(SPRITE_ATTRS, &[0xD0]).expect("no sprites");

    let frame = vdp.render();
    assert_eq!(&frame.to_rgb24()[..3], &[0x10, 0x20, 0x30]);
    assert_eq!(frame.to_argb32()[0], 0xFF10_2030);
}
