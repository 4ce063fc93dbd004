//! Raw TMS9918 dump files and PNG output.
//!
//! A dump is the chip's state laid end to end: 16384 bytes of VRAM followed
//! by the 8 control registers. Anything after the registers is ignored.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::warn;
use thiserror::Error;
use ti_tms9918::{Frame, NUM_REGISTERS, Tms9918, VRAM_SIZE, VdpError};

/// Minimum dump length: VRAM then registers.
pub const DUMP_LEN: usize = VRAM_SIZE + NUM_REGISTERS;

/// Largest upscale factor accepted by [`encode_png`].
pub const MAX_SCALE: u32 = 8;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("dump too short: {len} bytes (need 16392)")]
    TooShort { len: usize },
    #[error("invalid scale {0} (1-8)")]
    Scale(u32),
    #[error(transparent)]
    Vdp(#[from] VdpError),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A parsed dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump {
    vram: Vec<u8>,
    registers: [u8; NUM_REGISTERS],
}

impl Dump {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DumpError> {
        if bytes.len() < DUMP_LEN {
            return Err(DumpError::TooShort { len: bytes.len() });
        }
        if bytes.len() > DUMP_LEN {
            warn!(
                "ignoring {} trailing bytes after the registers",
                bytes.len() - DUMP_LEN
            );
        }

        let (vram, rest) = bytes.split_at(VRAM_SIZE);
        let mut registers = [0; NUM_REGISTERS];
        registers.copy_from_slice(&rest[..NUM_REGISTERS]);
        Ok(Self {
            vram: vram.to_vec(),
            registers,
        })
    }

    #[must_use]
    pub fn vram(&self) -> &[u8] {
        &self.vram
    }

    #[must_use]
    pub fn registers(&self) -> &[u8; NUM_REGISTERS] {
        &self.registers
    }

    /// Load this dump into a VDP.
    pub fn apply(&self, vdp: &mut Tms9918) -> Result<(), DumpError> {
        vdp.set_vram(0, &self.vram)?;
        vdp.set_registers(&self.registers)?;
        Ok(())
    }
}

/// Encode `frame` as an 8-bit RGB PNG, each pixel repeated `scale` times
/// in both directions.
pub fn encode_png<W: Write>(frame: &Frame, scale: u32, out: W) -> Result<(), DumpError> {
    if !(1..=MAX_SCALE).contains(&scale) {
        return Err(DumpError::Scale(scale));
    }
    let factor = scale as usize;
    let width = Frame::WIDTH * factor;
    let height = Frame::HEIGHT * factor;

    let mut encoder = png::Encoder::new(out, width as u32, height as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let rgb = frame.to_rgb24();
    let mut data = Vec::with_capacity(width * height * 3);
    let mut row = Vec::with_capacity(width * 3);
    for src in rgb.chunks_exact(Frame::WIDTH * 3) {
        row.clear();
        for pixel in src.chunks_exact(3) {
            for _ in 0..factor {
                row.extend_from_slice(pixel);
            }
        }
        for _ in 0..factor {
            data.extend_from_slice(&row);
        }
    }

    writer.write_image_data(&data)?;
    writer.finish()?;
    Ok(())
}

/// Save `frame` as a PNG file at `path`.
pub fn write_png(frame: &Frame, scale: u32, path: &Path) -> Result<(), DumpError> {
    let file = fs::File::create(path)?;
    encode_png(frame, scale, BufWriter::new(file))
}
