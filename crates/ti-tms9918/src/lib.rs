//! Texas Instruments TMS9918A Video Display Processor.
//!
//! The VDP owns 16K of video RAM and eight write-only control registers. From
//! those it generates a 256x192 picture made of a pattern (background) layer
//! and up to 32 hardware sprites over a backdrop colour.
//!
//! # Standalone IC
//!
//! This crate knows nothing about the host machine. A system emulator either
//! drives the chip through its two CPU ports ([`Tms9918::write_control`],
//! [`Tms9918::write_data`], [`Tms9918::read_data`], [`Tms9918::read_status`])
//! or loads a whole snapshot with [`Tms9918::set_registers`] and
//! [`Tms9918::set_vram`], then asks for a [`Frame`].
//!
//! # Display modes
//!
//! | Mode        | M1 | M2 | M3 | Layout                                 |
//! |-------------|----|----|----|----------------------------------------|
//! | Graphics I  | 0  | 0  | 0  | 32x24 tiles, colour per 8 patterns     |
//! | Graphics II | x  | x  | 1  | 32x24 tiles, 3 banks, colour per row   |
//! | Multicolor  | 0  | 1  | 0  | 64x48 blocks of 4x4 pixels             |
//! | Text        | 1  | 0  | 0  | 40x24 glyphs of 6x8, no sprites        |
//!
//! M3 is R0 bit 1; M1 and M2 are R1 bits 4 and 3.
//!
//! # Rendering
//!
//! [`Tms9918::render`] is a pure function of the registers and VRAM: it
//! allocates a fresh [`Frame`] and leaves the chip untouched. Each line is
//! built from the background renderer and the sprite engine, then merged by
//! the compositor with colour 0 falling through to the backdrop.
//! [`Tms9918::run_frame`] additionally latches the frame's status flags and
//! raises the frame interrupt, the way the chip does at the end of the
//! active display.
//!
//! # Threads
//!
//! `Tms9918` is `Send` but has no internal synchronisation. Callers sharing
//! one instance between threads must hold a single lock across register
//! writes, VRAM writes and the render that depends on them.

pub mod background;
pub mod config;
pub mod error;
pub mod frame;
pub mod palette;
pub mod port;
pub mod registers;
pub mod sprites;
pub mod status;
pub mod tables;
pub mod vram;

pub use config::VdpConfig;
pub use error::VdpError;
pub use frame::Frame;
pub use palette::{Palette, Rgb, TMS9918A_PALETTE};
pub use registers::{Mode, NUM_REGISTERS, Registers};
pub use sprites::LineStatus;
pub use status::{Status, StatusFlags};
pub use vram::{VRAM_SIZE, Vram};

use port::PortState;

/// Active display width in pixels.
pub const SCREEN_WIDTH: usize = 256;
/// Active display height in lines.
pub const SCREEN_HEIGHT: usize = 192;

/// One line of 4-bit colour indices.
pub type ScanlineBuffer = [u8; SCREEN_WIDTH];

/// TMS9918A VDP.
#[derive(Clone)]
pub struct Tms9918 {
    config: VdpConfig,
    registers: Registers,
    vram: Vram,
    /// Latched status register, updated by `run_frame`.
    status: Status,
    port: PortState,
}

impl Tms9918 {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(VdpConfig::default())
    }

    #[must_use]
    pub fn with_config(config: VdpConfig) -> Self {
        Self {
            config,
            registers: Registers::default(),
            vram: Vram::new(),
            status: Status::new(),
            port: PortState::default(),
        }
    }

    /// Return to the power-on state: registers, VRAM, status and port all
    /// cleared. The configuration is kept.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config);
    }

    #[must_use]
    pub fn config(&self) -> &VdpConfig {
        &self.config
    }

    /// Replace all eight registers. Anything other than exactly eight bytes
    /// is rejected and the current registers are kept.
    pub fn set_registers(&mut self, bytes: &[u8]) -> Result<(), VdpError> {
        self.registers = Registers::from_bytes(bytes)?;
        Ok(())
    }

    /// Write one register (`index` is taken modulo 8).
    pub fn set_register(&mut self, index: u8, value: u8) {
        self.registers = self.registers.with_register(index, value);
    }

    /// Copy `data` into VRAM at `offset`. A block that would run past
    /// $3FFF is rejected and VRAM is left unchanged.
    pub fn set_vram(&mut self, offset: usize, data: &[u8]) -> Result<(), VdpError> {
        self.vram.write(offset, data)
    }

    #[must_use]
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    #[must_use]
    pub fn register(&self, index: u8) -> u8 {
        self.registers.raw()[usize::from(index) & (NUM_REGISTERS - 1)]
    }

    #[must_use]
    pub fn vram(&self) -> &[u8] {
        self.vram.as_slice()
    }

    /// Read a VRAM byte; the address wraps at 16K.
    #[must_use]
    pub fn vram_byte(&self, addr: u16) -> u8 {
        self.vram.read(addr)
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.registers.mode()
    }

    #[must_use]
    pub fn display_enabled(&self) -> bool {
        self.registers.display_enabled()
    }

    /// Render screen line `y` into `out` as colour indices with the
    /// backdrop already substituted.
    ///
    /// Lines outside the active area, and every line while the display is
    /// blanked, are solid backdrop.
    pub fn scanline(&self, y: u8, out: &mut ScanlineBuffer) -> LineStatus {
        let regs = &self.registers;
        if usize::from(y) >= SCREEN_HEIGHT || !regs.display_enabled() {
            out.fill(regs.backdrop());
            return LineStatus::default();
        }

        let mut background_line = [0; SCREEN_WIDTH];
        background::render_line(&self.vram, regs, y, &mut background_line);

        let mut sprite_line = [0; SCREEN_WIDTH];
        let status = if regs.mode().has_sprites() {
            sprites::render_line(
                &self.vram,
                regs,
                y,
                self.config.sprite_limit,
                &mut sprite_line,
            )
        } else {
            LineStatus::default()
        };

        frame::compose_line(&background_line, &sprite_line, regs.backdrop(), out);
        status
    }

    /// Render the full picture. The chip state is not modified.
    #[must_use]
    pub fn render(&self) -> Frame {
        let mut indices = vec![0; SCREEN_WIDTH * SCREEN_HEIGHT];
        let mut status = Status::new();
        let mut line = [0; SCREEN_WIDTH];

        for (y, row) in indices.chunks_exact_mut(SCREEN_WIDTH).enumerate() {
            status.record_line(self.scanline(y as u8, &mut line));
            row.copy_from_slice(&line);
        }

        if let Some(index) = status.fifth_sprite() {
            log::debug!("frame: fifth sprite overflow, first at sprite {index}");
        }
        if status.collision() {
            log::debug!("frame: sprite collision");
        }

        Frame::from_indices(indices, &self.config.palette, status)
    }

    /// Render a frame and advance the status register as the chip does at
    /// the end of the active display: latch 5S/C and set F.
    pub fn run_frame(&mut self) -> Frame {
        let frame = self.render();
        self.status.merge(frame.status());
        self.status.set_interrupt();
        frame
    }

    /// Current status register without the read side effects.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Interrupt line: frame flag set and interrupts enabled in R1.
    #[must_use]
    pub fn int_active(&self) -> bool {
        self.status.interrupt() && self.registers.interrupt_enabled()
    }
}

impl Default for Tms9918 {
    fn default() -> Self {
        Self::new()
    }
}
