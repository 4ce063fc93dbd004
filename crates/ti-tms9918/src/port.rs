//! CPU port interface.
//!
//! The chip sits on two ports. The control port takes two-byte commands:
//!
//! | Second byte | Command                                       |
//! |-------------|-----------------------------------------------|
//! | `1---_-RRR` | Write first byte to register RRR              |
//! | `01AA_AAAA` | Set address (first byte = low 8) for writing  |
//! | `00AA_AAAA` | Set address for reading; pre-fetch one byte   |
//!
//! Reads of the control port return the status register. The data port
//! reads and writes VRAM at the address counter, which auto-increments and
//! wraps at 16K. Reads are served from a one-byte read-ahead buffer.

use crate::Tms9918;
use crate::vram::VRAM_MASK;

/// Control port latch and address counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PortState {
    /// First byte of a pending two-byte command.
    latch: Option<u8>,
    address: u16,
    read_ahead: u8,
}

impl PortState {
    fn advance(&mut self) {
        self.address = (self.address + 1) & VRAM_MASK;
    }
}

impl Tms9918 {
    /// Write to the control port.
    pub fn write_control(&mut self, value: u8) {
        let Some(first) = self.port.latch.take() else {
            self.port.latch = Some(value);
            return;
        };

        if value & 0x80 != 0 {
            let index = value & 0x07;
            log::trace!("port: R{index} <- ${first:02X}");
            self.set_register(index, first);
            return;
        }

        self.port.address = (u16::from(value & 0x3F) << 8) | u16::from(first);
        if value & 0x40 == 0 {
            self.port.read_ahead = self.vram.read(self.port.address);
            self.port.advance();
        }
    }

    /// Write to the data port: store at the address counter and advance.
    pub fn write_data(&mut self, value: u8) {
        self.port.latch = None;
        self.port.read_ahead = value;
        self.vram.poke(self.port.address, value);
        self.port.advance();
    }

    /// Read from the data port: return the read-ahead byte and refill it.
    pub fn read_data(&mut self) -> u8 {
        self.port.latch = None;
        let value = self.port.read_ahead;
        self.port.read_ahead = self.vram.read(self.port.address);
        self.port.advance();
        value
    }

    /// Peek at the read-ahead byte without advancing or refilling it.
    #[must_use]
    pub fn read_data_no_inc(&self) -> u8 {
        self.port.read_ahead
    }

    /// Read the status port. Clears F, 5S and C and resets the control
    /// latch.
    pub fn read_status(&mut self) -> u8 {
        let value = self.status.bits();
        self.status.clear();
        self.port.latch = None;
        value
    }

    /// Current VRAM address counter.
    #[must_use]
    pub fn address(&self) -> u16 {
        self.port.address
    }
}

#[cfg(test)]
mod tests {
    use crate::{Mode, Tms9918};

    fn set_write_address(vdp: &mut Tms9918, addr: u16) {
        vdp.write_control(addr as u8);
        vdp.write_control(0x40 | (addr >> 8) as u8);
    }

    fn set_read_address(vdp: &mut Tms9918, addr: u16) {
        vdp.write_control(addr as u8);
        vdp.write_control((addr >> 8) as u8);
    }

    #[test]
    fn register_write_through_control_port() {
        let mut vdp = Tms9918::new();
        vdp.write_control(0xD0);
        vdp.write_control(0x81);
        assert_eq!(vdp.register(1), 0xD0);
        assert_eq!(vdp.mode(), Mode::Text);

        // Register number uses the low three bits only
        vdp.write_control(0xF5);
        vdp.write_control(0x8F);
        assert_eq!(vdp.register(7), 0xF5);
    }

    #[test]
    fn data_writes_auto_increment() {
        let mut vdp = Tms9918::new();
        set_write_address(&mut vdp, 0x1800);
        for byte in [1, 2, 3] {
            vdp.write_data(byte);
        }
        assert_eq!(&vdp.vram()[0x1800..0x1803], &[1, 2, 3]);
        assert_eq!(vdp.address(), 0x1803);
    }

    #[test]
    fn read_setup_prefetches() {
        let mut vdp = Tms9918::new();
        vdp.set_vram(0x2000, &[0xAA, 0xBB, 0xCC]).expect("seed");
        set_read_address(&mut vdp, 0x2000);
        assert_eq!(vdp.address(), 0x2001);
        assert_eq!(vdp.read_data(), 0xAA);
        assert_eq!(vdp.read_data(), 0xBB);
        assert_eq!(vdp.read_data(), 0xCC);
    }

    #[test]
    fn address_wraps_at_16k() {
        let mut vdp = Tms9918::new();
        set_write_address(&mut vdp, 0x3FFF);
        vdp.write_data(0x11);
        vdp.write_data(0x22);
        assert_eq!(vdp.vram_byte(0x3FFF), 0x11);
        assert_eq!(vdp.vram_byte(0x0000), 0x22);
        assert_eq!(vdp.address(), 0x0001);
    }

    #[test]
    fn status_read_resets_latch_and_flags() {
        let mut vdp = Tms9918::new();
        vdp.write_control(0x34);
        assert_eq!(vdp.read_status(), 0x1F);

        // The pending $34 was discarded, so this pair is a fresh command
        vdp.write_control(0xE0);
        vdp.write_control(0x81);
        assert_eq!(vdp.register(1), 0xE0);

        vdp.run_frame();
        assert_eq!(vdp.read_status() & 0x80, 0x80);
        assert_eq!(vdp.read_status(), 0x1F);
        assert!(!vdp.int_active());
    }

    #[test]
    fn read_without_increment_has_no_side_effects() {
        let mut vdp = Tms9918::new();
        vdp.set_vram(0x0400, &[0x12, 0x34]).expect("seed");
        set_read_address(&mut vdp, 0x0400);
        assert_eq!(vdp.read_data_no_inc(), 0x12);
        assert_eq!(vdp.read_data_no_inc(), 0x12);
        assert_eq!(vdp.address(), 0x0401);
        assert_eq!(vdp.read_data(), 0x12);
        assert_eq!(vdp.read_data_no_inc(), 0x34);
    }

    #[test]
    fn data_write_updates_read_ahead() {
        let mut vdp = Tms9918::new();
        set_write_address(&mut vdp, 0x0100);
        vdp.write_data(0x77);
        assert_eq!(vdp.read_data(), 0x77);
    }
}
