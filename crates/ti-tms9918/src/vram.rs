//! 16K video RAM.
//!
//! The VDP drives a 14-bit address bus, so every internal fetch wraps at
//! $3FFF. Bulk writes from the host are bounds-checked instead: a snapshot
//! that does not fit is a caller bug, not something to fold back to $0000.

use crate::error::VdpError;

/// VRAM size in bytes.
pub const VRAM_SIZE: usize = 0x4000;

/// Address mask for the 14-bit VRAM bus.
pub(crate) const VRAM_MASK: u16 = 0x3FFF;

#[derive(Clone)]
pub struct Vram {
    bytes: Box<[u8; VRAM_SIZE]>,
}

impl Vram {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: Box::new([0; VRAM_SIZE]),
        }
    }

    /// Copy `data` into VRAM starting at `offset`.
    ///
    /// Fails without touching memory if the block would extend past $3FFF.
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), VdpError> {
        let end = offset
            .checked_add(data.len())
            .filter(|&end| end <= VRAM_SIZE)
            .ok_or(VdpError::OutOfRange {
                offset,
                len: data.len(),
                limit: VRAM_SIZE,
            })?;
        self.bytes[offset..end].copy_from_slice(data);
        log::trace!("VRAM write: {} bytes at ${offset:04X}", data.len());
        Ok(())
    }

    /// Read a byte, wrapping the address at 16K.
    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[usize::from(addr & VRAM_MASK)]
    }

    /// Store a single byte, wrapping the address at 16K (data-port writes).
    pub(crate) fn poke(&mut self, addr: u16, value: u8) {
        self.bytes[usize::from(addr & VRAM_MASK)] = value;
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl Default for Vram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_back() {
        let mut vram = Vram::new();
        vram.write(0x1234, &[0xDE, 0xAD, 0xBE, 0xEF])
            .expect("in range");
        assert_eq!(vram.read(0x1233), 0x00);
        assert_eq!(vram.read(0x1234), 0xDE);
        assert_eq!(vram.read(0x1237), 0xEF);
        assert_eq!(vram.read(0x1238), 0x00);
    }

    #[test]
    fn write_up_to_last_byte_is_allowed() {
        let mut vram = Vram::new();
        vram.write(VRAM_SIZE - 1, &[0x5A]).expect("fits exactly");
        assert_eq!(vram.read(0x3FFF), 0x5A);
        vram.write(VRAM_SIZE, &[]).expect("empty write at end");
    }

    #[test]
    fn overlong_write_is_rejected_and_leaves_memory_alone() {
        let mut vram = Vram::new();
        vram.write(0x3FFE, &[0x11, 0x22]).expect("fits");

        let err = vram.write(0x3FFE, &[0xAA, 0xBB, 0xCC]);
        assert_eq!(
            err,
            Err(VdpError::OutOfRange {
                offset: 0x3FFE,
                len: 3,
                limit: VRAM_SIZE,
            })
        );
        assert_eq!(vram.read(0x3FFE), 0x11);
        assert_eq!(vram.read(0x3FFF), 0x22);
        assert_eq!(vram.read(0x0000), 0x00, "must not wrap to the bottom");
    }

    #[test]
    fn huge_offset_does_not_overflow() {
        let mut vram = Vram::new();
        assert!(vram.write(usize::MAX, &[1]).is_err());
    }

    #[test]
    fn reads_wrap_at_16k() {
        let mut vram = Vram::new();
        vram.write(0x0005, &[0x77]).expect("in range");
        assert_eq!(vram.read(0x4005), 0x77);
        assert_eq!(vram.read(0xC005), 0x77);
    }

    #[test]
    fn poke_wraps() {
        let mut vram = Vram::new();
        vram.poke(0x4000, 0x42);
        assert_eq!(vram.read(0), 0x42);
    }
}
