//! Status register.
//!
//! | Bit | Name | Meaning                                   |
//! |-----|------|-------------------------------------------|
//! | 7   | F    | Frame complete (interrupt pending)        |
//! | 6   | 5S   | Fifth sprite found on a line              |
//! | 5   | C    | Sprite collision                          |
//! | 4-0 |      | Number of the fifth sprite ($1F if none)  |

use bitflags::bitflags;

use crate::sprites::LineStatus;

bitflags! {
    /// Flag bits of the status register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StatusFlags: u8 {
        const INTERRUPT = 0x80;
        const FIFTH_SPRITE = 0x40;
        const COLLISION = 0x20;
    }
}

/// Fifth-sprite field value when no line overflowed.
pub const NO_FIFTH_SPRITE: u8 = 0x1F;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status {
    flags: StatusFlags,
    fifth_sprite: u8,
}

impl Status {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            flags: StatusFlags::empty(),
            fifth_sprite: NO_FIFTH_SPRITE,
        }
    }

    /// The byte a CPU read of the status port would see.
    #[must_use]
    pub fn bits(&self) -> u8 {
        self.flags.bits() | (self.fifth_sprite & 0x1F)
    }

    #[must_use]
    pub fn flags(&self) -> StatusFlags {
        self.flags
    }

    #[must_use]
    pub fn interrupt(&self) -> bool {
        self.flags.contains(StatusFlags::INTERRUPT)
    }

    #[must_use]
    pub fn collision(&self) -> bool {
        self.flags.contains(StatusFlags::COLLISION)
    }

    /// Index of the first sprite that overflowed a line, if any did.
    #[must_use]
    pub fn fifth_sprite(&self) -> Option<u8> {
        self.flags
            .contains(StatusFlags::FIFTH_SPRITE)
            .then_some(self.fifth_sprite)
    }

    /// Fold one rendered line into the frame status. Only the first
    /// overflow of the frame is recorded.
    pub fn record_line(&mut self, line: LineStatus) {
        if let Some(index) = line.fifth_sprite {
            self.latch_fifth(index);
        }
        if line.collision {
            self.flags.insert(StatusFlags::COLLISION);
        }
    }

    /// Accumulate another status on top of this one without overwriting
    /// an already latched fifth-sprite number.
    pub fn merge(&mut self, other: Status) {
        if let Some(index) = other.fifth_sprite() {
            self.latch_fifth(index);
        }
        self.flags |= other.flags & !StatusFlags::FIFTH_SPRITE;
    }

    pub fn set_interrupt(&mut self) {
        self.flags.insert(StatusFlags::INTERRUPT);
    }

    /// Return to the power-on state, as after a status read.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn latch_fifth(&mut self, index: u8) {
        if !self.flags.contains(StatusFlags::FIFTH_SPRITE) {
            self.flags.insert(StatusFlags::FIFTH_SPRITE);
            self.fifth_sprite = index & 0x1F;
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_status_reads_1f() {
        let status = Status::new();
        assert_eq!(status.bits(), 0x1F);
        assert_eq!(status.fifth_sprite(), None);
    }

    #[test]
    fn first_overflow_wins() {
        let mut status = Status::new();
        status.record_line(LineStatus {
            fifth_sprite: Some(6),
            collision: false,
        });
        status.record_line(LineStatus {
            fifth_sprite: Some(9),
            collision: true,
        });
        assert_eq!(status.fifth_sprite(), Some(6));
        assert!(status.collision());
        assert_eq!(status.bits(), 0x40 | 0x20 | 6);
        assert_eq!(
            status.flags(),
            StatusFlags::FIFTH_SPRITE | StatusFlags::COLLISION
        );
    }

    #[test]
    fn merge_keeps_latched_number_and_adds_flags() {
        let mut chip = Status::new();
        chip.set_interrupt();
        chip.record_line(LineStatus {
            fifth_sprite: Some(2),
            collision: false,
        });

        let mut frame = Status::new();
        frame.record_line(LineStatus {
            fifth_sprite: Some(17),
            collision: true,
        });
        chip.merge(frame);

        assert_eq!(chip.bits(), 0x80 | 0x40 | 0x20 | 2);
        chip.clear();
        assert_eq!(chip.bits(), 0x1F);
    }
}
