//! HID mouse input report (boot protocol compatible).
//!
//! Layout (4 bytes, sent after the report ID byte):
//! ```text
//! Byte 0: Button bitfield
//!         Bit 0 = Left, Bit 1 = Right, Bit 2 = Middle
//! Byte 1: X displacement (signed, -127..127)
//! Byte 2: Y displacement (signed, -127..127)
//! Byte 3: Scroll wheel  (signed, -127..127)
//! ```

/// Mouse report size in bytes (without the report ID).
pub const MOUSE_REPORT_SIZE: usize = 4;

/// Standard boot-protocol mouse report with wheel.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    /// Button bitfield (bit 0 = left, bit 1 = right, bit 2 = middle).
    pub buttons: u8,
    /// Relative X movement (signed).
    pub x: i8,
    /// Relative Y movement (signed).
    pub y: i8,
    /// Scroll wheel delta (signed).
    pub wheel: i8,
}

impl MouseReport {
    /// A report that only turns the wheel by `wheel` detents.
    pub const fn scroll(wheel: i8) -> Self {
        Self {
            buttons: 0,
            x: 0,
            y: 0,
            wheel,
        }
    }

    /// Serialise into a byte slice.
    /// Returns the number of bytes written (4, or 0 if `buf` is too small).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < MOUSE_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.buttons;
        buf[1] = self.x as u8;
        buf[2] = self.y as u8;
        buf[3] = self.wheel as u8;
        MOUSE_REPORT_SIZE
    }

    /// Returns `true` when no buttons are pressed and there is no movement.
    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.buttons == 0 && self.x == 0 && self.y == 0 && self.wheel == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_report_only_moves_wheel() {
        let report = MouseReport::scroll(1);
        assert_eq!(report.buttons, 0);
        assert_eq!(report.x, 0);
        assert_eq!(report.y, 0);
        assert_eq!(report.wheel, 1);
        assert!(!report.is_idle());
    }

    #[test]
    fn negative_wheel_is_twos_complement_on_the_wire() {
        let mut buf = [0u8; 4];
        assert_eq!(MouseReport::scroll(-1).serialize(&mut buf), 4);
        assert_eq!(buf, [0x00, 0x00, 0x00, 0xFF]);
    }

    #[test]
    fn default_report_is_idle() {
        assert!(MouseReport::default().is_idle());
    }

    #[test]
    fn serialize_buffer_too_small() {
        let mut buf = [0u8; 2];
        assert_eq!(MouseReport::scroll(1).serialize(&mut buf), 0);
    }
}
