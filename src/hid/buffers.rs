//! Reused report buffers.
//!
//! Every build starts from an all-zero buffer, so a field written for one
//! report can never leak into the next.

use super::keyboard::{KeyboardReport, KEYBOARD_REPORT_SIZE};
use super::mouse::{MouseReport, MOUSE_REPORT_SIZE};
use super::phrase::Keystroke;
use crate::config::{KEYBOARD_REPORT_ID, MOUSE_REPORT_ID};

/// Keyboard report on the wire: report ID + 8-byte boot report.
pub const KEYBOARD_WIRE_LEN: usize = 1 + KEYBOARD_REPORT_SIZE;

/// Mouse report on the wire: report ID + 4-byte boot report.
pub const MOUSE_WIRE_LEN: usize = 1 + MOUSE_REPORT_SIZE;

/// Storage for the outgoing keyboard and mouse reports.
pub struct ReportBuffers {
    keyboard: [u8; KEYBOARD_WIRE_LEN],
    mouse: [u8; MOUSE_WIRE_LEN],
}

impl ReportBuffers {
    pub const fn new() -> Self {
        Self {
            keyboard: [0; KEYBOARD_WIRE_LEN],
            mouse: [0; MOUSE_WIRE_LEN],
        }
    }

    /// Key-down report for `keystroke`.
    pub fn key_down(&mut self, keystroke: Keystroke) -> &[u8] {
        self.build_keyboard(KeyboardReport::single_key(
            keystroke.modifier,
            keystroke.keycode,
        ))
    }

    /// All-keys-released report.
    pub fn key_up(&mut self) -> &[u8] {
        self.build_keyboard(KeyboardReport::empty())
    }

    /// Wheel-only mouse report.
    pub fn scroll(&mut self, wheel: i8) -> &[u8] {
        self.mouse.fill(0);
        self.mouse[0] = MOUSE_REPORT_ID;
        let written = MouseReport::scroll(wheel).serialize(&mut self.mouse[1..]);
        debug_assert_eq!(written, MOUSE_REPORT_SIZE);
        &self.mouse
    }

    fn build_keyboard(&mut self, report: KeyboardReport) -> &[u8] {
        self.keyboard.fill(0);
        self.keyboard[0] = KEYBOARD_REPORT_ID;
        let written = report.serialize(&mut self.keyboard[1..]);
        debug_assert_eq!(written, KEYBOARD_REPORT_SIZE);
        &self.keyboard
    }
}

impl Default for ReportBuffers {
    fn default() -> Self {
        Self::new()
    }
}
