//! Host-testable core of the keymouse firmware.
//!
//! Everything that decides *what* the device sends lives here and builds
//! on the host: the edge latch, the gesture classifier, the debounce
//! expiry handler, the report dispatcher, the Bluetooth event policy, and
//! the HID report encoding. The embedded binary (`main.rs`, behind the
//! `embedded` feature) only wires these to Embassy and the SoftDevice.
//!
//! Usage: `cargo test --lib` or `cargo test` for the integration tests too.

#![cfg_attr(not(test), no_std)]

pub mod advertising;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gesture;
pub mod hid;
pub mod intent;
pub mod latch;
pub mod link;
pub mod platform;
pub mod state;

pub use dispatch::ReportDispatcher;
pub use error::{Error, Result};
pub use gesture::{debounce_expired, Gesture, GestureClassifier};
pub use intent::Intent;
pub use latch::{ButtonId, EdgeLatch, HeldMask};
pub use link::{on_stack_event, Reaction, StackEvent};
pub use platform::{Indicator, OneShotTimer, ReportSink, WakeSignal};
pub use state::SharedState;

// ═══════════════════════════════════════════════════════════════════════════
// Cross-module consistency checks
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::config::*;
    use super::hid::report_map::{REPORT_MAP, REPORT_MAP_CAPACITY};
    use super::hid::{ReportBuffers, KEYBOARD_WIRE_LEN, MOUSE_WIRE_LEN, EETREE_CN};

    #[test]
    fn report_map_fits_gatt_attribute() {
        assert!(REPORT_MAP.len() <= REPORT_MAP_CAPACITY);
    }

    #[test]
    fn wire_lengths_carry_report_id() {
        let mut buffers = ReportBuffers::new();
        let down = buffers.key_down(EETREE_CN[0]);
        assert_eq!(down.len(), KEYBOARD_WIRE_LEN);
        assert_eq!(down[0], KEYBOARD_REPORT_ID);

        let wheel = buffers.scroll(SCROLL_UP_DISTANCE);
        assert_eq!(wheel.len(), MOUSE_WIRE_LEN);
        assert_eq!(wheel[0], MOUSE_REPORT_ID);
    }

    #[test]
    fn scroll_distances_are_opposite_single_steps() {
        assert_eq!(SCROLL_UP_DISTANCE, -SCROLL_DOWN_DISTANCE);
        assert_eq!(SCROLL_DOWN_DISTANCE as u8, 0xFF);
    }

    #[test]
    fn phrase_fits_inside_debounce_window() {
        let typing_ms = EETREE_CN.len() as u32 * KEYSTROKE_INTERVAL_MS;
        assert!(typing_ms < DEBOUNCE_WINDOW_MS);
    }

    #[test]
    fn security_poll_budget_is_five_seconds() {
        assert_eq!(SECURITY_POLL_COUNT as u64 * SECURITY_POLL_INTERVAL_MS, 5_000);
    }
}
