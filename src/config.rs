//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, report layout constants, and BLE parameters
//! live here so they can be tuned in one place.

// Gesture timing

/// Period of the gesture classifier loop (ms).
pub const CLASSIFIER_TICK_MS: u64 = 50;

/// How long both buttons must stay held before the phrase is typed (ms).
pub const DEBOUNCE_WINDOW_MS: u32 = 2000;

/// Pause after each typed keystroke so the host does not see key repeat (ms).
pub const KEYSTROKE_INTERVAL_MS: u32 = 20;

// HID reports

/// Report ID prefixed to every keyboard report.
pub const KEYBOARD_REPORT_ID: u8 = 0x01;

/// Report ID prefixed to every mouse report.
pub const MOUSE_REPORT_ID: u8 = 0x02;

/// Left Shift bit in the keyboard modifier byte.
pub const MODIFIER_LEFT_SHIFT: u8 = 0x02;

/// Wheel delta sent for one scroll-up step.
pub const SCROLL_UP_DISTANCE: i8 = 1;

/// Wheel delta sent for one scroll-down step (0xFF on the wire).
pub const SCROLL_DOWN_DISTANCE: i8 = -1;

// BLE

/// GAP device name, used in the advertising payload and the GAP service.
pub const DEVICE_NAME: &str = "KeyMouse";

/// Advertising interval in 0.625 ms units. 160 = 100 ms.
pub const BLE_ADV_INTERVAL: u32 = 160;

/// GAP appearance: generic Human Interface Device.
pub const BLE_APPEARANCE_HID: u16 = 0x03C0;

/// BLE connection interval range (in 1.25 ms units).
/// 6 = 7.5 ms (lowest latency for HID).
pub const BLE_CONN_INTERVAL_MIN: u16 = 6;
pub const BLE_CONN_INTERVAL_MAX: u16 = 12;

/// BLE slave latency (number of connection events the peripheral can skip).
pub const BLE_SLAVE_LATENCY: u16 = 0;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

/// Polls of the link security level before bonding counts as failed.
pub const SECURITY_POLL_COUNT: u32 = 25;

/// Interval between link security polls (ms). 25 x 200 ms = 5 s.
pub const SECURITY_POLL_INTERVAL_MS: u64 = 200;

/// Maximum number of bonded hosts kept in RAM.
pub const MAX_BONDED_HOSTS: usize = 4;

/// Bytes reserved per bond for the GATT system attributes (CCCD values).
pub const SYS_ATTRS_CAPACITY: usize = 62;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` pins are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button A  → P0.11  (scroll down)
//   Button B  → P0.12  (scroll up)
//   LED 0     → P0.13
//   LED 1     → P0.14
