//! Unified error type for keymouse.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // BLE
    /// The SoftDevice rejected a GATT notification.
    Notify,

    /// Advertising could not be started.
    Advertise,

    /// Requesting link security (pairing/bonding) failed.
    Security,

    /// A GATT attribute value could not be set.
    GattValue,

    // Timer
    /// The debounce timer could not be armed.
    TimerStart,

    /// The debounce timer could not be stopped.
    TimerStop,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}

/// Convenience alias used by every fallible operation in the crate.
pub type Result<T> = core::result::Result<T, Error>;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Error::Notify => "HID report notification failed",
            Error::Advertise => "advertising failed",
            Error::Security => "security request failed",
            Error::GattValue => "GATT value update failed",
            Error::TimerStart => "debounce timer start failed",
            Error::TimerStop => "debounce timer stop failed",
            Error::BufferOverflow => "buffer overflow",
        };
        f.write_str(msg)
    }
}
