//! Seams to the scheduler, indicator, and Bluetooth collaborators.
//!
//! The board glue implements these on top of Embassy and the SoftDevice;
//! tests implement them with recording fakes.

use crate::error::Result;

/// A re-armable single-shot timer. Expiry calls
/// [`crate::gesture::debounce_expired`].
pub trait OneShotTimer {
    /// Arm (or re-arm) the timer to fire once after `after_ms`.
    fn start(&mut self, after_ms: u32) -> Result<()>;

    /// Disarm the timer. Stopping a timer that is not running is not an error.
    fn stop(&mut self) -> Result<()>;
}

/// The "data ready" wake hint handed to the Bluetooth context.
pub trait WakeSignal {
    fn raise(&self);
}

/// A status LED. Fire-and-forget.
pub trait Indicator {
    fn toggle(&mut self);
}

/// The connection-bound HID report notification channel.
pub trait ReportSink {
    /// Notify `report` on the HID report characteristic.
    fn notify(&mut self, report: &[u8]) -> Result<()>;
}
