//! State shared by the edge handlers, the classifier, the debounce timer,
//! and the Bluetooth context.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::intent::IntentCell;
use crate::latch::EdgeLatch;

/// Everything that crosses execution contexts. One `static` instance lives
/// for the powered-on lifetime of the device.
pub struct SharedState {
    pub latch: EdgeLatch,
    pub intent: IntentCell,
    subscribed: AtomicBool,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            latch: EdgeLatch::new(),
            intent: IntentCell::new(),
            subscribed: AtomicBool::new(false),
        }
    }

    /// Whether a client currently receives notifications on the report
    /// characteristic.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::Acquire)
    }

    /// Only the stack event policy in [`crate::link`] writes this.
    pub(crate) fn set_subscribed(&self, subscribed: bool) {
        self.subscribed.store(subscribed, Ordering::Release);
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
