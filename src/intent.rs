//! The pending intent handed from the classifier to the dispatcher.

use core::sync::atomic::{AtomicU8, Ordering};

/// What the next dispatch should send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Intent {
    #[default]
    Idle = 0,
    ScrollUp = 1,
    ScrollDown = 2,
    SendString = 3,
}

impl Intent {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Intent::ScrollUp,
            2 => Intent::ScrollDown,
            3 => Intent::SendString,
            _ => Intent::Idle,
        }
    }
}

/// Single-word cell holding at most one outstanding intent.
///
/// Writers are the classifier tick and the debounce-expiry callback, which
/// never run for the same gesture, so last-writer-wins. The dispatcher
/// consumes with [`IntentCell::take`], which swaps in `Idle`.
pub struct IntentCell {
    raw: AtomicU8,
}

impl IntentCell {
    pub const fn new() -> Self {
        Self {
            raw: AtomicU8::new(Intent::Idle as u8),
        }
    }

    pub fn set(&self, intent: Intent) {
        self.raw.store(intent as u8, Ordering::Release);
    }

    pub fn get(&self) -> Intent {
        Intent::from_raw(self.raw.load(Ordering::Acquire))
    }

    /// Consume the pending intent, leaving `Idle` behind.
    pub fn take(&self) -> Intent {
        Intent::from_raw(self.raw.swap(Intent::Idle as u8, Ordering::AcqRel))
    }
}

impl Default for IntentCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        assert_eq!(IntentCell::new().get(), Intent::Idle);
    }

    #[test]
    fn take_resets_to_idle() {
        let cell = IntentCell::new();
        cell.set(Intent::SendString);
        assert_eq!(cell.take(), Intent::SendString);
        assert_eq!(cell.get(), Intent::Idle);
        assert_eq!(cell.take(), Intent::Idle);
    }

    #[test]
    fn last_writer_wins() {
        let cell = IntentCell::new();
        cell.set(Intent::ScrollUp);
        cell.set(Intent::ScrollDown);
        assert_eq!(cell.take(), Intent::ScrollDown);
    }

    #[test]
    fn raw_values_round_trip() {
        for intent in [
            Intent::Idle,
            Intent::ScrollUp,
            Intent::ScrollDown,
            Intent::SendString,
        ] {
            assert_eq!(Intent::from_raw(intent as u8), intent);
        }
        assert_eq!(Intent::from_raw(0x7F), Intent::Idle);
    }
}
