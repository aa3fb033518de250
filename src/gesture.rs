//! Gesture classifier.
//!
//! Polled once per [`CLASSIFIER_TICK_MS`](crate::config::CLASSIFIER_TICK_MS).
//! Each tick reads the edge latch and acts on the combination of held
//! buttons:
//!
//! | Held    | Action                                                    |
//! |---------|-----------------------------------------------------------|
//! | both    | arm the debounce timer once per hold                      |
//! | A only  | stop the timer, intent = ScrollDown, raise the wake signal |
//! | B only  | stop the timer, intent = ScrollUp, raise the wake signal   |
//! | none    | stop the timer and forget it was armed                    |
//!
//! A single button held across several ticks sets its intent and raises
//! the wake signal on every tick, so holding a button keeps scrolling.
//!
//! Only [`debounce_expired`] produces [`Intent::SendString`].

use crate::config::DEBOUNCE_WINDOW_MS;
use crate::error::Result;
use crate::intent::Intent;
use crate::latch::HeldMask;
use crate::platform::{Indicator, OneShotTimer, WakeSignal};
use crate::state::SharedState;

/// Classification of one latch snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    NonePressed,
    APressed,
    BPressed,
    BothPressed,
}

impl From<HeldMask> for Gesture {
    fn from(mask: HeldMask) -> Self {
        match mask {
            HeldMask::BOTH => Gesture::BothPressed,
            HeldMask::A => Gesture::APressed,
            HeldMask::B => Gesture::BPressed,
            _ => Gesture::NonePressed,
        }
    }
}

/// Per-task classifier state.
pub struct GestureClassifier {
    debounce_running: bool,
    last: Gesture,
}

impl GestureClassifier {
    pub const fn new() -> Self {
        Self {
            debounce_running: false,
            last: Gesture::NonePressed,
        }
    }

    /// Whether the debounce timer was armed and not yet released by a
    /// no-buttons tick.
    pub fn is_debounce_running(&self) -> bool {
        self.debounce_running
    }

    /// Run one classification pass.
    ///
    /// A timer that cannot be armed is returned as an error; the caller
    /// treats it as fatal. Stop failures are only logged.
    pub fn tick<T, W>(&mut self, state: &SharedState, timer: &mut T, wake: &W) -> Result<Gesture>
    where
        T: OneShotTimer,
        W: WakeSignal + ?Sized,
    {
        let gesture = Gesture::from(state.latch.read());
        if gesture != self.last {
            #[cfg(feature = "defmt")]
            defmt::debug!("gesture: {} -> {}", self.last, gesture);
            self.last = gesture;
        }

        match gesture {
            Gesture::BothPressed => {
                if !self.debounce_running {
                    timer.start(DEBOUNCE_WINDOW_MS)?;
                    self.debounce_running = true;
                    #[cfg(feature = "defmt")]
                    defmt::debug!("debounce timer started ({} ms)", DEBOUNCE_WINDOW_MS);
                }
            }
            Gesture::APressed => {
                self.stop_timer(timer);
                state.intent.set(Intent::ScrollDown);
                wake.raise();
            }
            Gesture::BPressed => {
                self.stop_timer(timer);
                state.intent.set(Intent::ScrollUp);
                wake.raise();
            }
            Gesture::NonePressed => {
                self.stop_timer(timer);
                self.debounce_running = false;
            }
        }

        Ok(gesture)
    }

    // Leaves the running flag set; only a no-buttons tick clears it.
    fn stop_timer<T: OneShotTimer>(&self, timer: &mut T) {
        if !self.debounce_running {
            return;
        }
        match timer.stop() {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("debounce timer stopped");
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("debounce timer stop failed: {}", _e);
            }
        }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Debounce timer expiry: both buttons stayed held for the whole window.
///
/// Consumes the gesture by clearing both latch bits, queues the phrase,
/// toggles every indicator, and wakes the Bluetooth context.
pub fn debounce_expired<I, W>(state: &SharedState, indicators: &mut [I], wake: &W)
where
    I: Indicator,
    W: WakeSignal + ?Sized,
{
    state.latch.clear(HeldMask::BOTH);
    state.intent.set(Intent::SendString);
    for indicator in indicators.iter_mut() {
        indicator.toggle();
    }
    wake.raise();

    #[cfg(feature = "defmt")]
    defmt::debug!("debounce window elapsed - phrase queued");
}
