//! The "data ready" hint from the input side to the Bluetooth task.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use keymouse::platform::WakeSignal;

/// Coalescing wake signal. Several raises before the Bluetooth task runs
/// collapse into one dispatch, which then sends the latest intent.
pub struct ExternalSignal(Signal<CriticalSectionRawMutex, ()>);

impl ExternalSignal {
    pub const fn new() -> Self {
        Self(Signal::new())
    }

    pub async fn wait(&self) {
        self.0.wait().await
    }
}

impl WakeSignal for ExternalSignal {
    fn raise(&self) {
        self.0.signal(());
    }
}

pub static WAKE: ExternalSignal = ExternalSignal::new();
