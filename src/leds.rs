//! Status LEDs (active-low on the nRF52840-DK).

use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive};
use keymouse::platform::Indicator;

pub struct Led(Output<'static>);

impl Led {
    /// Configure `pin` as an output, initially off.
    pub fn new(pin: AnyPin) -> Self {
        Self(Output::new(pin, Level::High, OutputDrive::Standard))
    }
}

impl Indicator for Led {
    fn toggle(&mut self) {
        self.0.toggle();
    }
}
