//! GPIO edge handlers for the two buttons.
//!
//! Buttons are active-low with internal pull-ups. Each pin gets its own
//! task that waits for either edge and records the new level in the edge
//! latch. There is no software debounce here: contact bounce only flips
//! the latch bit briefly, and the classifier samples it every tick.

use defmt::trace;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use keymouse::latch::ButtonId;

use crate::STATE;

#[embassy_executor::task(pool_size = 2)]
pub async fn button_task(pin: AnyPin, button: ButtonId) -> ! {
    let mut input = Input::new(pin, Pull::Up);

    // A button already held at boot counts as pressed.
    STATE.latch.on_edge(button, input.is_low());

    loop {
        input.wait_for_any_edge().await;
        let pressed = input.is_low();
        trace!("button {} {}", button, if pressed { "down" } else { "up" });
        STATE.latch.on_edge(button, pressed);
    }
}
