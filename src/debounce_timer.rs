//! The one-shot debounce timer, built from an Embassy timer and a command
//! signal.
//!
//! The classifier arms and disarms it through [`SignalTimer`]; the task
//! owns the deadline and runs the expiry handler when it passes.

use defmt::debug;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};
use keymouse::error::Result;
use keymouse::gesture::debounce_expired;
use keymouse::platform::OneShotTimer;

use crate::leds::Led;
use crate::wake::WAKE;
use crate::STATE;

#[derive(Clone, Copy, defmt::Format)]
enum TimerCommand {
    Start(u32),
    Stop,
}

static COMMANDS: Signal<CriticalSectionRawMutex, TimerCommand> = Signal::new();

/// Handle used by the classifier. Commands never fail to queue; the latest
/// one wins if the task has not consumed the previous.
pub struct SignalTimer;

impl OneShotTimer for SignalTimer {
    fn start(&mut self, after_ms: u32) -> Result<()> {
        COMMANDS.signal(TimerCommand::Start(after_ms));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        COMMANDS.signal(TimerCommand::Stop);
        Ok(())
    }
}

fn deadline(command: TimerCommand) -> Option<Instant> {
    match command {
        TimerCommand::Start(ms) => Some(Instant::now() + Duration::from_millis(ms.into())),
        TimerCommand::Stop => None,
    }
}

#[embassy_executor::task]
pub async fn debounce_timer_task(mut leds: [Led; 2]) -> ! {
    let mut armed: Option<Instant> = None;

    loop {
        armed = match armed {
            None => deadline(COMMANDS.wait().await),
            Some(at) => match select(Timer::at(at), COMMANDS.wait()).await {
                Either::First(()) => {
                    debug!("debounce timer fired");
                    debounce_expired(&STATE, &mut leds, &WAKE);
                    None
                }
                Either::Second(command) => deadline(command),
            },
        };
    }
}
