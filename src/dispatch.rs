//! Report dispatcher.
//!
//! Runs in the Bluetooth context whenever the wake signal is delivered.
//! Consumes the pending intent and turns it into HID notifications:
//!
//! - `SendString`: for each phrase keystroke a key-down report, an
//!   all-zero key-up report, then [`KEYSTROKE_INTERVAL_MS`] of quiet so the
//!   host does not see key repeat.
//! - `ScrollUp` / `ScrollDown`: one wheel-only mouse report.
//!
//! With no subscribed client the intent is dropped, not queued. The
//! subscription is checked again before every keystroke of the phrase,
//! since the client may unsubscribe during the pauses.

use embedded_hal_async::delay::DelayNs;

use crate::config::{KEYSTROKE_INTERVAL_MS, SCROLL_DOWN_DISTANCE, SCROLL_UP_DISTANCE};
use crate::error::Result;
use crate::hid::{Keystroke, ReportBuffers, EETREE_CN};
use crate::intent::Intent;
use crate::platform::ReportSink;
use crate::state::SharedState;

pub struct ReportDispatcher {
    buffers: ReportBuffers,
    phrase: &'static [Keystroke],
}

impl ReportDispatcher {
    /// Dispatcher typing the default phrase.
    pub const fn new() -> Self {
        Self::with_phrase(EETREE_CN)
    }

    pub const fn with_phrase(phrase: &'static [Keystroke]) -> Self {
        Self {
            buffers: ReportBuffers::new(),
            phrase,
        }
    }

    pub fn phrase(&self) -> &'static [Keystroke] {
        self.phrase
    }

    /// Handle one wake signal.
    ///
    /// Returns the intent whose reports were sent, or `None` when nothing
    /// was pending, nobody is subscribed, or the client unsubscribed before
    /// the phrase was finished. A sink error aborts the
    /// sequence and is returned; the caller treats it as fatal.
    pub async fn dispatch<S, D>(
        &mut self,
        state: &SharedState,
        sink: &mut S,
        delay: &mut D,
    ) -> Result<Option<Intent>>
    where
        S: ReportSink,
        D: DelayNs,
    {
        let intent = state.intent.take();

        if !state.is_subscribed() {
            if intent != Intent::Idle {
                #[cfg(feature = "defmt")]
                defmt::debug!("no subscriber - dropping {}", intent);
            }
            return Ok(None);
        }

        match intent {
            Intent::Idle => return Ok(None),
            Intent::SendString => {
                if !self.type_phrase(state, sink, delay).await? {
                    return Ok(None);
                }
            }
            Intent::ScrollUp => sink.notify(self.buffers.scroll(SCROLL_UP_DISTANCE))?,
            Intent::ScrollDown => sink.notify(self.buffers.scroll(SCROLL_DOWN_DISTANCE))?,
        }

        #[cfg(feature = "defmt")]
        defmt::info!("report sent: {}", intent);
        Ok(Some(intent))
    }

    /// Returns `false` if the client unsubscribed before the phrase was
    /// complete; the rest of it is dropped.
    async fn type_phrase<S, D>(
        &mut self,
        state: &SharedState,
        sink: &mut S,
        delay: &mut D,
    ) -> Result<bool>
    where
        S: ReportSink,
        D: DelayNs,
    {
        let phrase = self.phrase;
        for (_typed, &keystroke) in phrase.iter().enumerate() {
            if !state.is_subscribed() {
                #[cfg(feature = "defmt")]
                defmt::debug!("unsubscribed after {} keystrokes - dropping phrase", _typed);
                return Ok(false);
            }
            sink.notify(self.buffers.key_down(keystroke))?;
            sink.notify(self.buffers.key_up())?;
            delay.delay_ms(KEYSTROKE_INTERVAL_MS).await;
        }
        Ok(true)
    }
}

impl Default for ReportDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::link::{on_stack_event, StackEvent};
    use embassy_futures::block_on;
    use std::cell::RefCell;

    #[derive(Debug, PartialEq)]
    enum Step {
        Sent(Vec<u8>),
        Slept(u32),
    }

    struct Log(RefCell<Vec<Step>>);

    struct Sink<'a> {
        log: &'a Log,
        fail_after: Option<usize>,
    }

    impl ReportSink for Sink<'_> {
        fn notify(&mut self, report: &[u8]) -> Result<()> {
            let mut steps = self.log.0.borrow_mut();
            let sent = steps.iter().filter(|s| matches!(s, Step::Sent(_))).count();
            if self.fail_after == Some(sent) {
                return Err(Error::Notify);
            }
            steps.push(Step::Sent(report.to_vec()));
            Ok(())
        }
    }

    struct Delay<'a>(&'a Log);

    impl DelayNs for Delay<'_> {
        async fn delay_ns(&mut self, ns: u32) {
            self.0 .0.borrow_mut().push(Step::Slept(ns / 1_000_000));
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.0 .0.borrow_mut().push(Step::Slept(ms));
        }
    }

    fn subscribed_state() -> SharedState {
        let state = SharedState::new();
        on_stack_event(&state, StackEvent::ReportSubscription { notifications: true });
        state
    }

    fn run(state: &SharedState, log: &Log, fail_after: Option<usize>) -> Result<Option<Intent>> {
        let mut dispatcher = ReportDispatcher::new();
        let mut sink = Sink { log, fail_after };
        let mut delay = Delay(log);
        block_on(dispatcher.dispatch(state, &mut sink, &mut delay))
    }

    #[test]
    fn scroll_up_sends_one_wheel_report() {
        let state = subscribed_state();
        let log = Log(RefCell::new(Vec::new()));
        state.intent.set(Intent::ScrollUp);

        assert_eq!(run(&state, &log, None), Ok(Some(Intent::ScrollUp)));
        assert_eq!(
            log.0.into_inner(),
            vec![Step::Sent(vec![0x02, 0x00, 0x00, 0x00, 0x01])]
        );
        assert_eq!(state.intent.get(), Intent::Idle);
    }

    #[test]
    fn scroll_down_sends_ff_wheel() {
        let state = subscribed_state();
        let log = Log(RefCell::new(Vec::new()));
        state.intent.set(Intent::ScrollDown);

        assert_eq!(run(&state, &log, None), Ok(Some(Intent::ScrollDown)));
        assert_eq!(
            log.0.into_inner(),
            vec![Step::Sent(vec![0x02, 0x00, 0x00, 0x00, 0xFF])]
        );
    }

    #[test]
    fn send_string_types_phrase_with_releases_and_pauses() {
        let state = subscribed_state();
        let log = Log(RefCell::new(Vec::new()));
        state.intent.set(Intent::SendString);

        assert_eq!(run(&state, &log, None), Ok(Some(Intent::SendString)));

        let steps = log.0.into_inner();
        assert_eq!(steps.len(), EETREE_CN.len() * 3);
        for (i, keystroke) in EETREE_CN.iter().enumerate() {
            let chunk = &steps[i * 3..i * 3 + 3];
            assert_eq!(
                chunk[0],
                Step::Sent(vec![0x01, keystroke.modifier, 0, keystroke.keycode, 0, 0, 0, 0, 0])
            );
            assert_eq!(chunk[1], Step::Sent(vec![0x01, 0, 0, 0, 0, 0, 0, 0, 0]));
            assert_eq!(chunk[2], Step::Slept(KEYSTROKE_INTERVAL_MS));
        }
    }

    #[test]
    fn idle_sends_nothing() {
        let state = subscribed_state();
        let log = Log(RefCell::new(Vec::new()));

        assert_eq!(run(&state, &log, None), Ok(None));
        assert!(log.0.into_inner().is_empty());
    }

    #[test]
    fn unsubscribed_drops_intent_without_sending() {
        let state = SharedState::new();
        let log = Log(RefCell::new(Vec::new()));
        state.intent.set(Intent::SendString);

        assert_eq!(run(&state, &log, None), Ok(None));
        assert!(log.0.borrow().is_empty());
        assert_eq!(state.intent.get(), Intent::Idle);

        // A later subscription does not replay the dropped intent.
        on_stack_event(&state, StackEvent::ReportSubscription { notifications: true });
        assert_eq!(run(&state, &log, None), Ok(None));
        assert!(log.0.into_inner().is_empty());
    }

    #[test]
    fn notify_failure_aborts_the_phrase() {
        let state = subscribed_state();
        let log = Log(RefCell::new(Vec::new()));
        state.intent.set(Intent::SendString);

        assert_eq!(run(&state, &log, Some(3)), Err(Error::Notify));
        let sent = log
            .0
            .into_inner()
            .into_iter()
            .filter(|s| matches!(s, Step::Sent(_)))
            .count();
        assert_eq!(sent, 3);
    }

    /// Refuses notifications once the client has unsubscribed, like the
    /// SoftDevice does.
    struct StrictSink<'a> {
        state: &'a SharedState,
        sent: usize,
    }

    impl ReportSink for StrictSink<'_> {
        fn notify(&mut self, _report: &[u8]) -> Result<()> {
            if !self.state.is_subscribed() {
                return Err(Error::Notify);
            }
            self.sent += 1;
            Ok(())
        }
    }

    /// Delivers a CCCD write turning notifications off during pause `n`.
    struct UnsubscribeDuringPause<'a> {
        state: &'a SharedState,
        pauses: usize,
        at: usize,
    }

    impl DelayNs for UnsubscribeDuringPause<'_> {
        async fn delay_ns(&mut self, _ns: u32) {
            self.pause();
        }

        async fn delay_ms(&mut self, _ms: u32) {
            self.pause();
        }
    }

    impl UnsubscribeDuringPause<'_> {
        fn pause(&mut self) {
            self.pauses += 1;
            if self.pauses == self.at {
                on_stack_event(self.state, StackEvent::ReportSubscription { notifications: false });
            }
        }
    }

    #[test]
    fn unsubscribe_mid_phrase_stops_quietly() {
        let state = subscribed_state();
        state.intent.set(Intent::SendString);

        let mut dispatcher = ReportDispatcher::new();
        let mut sink = StrictSink {
            state: &state,
            sent: 0,
        };
        let mut delay = UnsubscribeDuringPause {
            state: &state,
            pauses: 0,
            at: 1,
        };

        assert_eq!(
            block_on(dispatcher.dispatch(&state, &mut sink, &mut delay)),
            Ok(None)
        );
        // One keystroke (down + up) went out before the write landed.
        assert_eq!(sink.sent, 2);
        assert_eq!(delay.pauses, 1);
        assert_eq!(state.intent.get(), Intent::Idle);
    }

    #[test]
    fn unsubscribe_during_last_pause_still_completes() {
        let state = subscribed_state();
        state.intent.set(Intent::SendString);

        let mut dispatcher = ReportDispatcher::new();
        let mut sink = StrictSink {
            state: &state,
            sent: 0,
        };
        let mut delay = UnsubscribeDuringPause {
            state: &state,
            pauses: 0,
            at: EETREE_CN.len(),
        };

        assert_eq!(
            block_on(dispatcher.dispatch(&state, &mut sink, &mut delay)),
            Ok(Some(Intent::SendString))
        );
        assert_eq!(sink.sent, EETREE_CN.len() * 2);
    }

    #[test]
    fn custom_phrase_is_typed() {
        static HI: &[Keystroke] = &[Keystroke::shifted(0x0B), Keystroke::plain(0x0C)];
        let state = subscribed_state();
        let log = Log(RefCell::new(Vec::new()));
        state.intent.set(Intent::SendString);

        let mut dispatcher = ReportDispatcher::with_phrase(HI);
        assert_eq!(dispatcher.phrase().len(), 2);
        let mut sink = Sink {
            log: &log,
            fail_after: None,
        };
        let mut delay = Delay(&log);
        block_on(dispatcher.dispatch(&state, &mut sink, &mut delay)).unwrap();

        let steps = log.0.into_inner();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[3], Step::Sent(vec![0x01, 0, 0, 0x0C, 0, 0, 0, 0, 0]));
    }
}
