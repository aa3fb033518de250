//! Bluetooth stack event policy.
//!
//! The board glue translates SoftDevice callbacks into [`StackEvent`]s and
//! performs the returned [`Reaction`]. Keeping the policy here means the
//! subscription flag has exactly one writer and the rules are testable on
//! the host.

use crate::intent::Intent;
use crate::state::SharedState;

/// Events the Bluetooth collaborator reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StackEvent {
    /// The stack is up; no command may be issued before this.
    Boot,
    /// A central connected.
    ConnectionOpened,
    /// The connection ended for any reason.
    ConnectionClosed,
    /// Pairing finished and the bond was stored.
    Bonded,
    /// The link could not be secured.
    BondingFailed,
    /// The client wrote the report characteristic's CCCD.
    ReportSubscription { notifications: bool },
    /// The wake hint raised by the classifier or the debounce timer.
    ExternalSignal,
}

/// What the board glue must do in response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reaction {
    StartAdvertising,
    IncreaseSecurity,
    RestartAdvertising,
    DeleteBondsAndDisconnect,
    Dispatch,
    Nothing,
}

/// CCCD bit enabling notifications.
const CCCD_NOTIFY: u16 = 0x0001;

/// Whether a Client Characteristic Configuration value has notifications
/// on. Used for CCCDs restored from a bond, where the client never writes
/// them again.
pub const fn cccd_notifications_enabled(cccd: u16) -> bool {
    cccd & CCCD_NOTIFY != 0
}

/// Apply `event` to `state` and decide the follow-up action.
pub fn on_stack_event(state: &SharedState, event: StackEvent) -> Reaction {
    match event {
        StackEvent::Boot => {
            #[cfg(feature = "defmt")]
            defmt::info!("boot event - starting advertising");
            Reaction::StartAdvertising
        }
        StackEvent::ConnectionOpened => {
            #[cfg(feature = "defmt")]
            defmt::info!("connection opened");
            // Anything raised while nobody was connected is stale.
            let stale = state.intent.take();
            if stale != Intent::Idle {
                #[cfg(feature = "defmt")]
                defmt::debug!("dropping stale {}", stale);
            }
            Reaction::IncreaseSecurity
        }
        StackEvent::ConnectionClosed => {
            #[cfg(feature = "defmt")]
            defmt::info!("connection closed");
            state.set_subscribed(false);
            Reaction::RestartAdvertising
        }
        StackEvent::Bonded => {
            #[cfg(feature = "defmt")]
            defmt::info!("successful bonding");
            Reaction::Nothing
        }
        StackEvent::BondingFailed => {
            #[cfg(feature = "defmt")]
            defmt::error!("bonding failed - deleting bonds, host must retry");
            Reaction::DeleteBondsAndDisconnect
        }
        StackEvent::ReportSubscription { notifications } => {
            #[cfg(feature = "defmt")]
            defmt::info!("report notifications: {}", notifications);
            state.set_subscribed(notifications);
            Reaction::Nothing
        }
        StackEvent::ExternalSignal => Reaction::Dispatch,
    }
}
