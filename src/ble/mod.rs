//! Bluetooth Low Energy subsystem.
//!
//! Drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **GATT** - the HID-over-GATT service and the notify sink the report
//!    dispatcher writes into.
//! 2. **Bonder** - in-RAM bond storage for Just Works pairing.
//! 3. **Peripheral** - advertising, connection lifetime, and link security.
//!
//! Stack events are fed through `keymouse::link::on_stack_event`, which
//! owns the subscription flag and decides the follow-up action.

pub mod bonder;
pub mod gatt;
pub mod peripheral;
