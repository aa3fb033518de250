//! HID report types, the report map, and outgoing report construction.

pub mod buffers;
pub mod keyboard;
pub mod mouse;
pub mod phrase;
pub mod report_map;

pub use buffers::{ReportBuffers, KEYBOARD_WIRE_LEN, MOUSE_WIRE_LEN};
pub use keyboard::KeyboardReport;
pub use mouse::MouseReport;
pub use phrase::{Keystroke, EETREE_CN};
