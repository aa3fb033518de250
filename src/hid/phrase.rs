//! The fixed phrase typed by the both-buttons gesture.
//!
//! A phrase is a static table of keystrokes; the dispatcher walks it
//! without knowing which text it spells.

use crate::config::MODIFIER_LEFT_SHIFT;

/// One key tap: the modifier held with a single key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keystroke {
    pub modifier: u8,
    pub keycode: u8,
}

impl Keystroke {
    pub const fn plain(keycode: u8) -> Self {
        Self {
            modifier: 0,
            keycode,
        }
    }

    pub const fn shifted(keycode: u8) -> Self {
        Self {
            modifier: MODIFIER_LEFT_SHIFT,
            keycode,
        }
    }
}

// USB HID usage codes (Keyboard/Keypad page)
const KEY_C: u8 = 0x06;
const KEY_E: u8 = 0x08;
const KEY_N: u8 = 0x11;
const KEY_R: u8 = 0x15;
const KEY_T: u8 = 0x17;
const KEY_DOT: u8 = 0x37;

/// "EETREE.CN"
pub const EETREE_CN: &[Keystroke] = &[
    Keystroke::shifted(KEY_E),
    Keystroke::shifted(KEY_E),
    Keystroke::shifted(KEY_T),
    Keystroke::shifted(KEY_R),
    Keystroke::shifted(KEY_E),
    Keystroke::shifted(KEY_E),
    Keystroke::plain(KEY_DOT),
    Keystroke::shifted(KEY_C),
    Keystroke::shifted(KEY_N),
];
