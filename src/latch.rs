//! Edge latch - the "button currently held" bits.
//!
//! Written from edge notifications (interrupt-driven tasks on the target),
//! read by the gesture classifier. Only the current level of each button
//! is kept; there is no queue of past edges.

use core::sync::atomic::{AtomicU8, Ordering};

/// One of the two physical buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    A,
    B,
}

impl ButtonId {
    const fn bit(self) -> u8 {
        match self {
            ButtonId::A => HeldMask::A.0,
            ButtonId::B => HeldMask::B.0,
        }
    }
}

/// Set of currently held buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeldMask(u8);

impl HeldMask {
    pub const NONE: Self = Self(0);
    pub const A: Self = Self(1 << 0);
    pub const B: Self = Self(1 << 1);
    pub const BOTH: Self = Self(Self::A.0 | Self::B.0);

    /// Build a mask from raw bits; bits outside A/B are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::BOTH.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, button: ButtonId) -> bool {
        self.0 & button.bit() != 0
    }
}

/// Lock-free accumulator of held-button bits.
///
/// Every operation is a single atomic read-modify-write, so it is safe from
/// interrupt context and never blocks.
pub struct EdgeLatch {
    bits: AtomicU8,
}

impl EdgeLatch {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(0),
        }
    }

    /// Record the new level of `button`.
    pub fn on_edge(&self, button: ButtonId, pressed: bool) {
        if pressed {
            self.bits.fetch_or(button.bit(), Ordering::AcqRel);
        } else {
            self.bits.fetch_and(!button.bit(), Ordering::AcqRel);
        }
    }

    /// Snapshot of the held buttons.
    pub fn read(&self) -> HeldMask {
        HeldMask::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Drop the bits in `mask`, leaving the others untouched.
    pub fn clear(&self, mask: HeldMask) {
        self.bits.fetch_and(!mask.bits(), Ordering::AcqRel);
    }
}

impl Default for EdgeLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_nothing_held() {
        assert_eq!(EdgeLatch::new().read(), HeldMask::NONE);
    }

    #[test]
    fn press_and_release_track_level() {
        let latch = EdgeLatch::new();
        latch.on_edge(ButtonId::A, true);
        assert_eq!(latch.read(), HeldMask::A);
        latch.on_edge(ButtonId::B, true);
        assert_eq!(latch.read(), HeldMask::BOTH);
        latch.on_edge(ButtonId::A, false);
        assert_eq!(latch.read(), HeldMask::B);
        latch.on_edge(ButtonId::B, false);
        assert_eq!(latch.read(), HeldMask::NONE);
    }

    #[test]
    fn rapid_edges_collapse_to_last_level() {
        let latch = EdgeLatch::new();
        latch.on_edge(ButtonId::B, true);
        latch.on_edge(ButtonId::B, false);
        latch.on_edge(ButtonId::B, true);
        assert_eq!(latch.read(), HeldMask::B);

        latch.on_edge(ButtonId::B, false);
        latch.on_edge(ButtonId::B, false);
        assert_eq!(latch.read(), HeldMask::NONE);
    }

    #[test]
    fn every_edge_sequence_ends_at_last_level() {
        // Exhaustive over all 4-edge sequences on both buttons.
        let edges = [
            (ButtonId::A, true),
            (ButtonId::A, false),
            (ButtonId::B, true),
            (ButtonId::B, false),
        ];
        for seq in 0..(4u32.pow(4)) {
            let latch = EdgeLatch::new();
            let mut a = false;
            let mut b = false;
            let mut n = seq;
            for _ in 0..4 {
                let (button, pressed) = edges[(n % 4) as usize];
                n /= 4;
                latch.on_edge(button, pressed);
                match button {
                    ButtonId::A => a = pressed,
                    ButtonId::B => b = pressed,
                }
                let mask = latch.read();
                assert_eq!(mask.contains(ButtonId::A), a);
                assert_eq!(mask.contains(ButtonId::B), b);
            }
        }
    }

    #[test]
    fn clear_only_drops_requested_bits() {
        let latch = EdgeLatch::new();
        latch.on_edge(ButtonId::A, true);
        latch.on_edge(ButtonId::B, true);
        latch.clear(HeldMask::A);
        assert_eq!(latch.read(), HeldMask::B);
        latch.clear(HeldMask::BOTH);
        assert_eq!(latch.read(), HeldMask::NONE);
    }

    #[test]
    fn from_bits_masks_unknown_bits() {
        assert_eq!(HeldMask::from_bits(0xFF), HeldMask::BOTH);
        assert_eq!(HeldMask::from_bits(0x04), HeldMask::NONE);
    }

    #[test]
    fn concurrent_writers_keep_final_level() {
        use std::sync::Arc;
        use std::thread;

        let latch = Arc::new(EdgeLatch::new());
        let a = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || {
                for i in 0..10_000 {
                    latch.on_edge(ButtonId::A, i % 2 == 0);
                }
                latch.on_edge(ButtonId::A, true);
            })
        };
        let b = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || {
                for i in 0..10_000 {
                    latch.on_edge(ButtonId::B, i % 2 == 1);
                }
                latch.on_edge(ButtonId::B, false);
            })
        };
        a.join().unwrap();
        b.join().unwrap();
        assert_eq!(latch.read(), HeldMask::A);
    }
}
