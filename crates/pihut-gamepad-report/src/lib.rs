//! PiHut wireless gamepad HID report layout primitives.
//!
//! The controller (VID `0x2563`) emits 15-byte input reports on its interrupt
//! endpoint and can be switched between three incompatible byte layouts with
//! an on-device button combo. None of this is documented by the vendor; the
//! offsets and marker values below were recovered from USB captures.
//!
//! This crate is intentionally small and I/O-free so the protocol crate can
//! consume capture-validated layout constants without pulling runtime
//! concerns. Each mode gets its own constant table — the three layouts
//! disagree on field *semantics*, not just offsets, so nothing is shared
//! between the `mode0`/`mode1`/`mode2` modules even where values coincide.

#![deny(static_mut_refs)]

/// Nominal input report length in bytes.
pub const REPORT_LEN: usize = 15;

/// Transfers never legitimately exceed this many bytes.
pub const MAX_REPORT_LEN: usize = 16;

/// Magnitude bytes report 0 or 255 on real hardware; anything at or above
/// this threshold counts as pressed.
pub const MAGNITUDE_PRESSED: u8 = 0x80;

/// Mode 0 — the power-on default layout.
///
/// | Offset | Field | Encoding |
/// |--------|-------|----------|
/// | 0–1    | markers | constant `0x00`, `0x14` |
/// | 2      | D-pad + Start/Select | packed bits |
/// | 3      | shoulder + face buttons | packed bits |
/// | 4      | L2 | 0–255 |
/// | 5      | R2 | 0–255 |
/// | 6–13   | sticks | (marker, magnitude) pairs: LX, LY, RX, RY |
/// | 14     | trailer | constant `0x00`, absent on some captures |
pub mod mode0 {
    /// Minimum decodable length; the trailing dummy byte may be cut off.
    pub const MIN_LEN: usize = 14;

    pub const MARKER_0: usize = 0;
    pub const MARKER_0_VALUE: u8 = 0x00;
    pub const MARKER_1: usize = 1;
    pub const MARKER_1_VALUE: u8 = 0x14;

    /// D-pad, Start, Select.
    pub const BUTTONS_A: usize = 2;
    pub const DPAD_UP: u8 = 0x01;
    pub const DPAD_DOWN: u8 = 0x02;
    pub const DPAD_LEFT: u8 = 0x04;
    pub const DPAD_RIGHT: u8 = 0x08;
    pub const START: u8 = 0x10;
    pub const SELECT: u8 = 0x20;

    /// Shoulder, Analog, face buttons.
    pub const BUTTONS_B: usize = 3;
    pub const L1: u8 = 0x01;
    pub const R1: u8 = 0x02;
    pub const ANALOG: u8 = 0x04;
    pub const CROSS: u8 = 0x10;
    pub const CIRCLE: u8 = 0x20;
    pub const SQUARE: u8 = 0x40;
    pub const TRIANGLE: u8 = 0x80;

    pub const L2: usize = 4;
    pub const R2: usize = 5;

    /// Stick axes as (marker, magnitude) byte pairs. The pair reads
    /// (`0xFF`, `0x7F`) exactly when the axis rests at center; otherwise the
    /// magnitude byte carries polarity in bit 7.
    pub const LEFT_X: usize = 6;
    pub const LEFT_Y: usize = 8;
    pub const RIGHT_X: usize = 10;
    pub const RIGHT_Y: usize = 12;

    pub const CENTER_MARKER: u8 = 0xFF;
    pub const CENTER_MAGNITUDE: u8 = 0x7F;
}

/// Mode 1 — selected with Analog held + right-stick-up ×7, then Analog off.
///
/// The right stick degrades to a digital D-pad OR-combined into the low
/// nibble of byte 0, *sharing bit positions* with the face buttons; the face
/// buttons and real D-pad additionally appear as 0/255 magnitude bytes at
/// offsets 7–14. Analog trigger travel is unavailable — L2/R2 are bits.
pub mod mode1 {
    pub const MIN_LEN: usize = 15;

    /// Right-stick directions / face buttons + shoulder and trigger flags.
    pub const FLAGS: usize = 0;
    pub const RS_NORTH: u8 = 0x01;
    pub const RS_EAST: u8 = 0x02;
    pub const RS_SOUTH: u8 = 0x04;
    pub const RS_WEST: u8 = 0x08;
    pub const L1: u8 = 0x10;
    pub const R1: u8 = 0x20;
    pub const L2: u8 = 0x40;
    pub const R2: u8 = 0x80;

    pub const META: usize = 1;
    pub const SELECT: u8 = 0x01;
    pub const START: u8 = 0x02;
    pub const ANALOG: u8 = 0x10;
    pub const TURBO: u8 = 0x20;

    pub const DUMMY: usize = 2;
    pub const DUMMY_VALUE: u8 = 0x0F;

    /// Left stick, one byte per axis, 128 = center, 0 = left/up.
    pub const LEFT_X: usize = 3;
    pub const LEFT_Y: usize = 4;
    pub const STICK_CENTER: u8 = 128;

    /// Constant filler where Mode 2 carries the right stick.
    pub const PAD_A: usize = 5;
    pub const PAD_B: usize = 6;
    pub const PAD_VALUE: u8 = 0x80;

    /// 0–255 magnitude bytes.
    pub const DPAD_RIGHT: usize = 7;
    pub const DPAD_LEFT: usize = 8;
    pub const DPAD_UP: usize = 9;
    pub const DPAD_DOWN: usize = 10;
    pub const TRIANGLE: usize = 11;
    pub const CIRCLE: usize = 12;
    pub const CROSS: usize = 13;
    pub const SQUARE: usize = 14;
}

/// Mode 2 — selected with Analog held + right-stick-up ×7, then Analog on.
///
/// Both sticks are analog and centered at 127; the D-pad moves into a
/// hat-coded byte; face buttons keep dedicated bits in byte 0 and are
/// duplicated as magnitude bytes like Mode 1.
pub mod mode2 {
    pub const MIN_LEN: usize = 15;

    pub const FLAGS: usize = 0;
    pub const TRIANGLE: u8 = 0x01;
    pub const CIRCLE: u8 = 0x02;
    pub const CROSS: u8 = 0x04;
    pub const SQUARE: u8 = 0x08;
    pub const L1: u8 = 0x10;
    pub const R1: u8 = 0x20;
    pub const L2: u8 = 0x40;
    pub const R2: u8 = 0x80;

    pub const META: usize = 1;
    pub const SELECT: u8 = 0x01;
    pub const START: u8 = 0x02;
    pub const ANALOG: u8 = 0x10;
    pub const TURBO: u8 = 0x20;

    /// Hat-coded D-pad: 0 = N, 2 = E, 4 = S, 6 = W, odd values the adjacent
    /// diagonals, `0x0F` released.
    pub const HAT: usize = 2;
    pub const HAT_RELEASED: u8 = 0x0F;
    pub const HAT_NORTH: u8 = 0;
    pub const HAT_NORTH_EAST: u8 = 1;
    pub const HAT_EAST: u8 = 2;
    pub const HAT_SOUTH_EAST: u8 = 3;
    pub const HAT_SOUTH: u8 = 4;
    pub const HAT_SOUTH_WEST: u8 = 5;
    pub const HAT_WEST: u8 = 6;
    pub const HAT_NORTH_WEST: u8 = 7;

    /// One byte per axis, 127 = center, 0 = left/up.
    pub const LEFT_X: usize = 3;
    pub const LEFT_Y: usize = 4;
    pub const RIGHT_X: usize = 5;
    pub const RIGHT_Y: usize = 6;
    pub const STICK_CENTER: u8 = 127;

    /// 0–255 magnitude bytes, same offsets as Mode 1 by coincidence.
    pub const DPAD_RIGHT: usize = 7;
    pub const DPAD_LEFT: usize = 8;
    pub const DPAD_UP: usize = 9;
    pub const DPAD_DOWN: usize = 10;
    pub const TRIANGLE_MAG: usize = 11;
    pub const CIRCLE_MAG: usize = 12;
    pub const CROSS_MAG: usize = 13;
    pub const SQUARE_MAG: usize = 14;
}

/// Lightweight borrowed view over one raw input report.
#[derive(Debug, Clone, Copy)]
pub struct RawGamepadReport<'a> {
    report: &'a [u8],
}

impl<'a> RawGamepadReport<'a> {
    /// Construct a borrowed view without validation.
    pub fn new(report: &'a [u8]) -> Self {
        Self { report }
    }

    pub fn len(&self) -> usize {
        self.report.len()
    }

    pub fn is_empty(&self) -> bool {
        self.report.is_empty()
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.report
    }

    /// Byte at `offset`, or `None` past the end of the transfer.
    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.report.get(offset).copied()
    }

    /// Byte at `offset`, zero-filled when absent.
    pub fn byte_or_zero(&self, offset: usize) -> u8 {
        self.byte(offset).unwrap_or(0)
    }

    /// Adjacent (marker, magnitude) byte pair starting at `offset`.
    pub fn pair(&self, offset: usize) -> Option<(u8, u8)> {
        Some((self.byte(offset)?, self.byte(offset.checked_add(1)?)?))
    }

    /// True when the masked bits at `offset` are all set.
    pub fn flag(&self, offset: usize, mask: u8) -> bool {
        self.byte_or_zero(offset) & mask == mask
    }

    /// True when the magnitude byte at `offset` reads as pressed.
    pub fn magnitude_pressed(&self, offset: usize) -> bool {
        self.byte_or_zero(offset) >= MAGNITUDE_PRESSED
    }
}
