//! Per-layout field decoding.
//!
//! One explicit decode function per layout: the three modes disagree on
//! field semantics, not just offsets, so there is deliberately no generic
//! table-driven path. Each function reads only its own constant table from
//! `rover-pihut-gamepad-report`.
//!
//! Decoding is pure and total over an already-received buffer: no I/O, no
//! retries, bit-identical output for identical input. Length is validated
//! up front against the layout's requirement so failure is all-or-nothing.
//!
//! # Redundant encodings (Mode 1/2)
//!
//! Mode 1 and Mode 2 reports carry the D-pad and face buttons twice. The
//! reconciliation policy, pinned by tests:
//! - Mode 1 face buttons: the magnitude bytes (11–14) are authoritative. A
//!   set low-nibble flag in byte 0 whose magnitude byte is below the press
//!   threshold belongs to the right stick, which shares those bit positions.
//! - Mode 2 face buttons: byte-0 flag OR magnitude byte.
//! - Mode 2 D-pad: hat byte OR magnitude bytes.

use rover_pihut_gamepad_report::{RawGamepadReport, mode0, mode1, mode2};

use crate::DecodeError;
use crate::axis::{centered_axis, inverted_axis, paired_axis};
use crate::layout::ReportLayout;
use crate::types::{ButtonMask, ControllerState, StickAxes, TriggerPair};

/// Decode a classified report into a [`ControllerState`].
///
/// Axes come out signed and centered but without the dead zone applied;
/// [`crate::Deadzone`] owns that step.
pub fn decode_report(report: &[u8], layout: ReportLayout) -> Result<ControllerState, DecodeError> {
    let need = layout.required_len();
    if report.len() < need {
        return Err(DecodeError::TruncatedReport {
            layout,
            got: report.len(),
            need,
        });
    }
    let view = RawGamepadReport::new(report);
    Ok(match layout {
        ReportLayout::Mode0 => decode_mode0(&view),
        ReportLayout::Mode1 => decode_mode1(&view),
        ReportLayout::Mode2 => decode_mode2(&view),
    })
}

fn decode_mode0(view: &RawGamepadReport<'_>) -> ControllerState {
    let buttons = ButtonMask {
        dpad_up: view.flag(mode0::BUTTONS_A, mode0::DPAD_UP),
        dpad_down: view.flag(mode0::BUTTONS_A, mode0::DPAD_DOWN),
        dpad_left: view.flag(mode0::BUTTONS_A, mode0::DPAD_LEFT),
        dpad_right: view.flag(mode0::BUTTONS_A, mode0::DPAD_RIGHT),
        start: view.flag(mode0::BUTTONS_A, mode0::START),
        select: view.flag(mode0::BUTTONS_A, mode0::SELECT),
        l1: view.flag(mode0::BUTTONS_B, mode0::L1),
        r1: view.flag(mode0::BUTTONS_B, mode0::R1),
        analog: view.flag(mode0::BUTTONS_B, mode0::ANALOG),
        cross: view.flag(mode0::BUTTONS_B, mode0::CROSS),
        circle: view.flag(mode0::BUTTONS_B, mode0::CIRCLE),
        square: view.flag(mode0::BUTTONS_B, mode0::SQUARE),
        triangle: view.flag(mode0::BUTTONS_B, mode0::TRIANGLE),
        // Not present on this layout.
        turbo: false,
    };

    let stick = |offset: usize| -> f32 {
        match view.pair(offset) {
            Some((marker, magnitude)) => paired_axis(marker, magnitude),
            None => 0.0,
        }
    };

    ControllerState {
        buttons,
        left_stick: StickAxes::new(stick(mode0::LEFT_X), stick(mode0::LEFT_Y)),
        right_stick: StickAxes::new(stick(mode0::RIGHT_X), stick(mode0::RIGHT_Y)),
        triggers: TriggerPair {
            l2: view.byte_or_zero(mode0::L2),
            r2: view.byte_or_zero(mode0::R2),
        },
        layout: ReportLayout::Mode0,
    }
}

fn decode_mode1(view: &RawGamepadReport<'_>) -> ControllerState {
    // Magnitude bytes are authoritative for the face buttons.
    let triangle = view.magnitude_pressed(mode1::TRIANGLE);
    let circle = view.magnitude_pressed(mode1::CIRCLE);
    let cross = view.magnitude_pressed(mode1::CROSS);
    let square = view.magnitude_pressed(mode1::SQUARE);

    // A low-nibble flag not accounted for by a face button is the right
    // stick reporting a digital direction on the shared bit.
    let rs_north = view.flag(mode1::FLAGS, mode1::RS_NORTH) && !triangle;
    let rs_east = view.flag(mode1::FLAGS, mode1::RS_EAST) && !circle;
    let rs_south = view.flag(mode1::FLAGS, mode1::RS_SOUTH) && !cross;
    let rs_west = view.flag(mode1::FLAGS, mode1::RS_WEST) && !square;

    let buttons = ButtonMask {
        dpad_up: view.magnitude_pressed(mode1::DPAD_UP),
        dpad_down: view.magnitude_pressed(mode1::DPAD_DOWN),
        dpad_left: view.magnitude_pressed(mode1::DPAD_LEFT),
        dpad_right: view.magnitude_pressed(mode1::DPAD_RIGHT),
        start: view.flag(mode1::META, mode1::START),
        select: view.flag(mode1::META, mode1::SELECT),
        l1: view.flag(mode1::FLAGS, mode1::L1),
        r1: view.flag(mode1::FLAGS, mode1::R1),
        analog: view.flag(mode1::META, mode1::ANALOG),
        cross,
        circle,
        square,
        triangle,
        turbo: view.flag(mode1::META, mode1::TURBO),
    };

    let digital = |positive: bool, negative: bool| -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    };

    ControllerState {
        buttons,
        left_stick: StickAxes::new(
            centered_axis(view.byte_or_zero(mode1::LEFT_X), mode1::STICK_CENTER),
            inverted_axis(view.byte_or_zero(mode1::LEFT_Y), mode1::STICK_CENTER),
        ),
        right_stick: StickAxes::new(digital(rs_east, rs_west), digital(rs_north, rs_south)),
        // No analog trigger travel on this layout; the flags map to rail
        // values so TriggerPair keeps one meaning everywhere.
        triggers: TriggerPair {
            l2: if view.flag(mode1::FLAGS, mode1::L2) { 255 } else { 0 },
            r2: if view.flag(mode1::FLAGS, mode1::R2) { 255 } else { 0 },
        },
        layout: ReportLayout::Mode1,
    }
}

fn decode_mode2(view: &RawGamepadReport<'_>) -> ControllerState {
    let hat = view.byte_or_zero(mode2::HAT);
    let hat_up = matches!(hat, mode2::HAT_NORTH | mode2::HAT_NORTH_EAST | mode2::HAT_NORTH_WEST);
    let hat_right = matches!(hat, mode2::HAT_EAST | mode2::HAT_NORTH_EAST | mode2::HAT_SOUTH_EAST);
    let hat_down = matches!(hat, mode2::HAT_SOUTH | mode2::HAT_SOUTH_EAST | mode2::HAT_SOUTH_WEST);
    let hat_left = matches!(hat, mode2::HAT_WEST | mode2::HAT_NORTH_WEST | mode2::HAT_SOUTH_WEST);

    let buttons = ButtonMask {
        dpad_up: hat_up || view.magnitude_pressed(mode2::DPAD_UP),
        dpad_down: hat_down || view.magnitude_pressed(mode2::DPAD_DOWN),
        dpad_left: hat_left || view.magnitude_pressed(mode2::DPAD_LEFT),
        dpad_right: hat_right || view.magnitude_pressed(mode2::DPAD_RIGHT),
        start: view.flag(mode2::META, mode2::START),
        select: view.flag(mode2::META, mode2::SELECT),
        l1: view.flag(mode2::FLAGS, mode2::L1),
        r1: view.flag(mode2::FLAGS, mode2::R1),
        analog: view.flag(mode2::META, mode2::ANALOG),
        cross: view.flag(mode2::FLAGS, mode2::CROSS) || view.magnitude_pressed(mode2::CROSS_MAG),
        circle: view.flag(mode2::FLAGS, mode2::CIRCLE) || view.magnitude_pressed(mode2::CIRCLE_MAG),
        square: view.flag(mode2::FLAGS, mode2::SQUARE) || view.magnitude_pressed(mode2::SQUARE_MAG),
        triangle: view.flag(mode2::FLAGS, mode2::TRIANGLE)
            || view.magnitude_pressed(mode2::TRIANGLE_MAG),
        turbo: view.flag(mode2::META, mode2::TURBO),
    };

    ControllerState {
        buttons,
        left_stick: StickAxes::new(
            centered_axis(view.byte_or_zero(mode2::LEFT_X), mode2::STICK_CENTER),
            inverted_axis(view.byte_or_zero(mode2::LEFT_Y), mode2::STICK_CENTER),
        ),
        right_stick: StickAxes::new(
            centered_axis(view.byte_or_zero(mode2::RIGHT_X), mode2::STICK_CENTER),
            inverted_axis(view.byte_or_zero(mode2::RIGHT_Y), mode2::STICK_CENTER),
        ),
        triggers: TriggerPair {
            l2: if view.flag(mode2::FLAGS, mode2::L2) { 255 } else { 0 },
            r2: if view.flag(mode2::FLAGS, mode2::R2) { 255 } else { 0 },
        },
        layout: ReportLayout::Mode2,
    }
}
