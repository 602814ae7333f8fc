//! Heuristic report-layout classification.
//!
//! The controller never advertises its operating mode in-band, so each
//! report is fingerprinted structurally. Constant marker bytes are checked
//! before anything that varies with user input, and an unmatched report
//! fails rather than guessing — a misclassified layout corrupts every
//! downstream field, while a cleanly rejected one costs a single poll.
//!
//! Classification is stateless per report. The advisory hint from the
//! mode-switch tracker is consulted only when two fingerprints genuinely
//! tie; it can never override a structural mismatch, so a wrong hint cannot
//! compound across polls.

use std::fmt;

use rover_pihut_gamepad_report::{RawGamepadReport, mode0, mode1, mode2};
use tracing::debug;

use crate::DecodeError;

/// One of the three known byte-layout conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportLayout {
    /// Power-on default: analog triggers, marker-paired stick encoding.
    Mode0,
    /// Digital right stick and triggers, left stick centered at 128.
    Mode1,
    /// Hat-coded D-pad, both sticks analog and centered at 127.
    Mode2,
}

impl ReportLayout {
    /// Bytes a report must deliver before this layout can be decoded.
    pub fn required_len(self) -> usize {
        match self {
            ReportLayout::Mode0 => mode0::MIN_LEN,
            ReportLayout::Mode1 => mode1::MIN_LEN,
            ReportLayout::Mode2 => mode2::MIN_LEN,
        }
    }
}

impl fmt::Display for ReportLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLayout::Mode0 => write!(f, "mode 0"),
            ReportLayout::Mode1 => write!(f, "mode 1"),
            ReportLayout::Mode2 => write!(f, "mode 2"),
        }
    }
}

/// Classify a raw report against the known layout fingerprints.
///
/// Fingerprints, in check order:
/// - Mode 0: bytes 0–1 read `0x00`, `0x14` (layout-constant markers).
/// - Mode 1: byte 2 reads `0x0F` and the constant filler bytes 5–6 read
///   `0x80` (layout-constant markers).
/// - Mode 2: byte 2 reads `0x0F` and byte 3 or 4 sits at the 127 center
///   (range heuristic on input-dependent bytes — the weakest check, so it
///   runs last).
///
/// Mode 1 and Mode 2 can both match near stick center; `hint` breaks that
/// tie, defaulting to the constant-marker match (Mode 1) when absent.
pub fn classify_report(
    report: &[u8],
    hint: Option<ReportLayout>,
) -> Result<ReportLayout, DecodeError> {
    let view = RawGamepadReport::new(report);

    if view.byte(mode0::MARKER_0) == Some(mode0::MARKER_0_VALUE)
        && view.byte(mode0::MARKER_1) == Some(mode0::MARKER_1_VALUE)
    {
        return Ok(ReportLayout::Mode0);
    }

    let mode1_match = view.byte(mode1::DUMMY) == Some(mode1::DUMMY_VALUE)
        && view.byte(mode1::PAD_A) == Some(mode1::PAD_VALUE)
        && view.byte(mode1::PAD_B) == Some(mode1::PAD_VALUE);
    let mode2_match = view.byte(mode2::HAT).is_some_and(|b| b == mode2::HAT_RELEASED || b <= mode2::HAT_NORTH_WEST)
        && (view.byte(mode2::LEFT_X) == Some(mode2::STICK_CENTER)
            || view.byte(mode2::LEFT_Y) == Some(mode2::STICK_CENTER));

    match (mode1_match, mode2_match) {
        (true, true) => {
            let chosen = match hint {
                Some(layout @ (ReportLayout::Mode1 | ReportLayout::Mode2)) => {
                    debug!(%layout, "ambiguous mode 1/2 fingerprint, tie broken by hint");
                    layout
                }
                _ => ReportLayout::Mode1,
            };
            Ok(chosen)
        }
        (true, false) => {
            if hint == Some(ReportLayout::Mode2) {
                debug!("hint expected mode 2 but constant markers say mode 1");
            }
            Ok(ReportLayout::Mode1)
        }
        (false, true) => {
            if hint == Some(ReportLayout::Mode1) {
                debug!("hint expected mode 1 but fingerprint says mode 2");
            }
            Ok(ReportLayout::Mode2)
        }
        (false, false) => Err(DecodeError::UnrecognizedLayout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_pihut_gamepad_report::REPORT_LEN;

    fn mode1_centered() -> [u8; REPORT_LEN] {
        let mut report = [0u8; REPORT_LEN];
        report[mode1::DUMMY] = mode1::DUMMY_VALUE;
        report[mode1::LEFT_X] = mode1::STICK_CENTER;
        report[mode1::LEFT_Y] = mode1::STICK_CENTER;
        report[mode1::PAD_A] = mode1::PAD_VALUE;
        report[mode1::PAD_B] = mode1::PAD_VALUE;
        report
    }

    fn mode2_centered() -> [u8; REPORT_LEN] {
        let mut report = [0u8; REPORT_LEN];
        report[mode2::HAT] = mode2::HAT_RELEASED;
        report[mode2::LEFT_X] = mode2::STICK_CENTER;
        report[mode2::LEFT_Y] = mode2::STICK_CENTER;
        report[mode2::RIGHT_X] = mode2::STICK_CENTER;
        report[mode2::RIGHT_Y] = mode2::STICK_CENTER;
        report
    }

    #[test]
    fn classifies_mode0_from_marker_bytes() {
        let report = [0u8, 20, 16, 0, 0, 0, 0, 255, 127, 0, 0, 255, 127, 0];
        assert_eq!(classify_report(&report, None), Ok(ReportLayout::Mode0));
    }

    #[test]
    fn classifies_mode0_prefix_before_length_check() {
        // Classification only needs the marker bytes; the decoder is the
        // one that rejects the short buffer.
        assert_eq!(classify_report(&[0, 20, 0, 0, 0], None), Ok(ReportLayout::Mode0));
    }

    #[test]
    fn all_zero_report_is_unrecognized() {
        assert_eq!(
            classify_report(&[0u8; 14], None),
            Err(DecodeError::UnrecognizedLayout)
        );
    }

    #[test]
    fn empty_report_is_unrecognized() {
        assert_eq!(classify_report(&[], None), Err(DecodeError::UnrecognizedLayout));
    }

    #[test]
    fn classifies_mode1_from_constant_markers() {
        let mut report = mode1_centered();
        // Left stick away from every 127/128 coincidence.
        report[mode1::LEFT_X] = 40;
        report[mode1::LEFT_Y] = 200;
        assert_eq!(classify_report(&report, None), Ok(ReportLayout::Mode1));
    }

    #[test]
    fn classifies_mode2_when_pad_bytes_carry_stick() {
        let mut report = mode2_centered();
        // Right stick deflected: bytes 5-6 no longer read 0x80.
        report[mode2::RIGHT_X] = 10;
        report[mode2::RIGHT_Y] = 240;
        assert_eq!(classify_report(&report, None), Ok(ReportLayout::Mode2));
    }

    #[test]
    fn ambiguous_tie_defaults_to_mode1() {
        // Mode 2 with the right stick resting where Mode 1 keeps its
        // constant filler: both fingerprints match.
        let mut report = mode2_centered();
        report[mode2::RIGHT_X] = mode1::PAD_VALUE;
        report[mode2::RIGHT_Y] = mode1::PAD_VALUE;
        assert_eq!(classify_report(&report, None), Ok(ReportLayout::Mode1));
    }

    #[test]
    fn ambiguous_tie_follows_hint() {
        let mut report = mode2_centered();
        report[mode2::RIGHT_X] = mode1::PAD_VALUE;
        report[mode2::RIGHT_Y] = mode1::PAD_VALUE;
        assert_eq!(
            classify_report(&report, Some(ReportLayout::Mode2)),
            Ok(ReportLayout::Mode2)
        );
    }

    #[test]
    fn hint_never_overrides_structural_mismatch() {
        let mut report = mode1_centered();
        report[mode1::LEFT_X] = 40;
        report[mode1::LEFT_Y] = 200;
        assert_eq!(
            classify_report(&report, Some(ReportLayout::Mode2)),
            Ok(ReportLayout::Mode1)
        );

        let report = [0u8, 20, 0, 0, 0, 0, 0, 255, 127, 0, 0, 255, 127, 0];
        assert_eq!(
            classify_report(&report, Some(ReportLayout::Mode1)),
            Ok(ReportLayout::Mode0)
        );
    }

    #[test]
    fn mode0_hint_is_ignored_for_the_tie() {
        let mut report = mode2_centered();
        report[mode2::RIGHT_X] = mode1::PAD_VALUE;
        report[mode2::RIGHT_Y] = mode1::PAD_VALUE;
        assert_eq!(
            classify_report(&report, Some(ReportLayout::Mode0)),
            Ok(ReportLayout::Mode1)
        );
    }

    #[test]
    fn required_lengths() {
        assert_eq!(ReportLayout::Mode0.required_len(), 14);
        assert_eq!(ReportLayout::Mode1.required_len(), 15);
        assert_eq!(ReportLayout::Mode2.required_len(), 15);
    }
}
