//! Decode session: the stateful front door of the crate.
//!
//! [`DecodeSession`] replaces what would otherwise be process-wide device
//! state (active layout, pending mode switch, deadzone config) with an
//! explicit value the caller owns, so the whole pipeline runs deterministic
//! against literal byte fixtures. One session per controller.
//!
//! The physical interrupt-transfer loop stays outside the crate behind the
//! [`ReportSource`] trait; its timeout and bus failures pass through as
//! discardable-report errors and the caller keeps its last good state.

use thiserror::Error;
use tracing::{debug, info, warn};

use rover_pihut_gamepad_report::MAX_REPORT_LEN;

use crate::DecodeError;
use crate::axis::Deadzone;
use crate::input::decode_report;
use crate::layout::{ReportLayout, classify_report};
use crate::mode_switch::ModeSwitchTracker;
use crate::types::ControllerState;

/// Failures of the external transfer collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No report arrived within the caller-configured timeout.
    #[error("interrupt transfer timed out")]
    TimedOut,
    /// The transfer itself failed (stall, disconnect, bus error).
    #[error("interrupt transfer failed: {0}")]
    Transfer(String),
}

impl From<TransportError> for DecodeError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::TimedOut => DecodeError::TimedOut,
            TransportError::Transfer(msg) => DecodeError::TransferError(msg),
        }
    }
}

/// Seam for the USB transfer collaborator.
///
/// Implementations perform one bounded interrupt-in transfer per call and
/// must never block past their own timeout; blocking semantics belong to
/// the transport, not to this crate.
pub trait ReportSource {
    /// Fill `buf` with one report and return the byte count received.
    fn read_report(&mut self, buf: &mut [u8; MAX_REPORT_LEN]) -> Result<usize, TransportError>;
}

/// Per-controller decoding state machine.
pub struct DecodeSession {
    deadzone: Deadzone,
    tracker: ModeSwitchTracker,
    last_layout: Option<ReportLayout>,
}

impl Default for DecodeSession {
    fn default() -> Self {
        Self::new(Deadzone::default())
    }
}

impl DecodeSession {
    pub fn new(deadzone: Deadzone) -> Self {
        Self {
            deadzone,
            tracker: ModeSwitchTracker::new(),
            last_layout: None,
        }
    }

    /// Layout of the most recent successfully decoded report.
    pub fn last_layout(&self) -> Option<ReportLayout> {
        self.last_layout
    }

    /// Decode one already-received report.
    ///
    /// Runs classify → decode → normalize → combo tracking. On any error
    /// the session state is untouched: a garbled report cannot poison the
    /// classification of the next one.
    pub fn decode(&mut self, report: &[u8]) -> Result<ControllerState, DecodeError> {
        let layout = classify_report(report, self.tracker.expected_layout())?;
        let state = decode_report(report, layout)?;
        let state = self.deadzone.apply_state(state);

        match self.last_layout {
            Some(previous) if previous != layout => {
                info!(from = %previous, to = %layout, "report layout changed");
            }
            None => debug!(%layout, "first report classified"),
            _ => {}
        }
        self.last_layout = Some(layout);
        self.tracker.confirm(layout);
        self.tracker.observe(&state);

        Ok(state)
    }

    /// Pull one report through the transport seam and decode it.
    ///
    /// Transport failures map straight onto [`DecodeError::TimedOut`] /
    /// [`DecodeError::TransferError`]; the caller treats any error as "no
    /// new state this cycle" and keeps its previous snapshot.
    pub fn poll<S: ReportSource>(&mut self, source: &mut S) -> Result<ControllerState, DecodeError> {
        let mut buf = [0u8; MAX_REPORT_LEN];
        let count = match source.read_report(&mut buf) {
            Ok(count) => count.min(MAX_REPORT_LEN),
            Err(err) => {
                warn!(%err, "transfer failed, discarding cycle");
                return Err(err.into());
            }
        };
        self.decode(&buf[..count])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StickAxes;

    /// Canned transfer results, one per poll.
    struct ScriptedSource {
        script: Vec<Result<Vec<u8>, TransportError>>,
        cursor: usize,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<Vec<u8>, TransportError>>) -> Self {
            Self { script, cursor: 0 }
        }
    }

    impl ReportSource for ScriptedSource {
        fn read_report(&mut self, buf: &mut [u8; MAX_REPORT_LEN]) -> Result<usize, TransportError> {
            let entry = self.script.get(self.cursor).cloned().unwrap_or(Err(TransportError::TimedOut));
            self.cursor += 1;
            match entry {
                Ok(bytes) => {
                    let count = bytes.len().min(MAX_REPORT_LEN);
                    buf[..count].copy_from_slice(&bytes[..count]);
                    Ok(count)
                }
                Err(err) => Err(err),
            }
        }
    }

    fn mode0_start_report() -> Vec<u8> {
        vec![0, 20, 16, 0, 0, 0, 0, 255, 127, 0, 0, 255, 127, 0]
    }

    #[test]
    fn poll_decodes_a_good_report() {
        let mut session = DecodeSession::default();
        let mut source = ScriptedSource::new(vec![Ok(mode0_start_report())]);
        let state = session.poll(&mut source).expect("good report");
        assert!(state.buttons.start);
        assert_eq!(state.left_stick, StickAxes::CENTERED);
        assert_eq!(session.last_layout(), Some(ReportLayout::Mode0));
    }

    #[test]
    fn poll_passes_transport_errors_through() {
        let mut session = DecodeSession::default();
        let mut source = ScriptedSource::new(vec![
            Err(TransportError::TimedOut),
            Err(TransportError::Transfer("pipe stalled".into())),
        ]);
        assert_eq!(session.poll(&mut source), Err(DecodeError::TimedOut));
        assert_eq!(
            session.poll(&mut source),
            Err(DecodeError::TransferError("pipe stalled".into()))
        );
        assert_eq!(session.last_layout(), None);
    }

    #[test]
    fn garbled_report_does_not_stick() {
        let mut session = DecodeSession::default();
        let mut source = ScriptedSource::new(vec![
            Ok(vec![0u8; 14]),
            Ok(mode0_start_report()),
        ]);
        assert_eq!(session.poll(&mut source), Err(DecodeError::UnrecognizedLayout));
        assert_eq!(session.last_layout(), None);
        let state = session.poll(&mut source).expect("recovers on next poll");
        assert_eq!(state.layout, ReportLayout::Mode0);
    }

    #[test]
    fn truncated_report_is_all_or_nothing() {
        let mut session = DecodeSession::default();
        let err = session.decode(&[0, 20, 0, 0, 0]).expect_err("5 bytes");
        assert!(matches!(err, DecodeError::TruncatedReport { got: 5, need: 14, .. }));
        assert_eq!(session.last_layout(), None);
    }

    #[test]
    fn deadzone_is_applied_to_decoded_sticks() {
        // Left stick barely off center in mode 0 terms.
        let mut report = mode0_start_report();
        report[7] = 3; // magnitude 3/127 ≈ 0.024, inside the default radius
        let mut session = DecodeSession::default();
        let state = session.decode(&report).expect("decodes");
        assert_eq!(state.left_stick.x, 0.0);
    }

    #[test]
    fn session_feeds_combo_tracker_from_decoded_states() {
        let mut session = DecodeSession::new(Deadzone::DISABLED);

        let mut analog_up = mode0_neutral();
        analog_up[3] = 0x04; // Analog held
        analog_up[13] = 100; // right stick up (magnitude 100/127)
        let mut analog_only = mode0_neutral();
        analog_only[3] = 0x04;

        for _ in 0..7 {
            session.decode(&analog_up).expect("decodes");
            session.decode(&analog_only).expect("decodes");
        }
        // Release analog (selects mode 1), then re-press it: the tracker
        // upgrades the expectation to mode 2.
        session.decode(&mode0_neutral()).expect("decodes");
        session.decode(&analog_only).expect("decodes");

        // A report at stick center matches both mode 1 and mode 2
        // fingerprints; without the hint the classifier would default to
        // mode 1.
        let mut ambiguous = [0u8; 15];
        ambiguous[2] = 0x0F;
        ambiguous[3] = 127;
        ambiguous[4] = 127;
        ambiguous[5] = 0x80;
        ambiguous[6] = 0x80;
        let state = session.decode(&ambiguous).expect("decodes");
        assert_eq!(state.layout, ReportLayout::Mode2);
    }

    fn mode0_neutral() -> [u8; 14] {
        [0, 20, 0, 0, 0, 0, 0, 255, 127, 0, 0, 255, 127, 0]
    }
}
