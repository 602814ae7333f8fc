//! PiHut wireless USB game controller HID decoding.
//!
//! The controller enumerates under VID `0x2563` and emits 15-byte input
//! reports whose byte layout depends on an on-device operating mode selected
//! with a button combo (Analog held + right-stick-up ×7, then Analog off for
//! mode 1 or on for mode 2). The device never reports which mode is active,
//! so the active layout has to be inferred per report from structural
//! fingerprints.
//!
//! This crate is intentionally I/O-free: it turns already-received report
//! bytes into a layout-independent [`ControllerState`] and never touches USB
//! plumbing. The transfer loop lives behind the [`ReportSource`] seam so the
//! whole pipeline can be exercised against literal byte fixtures.
//!
//! Decoding is all-or-nothing per report: a garbled or truncated report
//! yields a [`DecodeError`] and no partial state, and the caller decides
//! whether to keep the last good snapshot or treat repeated failures as a
//! disconnect.

#![deny(static_mut_refs)]

pub mod axis;
pub mod ids;
pub mod input;
pub mod layout;
pub mod mode_switch;
pub mod session;
pub mod types;

use thiserror::Error;

pub use axis::{Deadzone, centered_axis, inverted_axis, paired_axis};
pub use ids::{GamepadIdentity, PRODUCT_REV_A, PRODUCT_REV_B, VENDOR_ID, identify, is_pihut_gamepad, product_name};
pub use input::decode_report;
pub use layout::{ReportLayout, classify_report};
pub use mode_switch::ModeSwitchTracker;
pub use session::{DecodeSession, ReportSource, TransportError};
pub use types::{ButtonMask, ControllerState, StickAxes, TriggerPair};

/// Why a poll cycle produced no [`ControllerState`].
///
/// Every variant is a discardable-report signal: the core never retries and
/// never escalates, and a failed report has no effect on the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The report matched no known layout fingerprint. Discard it; the next
    /// report is classified from scratch.
    #[error("report matches no known layout fingerprint")]
    UnrecognizedLayout,

    /// The transfer delivered fewer bytes than the classified layout needs.
    #[error("report too short for {layout}: got {got} bytes, need {need}")]
    TruncatedReport {
        layout: ReportLayout,
        got: usize,
        need: usize,
    },

    /// The external transfer collaborator reported a timeout.
    #[error("transfer timed out")]
    TimedOut,

    /// The external transfer collaborator reported a bus/transfer failure.
    #[error("transfer error: {0}")]
    TransferError(String),
}
