//! Detection of the on-device mode-switch combo.
//!
//! The controller changes layout when the user holds Analog, presses
//! right-stick-up seven times, and then toggles Analog: releasing it selects
//! mode 1, pressing it again selects mode 2. The device gives no
//! acknowledgement, so this tracker only produces an *advisory* expected
//! layout that the classifier may use as a tie-breaker — structural
//! fingerprints always win.
//!
//! Progress is bounded in polls: a combo that stalls resets to idle instead
//! of waiting forever for the remaining presses.

use tracing::{debug, info};

use crate::layout::ReportLayout;
use crate::types::ControllerState;

/// Right-stick-up presses required by the firmware.
const REQUIRED_PRESSES: u8 = 7;

/// Polls without combo progress before the tracker gives up.
const STALL_LIMIT: u32 = 64;

/// Polls after the Analog release during which pressing Analog again
/// upgrades the selection from mode 1 to mode 2.
const SELECT_WINDOW: u32 = 32;

/// Deflection above which the right stick counts as pushed up. Mode 1
/// reports the direction digitally (±1.0), Mode 0/2 as analog travel.
const UP_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Analog held, counting right-stick-up presses.
    Counting { presses: u8, stalled_polls: u32 },
    /// All presses seen; waiting for the Analog release.
    Armed { stalled_polls: u32 },
    /// Analog released (mode 1 selected); a re-press upgrades to mode 2.
    Selecting { polls: u32 },
}

/// Watches decoded states for the layout-switch combo and keeps the
/// expected-next-layout hint.
#[derive(Debug)]
pub struct ModeSwitchTracker {
    phase: Phase,
    up_was_active: bool,
    expected: Option<ReportLayout>,
}

impl Default for ModeSwitchTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeSwitchTracker {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            up_was_active: false,
            expected: None,
        }
    }

    /// The advisory layout hint, if a completed combo is pending
    /// confirmation.
    pub fn expected_layout(&self) -> Option<ReportLayout> {
        self.expected
    }

    /// Clear the hint once the classifier has actually observed the layout
    /// it predicted.
    pub fn confirm(&mut self, observed: ReportLayout) {
        if self.expected == Some(observed) {
            info!(layout = %observed, "expected layout confirmed on the wire");
            self.expected = None;
        }
    }

    /// Feed one decoded state; called once per successful poll.
    pub fn observe(&mut self, state: &ControllerState) {
        let up_active = state.right_stick.y >= UP_THRESHOLD;
        let up_pressed = up_active && !self.up_was_active;
        self.up_was_active = up_active;
        let analog = state.buttons.analog;

        self.phase = match self.phase {
            Phase::Idle => {
                if analog && up_pressed {
                    debug!("mode-switch combo started");
                    Phase::Counting { presses: 1, stalled_polls: 0 }
                } else {
                    Phase::Idle
                }
            }
            Phase::Counting { presses, stalled_polls } => {
                if !analog {
                    debug!(presses, "analog released mid-combo, resetting");
                    Phase::Idle
                } else if up_pressed {
                    let presses = presses.saturating_add(1);
                    if presses >= REQUIRED_PRESSES {
                        debug!("mode-switch combo armed, waiting for analog toggle");
                        Phase::Armed { stalled_polls: 0 }
                    } else {
                        Phase::Counting { presses, stalled_polls: 0 }
                    }
                } else if stalled_polls >= STALL_LIMIT {
                    debug!(presses, "mode-switch combo stalled, resetting");
                    Phase::Idle
                } else {
                    Phase::Counting { presses, stalled_polls: stalled_polls + 1 }
                }
            }
            Phase::Armed { stalled_polls } => {
                if !analog {
                    info!("mode-switch combo complete, expecting mode 1");
                    self.expected = Some(ReportLayout::Mode1);
                    Phase::Selecting { polls: 0 }
                } else if stalled_polls >= STALL_LIMIT {
                    debug!("armed combo never toggled analog, resetting");
                    Phase::Idle
                } else {
                    Phase::Armed { stalled_polls: stalled_polls + 1 }
                }
            }
            Phase::Selecting { polls } => {
                if analog {
                    info!("analog re-pressed, expecting mode 2 instead");
                    self.expected = Some(ReportLayout::Mode2);
                    Phase::Idle
                } else if polls >= SELECT_WINDOW {
                    Phase::Idle
                } else {
                    Phase::Selecting { polls: polls + 1 }
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StickAxes;

    fn state(analog: bool, up: bool) -> ControllerState {
        let mut state = ControllerState::neutral(ReportLayout::Mode0);
        state.buttons.analog = analog;
        state.right_stick = StickAxes::new(0.0, if up { 1.0 } else { 0.0 });
        state
    }

    fn press_up_n_times(tracker: &mut ModeSwitchTracker, n: usize) {
        for _ in 0..n {
            tracker.observe(&state(true, true));
            tracker.observe(&state(true, false));
        }
    }

    #[test]
    fn full_combo_selects_mode1() {
        let mut tracker = ModeSwitchTracker::new();
        press_up_n_times(&mut tracker, 7);
        assert_eq!(tracker.expected_layout(), None);
        tracker.observe(&state(false, false));
        assert_eq!(tracker.expected_layout(), Some(ReportLayout::Mode1));
    }

    #[test]
    fn analog_repress_upgrades_to_mode2() {
        let mut tracker = ModeSwitchTracker::new();
        press_up_n_times(&mut tracker, 7);
        tracker.observe(&state(false, false));
        tracker.observe(&state(true, false));
        assert_eq!(tracker.expected_layout(), Some(ReportLayout::Mode2));
    }

    #[test]
    fn late_repress_keeps_mode1() {
        let mut tracker = ModeSwitchTracker::new();
        press_up_n_times(&mut tracker, 7);
        tracker.observe(&state(false, false));
        for _ in 0..=SELECT_WINDOW {
            tracker.observe(&state(false, false));
        }
        tracker.observe(&state(true, false));
        assert_eq!(tracker.expected_layout(), Some(ReportLayout::Mode1));
    }

    #[test]
    fn too_few_presses_produce_no_hint() {
        let mut tracker = ModeSwitchTracker::new();
        press_up_n_times(&mut tracker, 5);
        tracker.observe(&state(false, false));
        assert_eq!(tracker.expected_layout(), None);
    }

    #[test]
    fn releasing_analog_mid_count_resets() {
        let mut tracker = ModeSwitchTracker::new();
        press_up_n_times(&mut tracker, 3);
        tracker.observe(&state(false, false));
        // Finishing the count afterwards must not complete the old combo.
        press_up_n_times(&mut tracker, 4);
        tracker.observe(&state(false, false));
        assert_eq!(tracker.expected_layout(), None);
    }

    #[test]
    fn stalled_combo_resets_within_bounded_polls() {
        let mut tracker = ModeSwitchTracker::new();
        press_up_n_times(&mut tracker, 3);
        for _ in 0..=STALL_LIMIT {
            tracker.observe(&state(true, false));
        }
        // Tracker is idle again: four more presses are a fresh (too short)
        // combo, not the completion of the stalled one.
        press_up_n_times(&mut tracker, 4);
        tracker.observe(&state(false, false));
        assert_eq!(tracker.expected_layout(), None);
    }

    #[test]
    fn confirm_clears_matching_hint_only() {
        let mut tracker = ModeSwitchTracker::new();
        press_up_n_times(&mut tracker, 7);
        tracker.observe(&state(false, false));
        tracker.confirm(ReportLayout::Mode0);
        assert_eq!(tracker.expected_layout(), Some(ReportLayout::Mode1));
        tracker.confirm(ReportLayout::Mode1);
        assert_eq!(tracker.expected_layout(), None);
    }

    #[test]
    fn analog_held_without_presses_never_arms() {
        let mut tracker = ModeSwitchTracker::new();
        for _ in 0..200 {
            tracker.observe(&state(true, false));
        }
        tracker.observe(&state(false, false));
        assert_eq!(tracker.expected_layout(), None);
    }
}
