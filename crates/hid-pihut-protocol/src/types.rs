//! Layout-independent controller state.
//!
//! Consumers read buttons and axes from [`ControllerState`] without knowing
//! which report layout produced them; the layout tag is carried only for
//! diagnostics and mode-switch tracking.

use crate::layout::ReportLayout;

/// Named button flags, populated from whichever encoding the active layout
/// uses (dedicated bit, magnitude byte, or hat position).
///
/// `turbo` exists only on the Mode 1/2 layouts and stays `false` in Mode 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonMask {
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub start: bool,
    pub select: bool,
    pub l1: bool,
    pub r1: bool,
    pub analog: bool,
    pub cross: bool,
    pub circle: bool,
    pub square: bool,
    pub triangle: bool,
    pub turbo: bool,
}

impl ButtonMask {
    /// True when at least one flag is set.
    pub fn any_pressed(&self) -> bool {
        *self != ButtonMask::default()
    }
}

/// One stick, signed and centered: +x is right, +y is up, both in
/// [-1.0, 1.0] once normalized.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickAxes {
    pub x: f32,
    pub y: f32,
}

impl StickAxes {
    pub const CENTERED: StickAxes = StickAxes { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Largest per-axis deflection magnitude.
    pub fn deflection(&self) -> f32 {
        self.x.abs().max(self.y.abs())
    }
}

/// L2/R2 travel, 0–255. Mode 0 reports true analog travel; Mode 1/2 only
/// carry digital flags, mapped to 0 or 255 here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerPair {
    pub l2: u8,
    pub r2: u8,
}

/// Complete decoded snapshot of one input report.
///
/// Built fresh per poll and handed to the caller by value, so a consumer
/// always observes one internally consistent report and never a half-updated
/// one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    pub buttons: ButtonMask,
    pub left_stick: StickAxes,
    pub right_stick: StickAxes,
    pub triggers: TriggerPair,
    /// Layout the report was classified as. Diagnostics only — every other
    /// field already has layout-independent semantics.
    pub layout: ReportLayout,
}

impl ControllerState {
    /// Neutral state for `layout`: nothing pressed, sticks centered.
    pub fn neutral(layout: ReportLayout) -> Self {
        Self {
            buttons: ButtonMask::default(),
            left_stick: StickAxes::CENTERED,
            right_stick: StickAxes::CENTERED,
            triggers: TriggerPair::default(),
            layout,
        }
    }
}
