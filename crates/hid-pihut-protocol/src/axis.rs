//! Stick axis conventions and deadzone normalization.
//!
//! Every layout-specific centering scheme (the Mode 0 marker/magnitude
//! pairs, the 128-centered Mode 1 stick, the 127-centered Mode 2 sticks)
//! maps onto one signed convention here: +x right, +y up, range [-1.0, 1.0].
//! Downstream drive logic never sees a raw byte.

use serde::{Deserialize, Serialize};

use crate::types::{ControllerState, StickAxes};

/// Decode a Mode 0 (marker, magnitude) axis pair.
///
/// The pair reads (255, 127) exactly when the stick rests at center; that
/// combination is the only one that may produce exact zero, since magnitude
/// 127 otherwise means full positive deflection. Away from center the
/// magnitude byte runs 0..=127 toward +1.0 and 255 down to 128 toward -1.0,
/// so both half-ranges approach zero again near the wrap.
pub fn paired_axis(marker: u8, magnitude: u8) -> f32 {
    if marker == 0xFF && magnitude == 0x7F {
        return 0.0;
    }
    if magnitude & 0x80 != 0 {
        (f32::from(magnitude) - 255.0) / 127.0
    } else {
        f32::from(magnitude) / 127.0
    }
}

/// Decode a single-byte axis centered at `center`, positive upward in raw
/// terms (larger byte = further right).
pub fn centered_axis(raw: u8, center: u8) -> f32 {
    ((f32::from(raw) - f32::from(center)) / 127.0).clamp(-1.0, 1.0)
}

/// Decode a single-byte axis centered at `center` whose raw direction is
/// inverted (smaller byte = up, which must come out positive).
pub fn inverted_axis(raw: u8, center: u8) -> f32 {
    ((f32::from(center) - f32::from(raw)) / 127.0).clamp(-1.0, 1.0)
}

/// Configurable per-axis dead zone.
///
/// Values whose magnitude falls below `radius` normalize to exactly 0.0;
/// above it the remaining travel is rescaled to [0, 1] so output is
/// continuous at the boundary instead of jumping. Out-of-range input is
/// clamped to ±1.0 rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deadzone {
    /// Normalized radius in [0.0, 0.95]; anything else is clamped on use.
    pub radius: f32,
}

impl Default for Deadzone {
    fn default() -> Self {
        // Idle drift on the studied units stays under ~5% of travel.
        Self { radius: 0.08 }
    }
}

impl Deadzone {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// A pass-through configuration (no dead zone, clamping only).
    pub const DISABLED: Deadzone = Deadzone { radius: 0.0 };

    /// Normalize one axis value.
    pub fn apply(self, value: f32) -> f32 {
        let value = if value.is_finite() { value.clamp(-1.0, 1.0) } else { 0.0 };
        let radius = self.radius.clamp(0.0, 0.95);
        let magnitude = value.abs();
        if magnitude <= radius {
            return 0.0;
        }
        let rescaled = (magnitude - radius) / (1.0 - radius);
        rescaled.min(1.0).copysign(value)
    }

    /// Normalize both axes of one stick.
    pub fn apply_stick(self, stick: StickAxes) -> StickAxes {
        StickAxes {
            x: self.apply(stick.x),
            y: self.apply(stick.y),
        }
    }

    /// Normalize both sticks of a decoded state; buttons and triggers pass
    /// through untouched.
    pub fn apply_state(self, mut state: ControllerState) -> ControllerState {
        state.left_stick = self.apply_stick(state.left_stick);
        state.right_stick = self.apply_stick(state.right_stick);
        state
    }
}
