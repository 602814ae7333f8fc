//! USB identity constants for the PiHut wireless gamepad family.
//!
//! Values recovered from device enumeration; there is no vendor
//! documentation. Two hardware revisions have been observed in the field,
//! identical at the report level.

/// Vendor ID shared by both revisions (ShanWan OEM).
pub const VENDOR_ID: u16 = 0x2563;

/// Product ID of the original revision.
pub const PRODUCT_REV_A: u16 = 0x0575;

/// Product ID of the later revision.
pub const PRODUCT_REV_B: u16 = 0x0526;

/// True for the official VID plus a known PID.
pub fn is_pihut_gamepad(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == VENDOR_ID && identify(product_id).is_some()
}

/// Human-readable product name, `"unknown"` for unrecognized PIDs.
pub fn product_name(product_id: u16) -> &'static str {
    match identify(product_id) {
        Some(identity) => identity.name,
        None => "unknown",
    }
}

/// Identity metadata for a known product ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamepadIdentity {
    pub product_id: u16,
    pub name: &'static str,
    /// Nominal interrupt report length in every operating mode.
    pub report_len: usize,
}

/// Identify a product ID, returning `None` for anything outside the family.
pub fn identify(product_id: u16) -> Option<GamepadIdentity> {
    match product_id {
        PRODUCT_REV_A => Some(GamepadIdentity {
            product_id,
            name: "PiHut Wireless USB Game Controller (rev A)",
            report_len: rover_pihut_gamepad_report::REPORT_LEN,
        }),
        PRODUCT_REV_B => Some(GamepadIdentity {
            product_id,
            name: "PiHut Wireless USB Game Controller (rev B)",
            report_len: rover_pihut_gamepad_report::REPORT_LEN,
        }),
        _ => None,
    }
}
