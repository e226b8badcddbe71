//! Browser-side tuning constants and the names the host page relies on.
//!
//! Gesture and placement tuning lives in `ar_core::constants`; this file only
//! holds values that concern the DOM, the frame loop and the JS host.

// Host element attributes
pub const AR_STATUS_ATTR: &str = "ar-status";
pub const AR_MODES_ATTR: &str = "ar-modes";
pub const AR_PLACEMENT_ATTR: &str = "ar-placement";
pub const AR_SCALE_ATTR: &str = "ar-scale";
pub const SRC_ATTR: &str = "src";
pub const IOS_SRC_ATTR: &str = "ios-src";
pub const TITLE_ATTR: &str = "alt";
pub const LINK_ATTR: &str = "link";

// Status values before any session has been attempted
pub const STATUS_NOT_PRESENTING: &str = "not-presenting";

// Frame loop
pub const MAX_FRAME_DELTA_SEC: f32 = 0.1; // clamp after tab switches

// Pointer/wheel mapping
pub const WHEEL_PIXELS_PER_NOTCH: f32 = 100.0;
pub const WHEEL_LINES_PER_NOTCH: f32 = 3.0;

// WebXR
pub const TRANSIENT_INPUT_PROFILE: &str = "generic-touchscreen";
pub const XR_REQUIRED_FEATURES: &[&str] = &["hit-test"];
pub const XR_OPTIONAL_FEATURES: &[&str] = &["dom-overlay"];
