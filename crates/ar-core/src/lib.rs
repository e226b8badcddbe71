//! Gesture, placement and session logic for an AR model viewer.
//!
//! Nothing here touches browser APIs: the renderer, WebXR and native AR
//! launchers sit behind the [`scene::ArScene`], [`session::XrPlatform`] and
//! [`session::NativeLauncher`] traits, so the whole crate runs on the host.

pub mod camera;
pub mod config;
pub mod constants;
pub mod controls;
pub mod deadzone;
pub mod device;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod motion;
pub mod placement;
pub mod scene;
pub mod session;

pub use camera::{OrbitCamera, Pose};
pub use config::{ArConfig, ArScale, Placement};
pub use error::{ArError, ConfigError, SessionError};
pub use session::{ArManager, ArSession, SessionEvent, SessionKind};
