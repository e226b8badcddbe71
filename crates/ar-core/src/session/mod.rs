//! AR session drivers and the manager that picks between them.
//!
//! Every driver implements [`ArSession`]. The manager holds them as trait
//! objects in the priority order configured by the host page.

mod manager;
mod quick_look;
mod scene_viewer;
mod webxr;

pub use manager::{ArManager, ManagerSlot};
pub use quick_look::{quick_look_href, QuickLookSession};
pub use scene_viewer::{scene_viewer_intent, SceneViewerSession, NO_AR_FALLBACK_FRAGMENT};
pub use webxr::{FrameData, WebXrSession, XrPlatform};

use crate::error::{ConfigError, SessionError};
use async_trait::async_trait;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    WebXr,
    SceneViewer,
    QuickLook,
}

impl SessionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::WebXr => "webxr",
            SessionKind::SceneViewer => "scene-viewer",
            SessionKind::QuickLook => "quick-look",
        }
    }

    /// Whether the session presents inside the page. Native viewers take
    /// over the screen and never report back.
    pub fn is_in_page(self) -> bool {
        matches!(self, SessionKind::WebXr)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "webxr" => Ok(SessionKind::WebXr),
            "scene-viewer" => Ok(SessionKind::SceneViewer),
            "quick-look" => Ok(SessionKind::QuickLook),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// Session-level outcomes surfaced to the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Entered(SessionKind),
    Failed,
    Ended(SessionKind),
}

impl SessionEvent {
    /// Value of the host's `ar-status` attribute for this event. Native
    /// launches leave the attribute alone since no end event follows them.
    pub fn status(&self) -> Option<&'static str> {
        match self {
            SessionEvent::Entered(kind) if !kind.is_in_page() => None,
            SessionEvent::Entered(_) => Some("session-started"),
            SessionEvent::Failed => Some("failed"),
            SessionEvent::Ended(_) => Some("not-presenting"),
        }
    }
}

pub type EventSink = Rc<dyn Fn(SessionEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Requesting,
    Active,
    Ending,
}

#[async_trait(?Send)]
pub trait ArSession {
    fn kind(&self) -> SessionKind;

    /// Capability check. Unavailability is reported here, never as an error.
    async fn is_available(&self) -> bool;

    async fn enter(&mut self) -> Result<(), SessionError>;

    fn exit(&mut self);

    /// Whether an in-page session is presenting.
    fn is_active(&self) -> bool;

    /// Receives `Ended` when the session stops on its own.
    fn set_event_sink(&mut self, _sink: EventSink) {}
}

/// Hands the model to an OS-owned AR viewer.
pub trait NativeLauncher {
    fn page_url(&self) -> String;
    fn navigate(&self, url: &str) -> Result<(), SessionError>;
    fn open_quick_look(&self, href: &str) -> Result<(), SessionError>;
    fn supports_quick_look(&self) -> bool;
}
