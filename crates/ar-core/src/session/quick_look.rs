use super::{ArSession, NativeLauncher, SessionKind};
use crate::config::{ArConfig, ArScale};
use crate::device::DeviceProfile;
use crate::error::SessionError;
use async_trait::async_trait;
use std::rc::Rc;
use url::Url;

/// Resolve the USDZ model for Quick Look, disabling pinch-scale for a fixed
/// scale.
pub fn quick_look_href(page_url: &str, config: &ArConfig) -> Result<String, SessionError> {
    let src = config
        .ios_src
        .as_deref()
        .ok_or(SessionError::Unsupported(SessionKind::QuickLook))?;
    let mut model = Url::parse(page_url)?.join(src)?;
    if config.scale == ArScale::Fixed {
        model.set_fragment(Some("allowsContentScaling=0"));
    }
    Ok(model.into())
}

/// iOS AR Quick Look, entered through an `rel="ar"` anchor.
pub struct QuickLookSession<L: NativeLauncher> {
    launcher: Rc<L>,
    device: DeviceProfile,
    config: ArConfig,
}

impl<L: NativeLauncher> QuickLookSession<L> {
    pub fn new(launcher: Rc<L>, device: DeviceProfile, config: ArConfig) -> Self {
        Self {
            launcher,
            device,
            config,
        }
    }
}

#[async_trait(?Send)]
impl<L: NativeLauncher> ArSession for QuickLookSession<L> {
    fn kind(&self) -> SessionKind {
        SessionKind::QuickLook
    }

    async fn is_available(&self) -> bool {
        self.device.supports_quick_look()
            && self.launcher.supports_quick_look()
            && self.config.ios_src.is_some()
    }

    async fn enter(&mut self) -> Result<(), SessionError> {
        let href = quick_look_href(&self.launcher.page_url(), &self.config)?;
        log::info!("[quick-look] opening {}", href);
        self.launcher.open_quick_look(&href)
    }

    fn exit(&mut self) {}

    fn is_active(&self) -> bool {
        false
    }
}
