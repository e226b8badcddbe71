use super::{ArSession, NativeLauncher, SessionKind};
use crate::config::{ArConfig, ArScale};
use crate::device::DeviceProfile;
use crate::error::SessionError;
use async_trait::async_trait;
use std::rc::Rc;
use url::{form_urlencoded, Url};

/// Fragment appended to the browser fallback URL so the page can tell it was
/// bounced back from a failed intent.
pub const NO_AR_FALLBACK_FRAGMENT: &str = "model-viewer-no-ar-fallback";

/// Build the Android intent URL that opens `config.src` in Scene Viewer.
/// Relative model and link URLs resolve against `page_url`.
pub fn scene_viewer_intent(page_url: &str, config: &ArConfig) -> Result<String, SessionError> {
    let page = Url::parse(page_url)?;
    let model = page.join(&config.src)?;

    let mut params = form_urlencoded::Serializer::new(String::new());
    params.append_pair("file", model.as_str());
    params.append_pair("mode", "ar_preferred");
    if let Some(title) = &config.title {
        params.append_pair("title", title);
    }
    if let Some(link) = &config.link {
        params.append_pair("link", page.join(link)?.as_str());
    }
    if config.scale == ArScale::Fixed {
        params.append_pair("resizable", "false");
    }
    if config.is_vertical() {
        params.append_pair("enable_vertical_placement", "true");
    }

    let mut fallback = page.clone();
    fallback.set_fragment(Some(NO_AR_FALLBACK_FRAGMENT));
    let fallback: String = form_urlencoded::byte_serialize(fallback.as_str().as_bytes()).collect();

    Ok(format!(
        "intent://arvr.google.com/scene-viewer/1.0?{}#Intent;scheme={};package=com.google.ar.core;action=android.intent.action.VIEW;S.browser_fallback_url={};end;",
        params.finish(),
        model.scheme(),
        fallback
    ))
}

/// Android Scene Viewer. The OS owns the AR UI, so there is nothing to exit.
pub struct SceneViewerSession<L: NativeLauncher> {
    launcher: Rc<L>,
    device: DeviceProfile,
    config: ArConfig,
}

impl<L: NativeLauncher> SceneViewerSession<L> {
    pub fn new(launcher: Rc<L>, device: DeviceProfile, config: ArConfig) -> Self {
        Self {
            launcher,
            device,
            config,
        }
    }
}

#[async_trait(?Send)]
impl<L: NativeLauncher> ArSession for SceneViewerSession<L> {
    fn kind(&self) -> SessionKind {
        SessionKind::SceneViewer
    }

    async fn is_available(&self) -> bool {
        self.device.supports_scene_viewer() && !self.config.src.is_empty()
    }

    async fn enter(&mut self) -> Result<(), SessionError> {
        if !self.device.supports_scene_viewer() {
            return Err(SessionError::Unsupported(SessionKind::SceneViewer));
        }
        let intent = scene_viewer_intent(&self.launcher.page_url(), &self.config)?;
        log::info!("[scene-viewer] launching intent");
        log::debug!("[scene-viewer] {}", intent);
        self.launcher.navigate(&intent)
    }

    fn exit(&mut self) {}

    fn is_active(&self) -> bool {
        false
    }
}
