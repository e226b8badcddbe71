use ar_core::error::SessionError;
use ar_core::session::NativeLauncher;
use wasm_bindgen::JsCast;
use web_sys as web;

fn js_err(e: wasm_bindgen::JsValue) -> SessionError {
    SessionError::Navigation(format!("{:?}", e))
}

/// Hands models to Scene Viewer (intent navigation) and Quick Look
/// (`rel="ar"` anchor click).
#[derive(Default)]
pub struct BrowserLauncher;

impl NativeLauncher for BrowserLauncher {
    fn page_url(&self) -> String {
        web::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default()
    }

    fn navigate(&self, url: &str) -> Result<(), SessionError> {
        let window = web::window().ok_or_else(|| SessionError::Navigation("no window".into()))?;
        window.location().set_href(url).map_err(js_err)
    }

    fn open_quick_look(&self, href: &str) -> Result<(), SessionError> {
        let document = crate::dom::window_document()
            .ok_or_else(|| SessionError::Navigation("no document".into()))?;
        let anchor: web::HtmlAnchorElement = document
            .create_element("a")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| SessionError::Navigation("anchor element".into()))?;
        anchor.set_rel("ar");
        anchor.set_href(href);
        // Quick Look only honours anchors wrapping an image.
        let img = document.create_element("img").map_err(js_err)?;
        anchor.append_child(&img).map_err(js_err)?;
        anchor.click();
        Ok(())
    }

    fn supports_quick_look(&self) -> bool {
        crate::dom::window_document()
            .and_then(|d| d.create_element("a").ok())
            .and_then(|a| a.dyn_into::<web::HtmlAnchorElement>().ok())
            .and_then(|a| a.rel_list().supports("ar").ok())
            .unwrap_or(false)
    }
}
