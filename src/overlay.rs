//! AR status reflected on the viewer element.

use crate::constants::AR_STATUS_ATTR;
use ar_core::session::SessionEvent;
use web_sys as web;

#[inline]
pub fn set_status(el: &web::Element, status: &str) {
    _ = el.set_attribute(AR_STATUS_ATTR, status);
    let cl = el.class_list();
    if status == "session-started" {
        _ = cl.add_1("ar-presenting");
    } else {
        _ = cl.remove_1("ar-presenting");
    }
}

#[inline]
pub fn status(el: &web::Element) -> Option<String> {
    el.get_attribute(AR_STATUS_ATTR)
}

pub fn apply_event(el: &web::Element, event: SessionEvent) {
    log::info!("[ar] {:?}", event);
    if let Some(status) = event.status() {
        set_status(el, status);
    }
}
