//! Platform detection from the browser's user agent.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceProfile {
    pub android: bool,
    pub ios: bool,
    pub firefox: bool,
    pub oculus: bool,
}

impl DeviceProfile {
    /// `max_touch_points` distinguishes iPadOS, which reports a desktop
    /// Safari user agent.
    pub fn from_user_agent(ua: &str, max_touch_points: u32) -> Self {
        let ipados = ua.contains("Macintosh") && max_touch_points > 1;
        Self {
            android: ua.contains("Android"),
            ios: ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod") || ipados,
            firefox: ua.contains("Firefox") || ua.contains("FxiOS"),
            oculus: ua.contains("OculusBrowser"),
        }
    }

    pub fn supports_scene_viewer(&self) -> bool {
        self.android && !self.firefox && !self.oculus
    }

    pub fn supports_quick_look(&self) -> bool {
        self.ios
    }
}
