//! Viewer attributes that shape an AR session.

use crate::constants::{DEADZONE_SIZE, MAX_SCALE, MIN_SCALE, SWIRL_DEFAULT_SCALE};
use crate::error::ConfigError;
use crate::placement::PlacementOptions;
use crate::session::SessionKind;
use std::str::FromStr;

pub const DEFAULT_AR_MODES: &str = "webxr scene-viewer quick-look";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    Floor,
    Wall,
    /// Float in front of the camera instead of resting on a surface.
    Hover,
}

impl Placement {
    pub fn is_vertical(self) -> bool {
        matches!(self, Placement::Wall)
    }
}

impl FromStr for Placement {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "floor" => Ok(Placement::Floor),
            "wall" => Ok(Placement::Wall),
            "hover" => Ok(Placement::Hover),
            other => Err(ConfigError::UnknownPlacement(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArScale {
    #[default]
    Auto,
    Fixed,
}

impl FromStr for ArScale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "auto" => Ok(ArScale::Auto),
            "fixed" => Ok(ArScale::Fixed),
            other => Err(ConfigError::UnknownScale(other.to_string())),
        }
    }
}

/// Parse a whitespace-separated priority list, skipping unknown tokens and
/// repeats.
pub fn parse_modes(modes: &str) -> Vec<SessionKind> {
    let mut out = Vec::new();
    for token in modes.split_whitespace() {
        match token.parse::<SessionKind>() {
            Ok(kind) if !out.contains(&kind) => out.push(kind),
            Ok(_) => {}
            Err(e) => log::warn!("[config] {}", e),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArConfig {
    pub modes: Vec<SessionKind>,
    pub placement: Placement,
    pub scale: ArScale,
    pub src: String,
    pub ios_src: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub min_scale: f32,
    pub max_scale: f32,
    pub deadzone_size: f32,
    pub swirl_scale: f32,
}

impl Default for ArConfig {
    fn default() -> Self {
        Self {
            modes: parse_modes(DEFAULT_AR_MODES),
            placement: Placement::Floor,
            scale: ArScale::Auto,
            src: String::new(),
            ios_src: None,
            title: None,
            link: None,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            deadzone_size: DEADZONE_SIZE,
            swirl_scale: SWIRL_DEFAULT_SCALE,
        }
    }
}

impl ArConfig {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }

    pub fn with_modes(mut self, modes: &str) -> Self {
        self.modes = parse_modes(modes);
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_scale(mut self, scale: ArScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_ios_src(mut self, src: impl Into<String>) -> Self {
        self.ios_src = Some(src.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn set_scale_range(&mut self, min: f32, max: f32) -> Result<(), ConfigError> {
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min > max {
            return Err(ConfigError::InvalidScale { min, max });
        }
        self.min_scale = min;
        self.max_scale = max;
        Ok(())
    }

    pub fn is_vertical(&self) -> bool {
        self.placement.is_vertical()
    }

    pub fn scale_enabled(&self) -> bool {
        self.scale == ArScale::Auto
    }

    pub fn to_placement_options(&self) -> PlacementOptions {
        PlacementOptions {
            deadzone_size: self.deadzone_size,
            scale_enabled: self.scale_enabled(),
            min_scale: self.min_scale,
            max_scale: self.max_scale,
            swirl_scale: self.swirl_scale,
        }
    }
}
