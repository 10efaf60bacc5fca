//! Page configuration.
//!
//! Defaults reproduce the timings of the published page. The browser build
//! reads an optional JSON block from the page and merges it over them.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::ease::Ease;
use crate::error::{PortfolioError, Result};
use crate::section::SectionId;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub scramble: ScrambleTiming,
    pub morph: MorphConfig,
    pub wave: WaveParams,
    pub visibility: VisibilityOptions,
    /// Replacement outline descriptors, keyed by section.
    pub outlines: BTreeMap<SectionId, String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrambleTiming {
    pub shrink_delay_ms: u32,
    pub grow_delay_ms: u32,
}

impl Default for ScrambleTiming {
    fn default() -> Self {
        Self { shrink_delay_ms: 50, grow_delay_ms: 70 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MorphConfig {
    pub duration_ms: f64,
    pub ease: Ease,
    /// Resample structurally different outlines instead of cutting.
    pub normalize_incompatible: bool,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self { duration_ms: 1000.0, ease: Ease::EaseInOut, normalize_incompatible: true }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaveParams {
    pub height: u32,
    pub frequency: f64,
    pub amplitude: f64,
    /// Phase advance per frame.
    pub speed: f64,
    pub line_width: f64,
    pub stroke: String,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            height: 100,
            frequency: 0.01,
            amplitude: 20.0,
            speed: 0.02,
            line_width: 1.0,
            stroke: "white".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisibilityOptions {
    /// Fraction of a region that must be visible.
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self { threshold: 0.5, root_margin: "0px".to_string() }
    }
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: String) -> Result<()> {
            Err(PortfolioError::InvalidConfig(msg))
        }

        let t = self.visibility.threshold;
        if !(t > 0.0 && t <= 1.0) {
            return invalid(format!("visibility.threshold must be in (0, 1], got {t}"));
        }
        if self.scramble.shrink_delay_ms == 0 || self.scramble.grow_delay_ms == 0 {
            return invalid("scramble delays must be positive".into());
        }
        if !(self.morph.duration_ms.is_finite() && self.morph.duration_ms > 0.0) {
            return invalid(format!("morph.duration_ms must be positive, got {}", self.morph.duration_ms));
        }
        let w = &self.wave;
        if w.height == 0 {
            return invalid("wave.height must be positive".into());
        }
        for (name, value) in [
            ("frequency", w.frequency),
            ("amplitude", w.amplitude),
            ("speed", w.speed),
            ("line_width", w.line_width),
        ] {
            if !value.is_finite() {
                return invalid(format!("wave.{name} must be finite"));
            }
        }
        if w.line_width <= 0.0 {
            return invalid("wave.line_width must be positive".into());
        }
        Ok(())
    }
}
