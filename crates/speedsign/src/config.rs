//! Pipeline configuration.

use std::path::Path;

use crate::circle::CircleRansacConfig;
use crate::color::ColorConfig;
use crate::edges::EdgeConfig;
use crate::roi::RoiConfig;
use crate::signs::SignConfig;

/// All tunables of the frame pipeline. Every field has a default, so a JSON
/// file only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub roi: RoiConfig,
    pub color: ColorConfig,
    pub edges: EdgeConfig,
    pub circle: CircleRansacConfig,
    pub signs: SignConfig,
    /// Minimum time between two accepted signs, in seconds.
    pub cooldown_secs: f64,
}

impl PipelineConfig {
    /// Load and validate a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), String> {
        for (name, pct) in [
            ("roi.width_pct", self.roi.width_pct),
            ("roi.height_pct", self.roi.height_pct),
        ] {
            if pct > 100 {
                return Err(format!("{} must be at most 100, got {}", name, pct));
            }
        }
        let c = &self.circle;
        if c.min_radius > c.max_radius {
            return Err(format!(
                "circle.min_radius ({}) exceeds circle.max_radius ({})",
                c.min_radius, c.max_radius
            ));
        }
        if c.trial_budget == 0 {
            return Err("circle.trial_budget must be positive".to_string());
        }
        if c.stroke_width == 0 {
            return Err("circle.stroke_width must be positive".to_string());
        }
        if !c.confidence_threshold.is_finite() || c.confidence_threshold < 0.0 {
            return Err(format!(
                "circle.confidence_threshold must be a non-negative number, got {}",
                c.confidence_threshold
            ));
        }
        if !self.cooldown_secs.is_finite() || self.cooldown_secs < 0.0 {
            return Err(format!(
                "cooldown_secs must be a non-negative number, got {}",
                self.cooldown_secs
            ));
        }
        if self.edges.low_threshold > self.edges.high_threshold {
            return Err("edges.low_threshold exceeds edges.high_threshold".to_string());
        }
        Ok(())
    }

    pub fn cooldown(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.cooldown_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            roi: RoiConfig::default(),
            color: ColorConfig::default(),
            edges: EdgeConfig::default(),
            circle: CircleRansacConfig::default(),
            signs: SignConfig::default(),
            cooldown_secs: 2.0,
        }
    }
}
