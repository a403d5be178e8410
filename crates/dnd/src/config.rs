use std::time::Duration;

use gpui::{Pixels, px};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Orientation};

/// Auto-scroll knobs shared by every drop list unless overridden.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScrollConfig {
    /// Fraction of a scroll container's size, measured from each edge, in
    /// which a hovering pointer triggers scrolling.
    pub threshold: f32,
    /// Pixels scrolled per animation frame.
    pub step: f32,
    /// Number of equally sized bands the threshold is split into. Each band
    /// closer to the edge adds another `step` per frame.
    pub speed_zones: u32,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            step: 2.0,
            speed_zones: 1,
        }
    }
}

impl AutoScrollConfig {
    pub fn step_pixels(&self) -> Pixels {
        px(self.step)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 || self.threshold > 0.5 {
            return Err(ConfigError::Invalid(format!(
                "auto_scroll.threshold must be in (0, 0.5], got {}",
                self.threshold
            )));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "auto_scroll.step must be positive, got {}",
                self.step
            )));
        }
        if self.speed_zones == 0 {
            return Err(ConfigError::Invalid(
                "auto_scroll.speed_zones must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Engine-wide defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragDropConfig {
    pub orientation: Orientation,
    pub animation_duration_ms: u64,
    /// Slack added on top of `animation_duration_ms` before an awaited
    /// transition is force-resolved.
    pub settle_grace_ms: u64,
    pub auto_scroll: AutoScrollConfig,
}

impl Default for DragDropConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            animation_duration_ms: 250,
            settle_grace_ms: 100,
            auto_scroll: AutoScrollConfig::default(),
        }
    }
}

impl DragDropConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auto_scroll.validate()
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn settle_grace(&self) -> Duration {
        Duration::from_millis(self.settle_grace_ms)
    }
}

/// Per-list overrides of [`DragDropConfig`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropListConfig {
    pub orientation: Option<Orientation>,
    pub animation_duration_ms: Option<u64>,
    pub auto_scroll: Option<AutoScrollConfig>,
}

impl DropListConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn animation_duration(mut self, duration: Duration) -> Self {
        self.animation_duration_ms = Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn auto_scroll(mut self, auto_scroll: AutoScrollConfig) -> Self {
        self.auto_scroll = Some(auto_scroll);
        self
    }

    /// Checks the auto-scroll override, if any.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.auto_scroll {
            Some(auto_scroll) => auto_scroll.validate(),
            None => Ok(()),
        }
    }

    pub(crate) fn resolve(&self, defaults: &DragDropConfig) -> ResolvedListConfig {
        ResolvedListConfig {
            orientation: self.orientation.unwrap_or(defaults.orientation),
            animation_duration: self
                .animation_duration_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| defaults.animation_duration()),
            auto_scroll: self
                .auto_scroll
                .clone()
                .unwrap_or_else(|| defaults.auto_scroll.clone()),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ResolvedListConfig {
    pub orientation: Orientation,
    pub animation_duration: Duration,
    pub auto_scroll: AutoScrollConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = DragDropConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DragDropConfig::default());
        assert_eq!(config.animation_duration(), Duration::from_millis(250));
    }

    #[test]
    fn partial_json_overrides_nested_fields() {
        let config = DragDropConfig::from_json_str(
            r#"{ "orientation": "horizontal", "auto_scroll": { "speed_zones": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.orientation, Orientation::Horizontal);
        assert_eq!(config.auto_scroll.speed_zones, 3);
        assert_eq!(config.auto_scroll.threshold, 0.1);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = DragDropConfig::from_json_str(r#"{ "auto_scroll": { "threshold": 0.9 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = DragDropConfig::from_json_str("{ orientation").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn list_override_is_validated() {
        let config = DropListConfig::new().auto_scroll(AutoScrollConfig {
            threshold: 0.0,
            ..AutoScrollConfig::default()
        });
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(DropListConfig::new().validate().is_ok());
    }

    #[test]
    fn oversized_duration_saturates() {
        let config = DropListConfig::new().animation_duration(Duration::MAX);
        assert_eq!(config.animation_duration_ms, Some(u64::MAX));

        let config = DropListConfig::new().animation_duration(Duration::from_millis(180));
        assert_eq!(config.animation_duration_ms, Some(180));
    }

    #[test]
    fn list_overrides_fall_back_to_defaults() {
        let defaults = DragDropConfig::default();
        let resolved = DropListConfig::new()
            .orientation(Orientation::Horizontal)
            .resolve(&defaults);
        assert_eq!(resolved.orientation, Orientation::Horizontal);
        assert_eq!(resolved.animation_duration, defaults.animation_duration());
        assert_eq!(resolved.auto_scroll, defaults.auto_scroll);
    }
}
