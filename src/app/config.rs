//! Configuration Management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[derive(Default)]
pub struct Config {
    /// Hand plausibility filtering
    pub detector: DetectorConfig,
    /// Gesture classifier settings
    pub classifier: ClassifierConfig,
    /// Confidence gate and cooldown
    pub gate: GateConfig,
    /// Pointer mode settings
    pub pointer: PointerConfig,
    /// Mode switching settings
    #[serde(default)]
    pub arbiter: ArbiterConfig,
}

/// Detector plausibility configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum wrist-to-middle-fingertip span for a hand to count
    pub min_hand_span: f32,
    /// Maximum absolute wrist depth for a hand to count
    pub max_hand_depth: f32,
}

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Neighbors consulted per classification
    pub k: usize,
    /// Path to the trained model file
    pub model_path: PathBuf,
}

/// Gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Minimum confidence to forward a gesture event
    pub confidence_threshold: f32,
    /// Per-label cooldown between forwarded events (ms)
    pub cooldown_ms: u64,
}

/// Pointer mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerConfig {
    /// Exponential smoothing factor, in (0, 1]
    pub smoothing_alpha: f32,
    /// Tracking zone lower bound (camera-normalized)
    pub zone_min: f32,
    /// Tracking zone upper bound (camera-normalized)
    pub zone_max: f32,
    /// Minimum normalized cursor movement to emit
    pub movement_threshold: f32,
    /// Thumb-to-index distance below which the hand is pinching
    pub pinch_threshold: f32,
    /// Minimum gap between pinch clicks (ms)
    pub click_cooldown_ms: u64,
}

/// Arbiter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbiterConfig {
    /// Consecutive frames a new mode must persist before committing
    pub debounce_frames: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_hand_span: 0.15,
            max_hand_depth: 0.1,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            k: crate::model::store::DEFAULT_K,
            model_path: dirs::home_dir()
                .map(|h| h.join(".handctl").join("model.json"))
                .unwrap_or_else(|| PathBuf::from("model.json")),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            cooldown_ms: 2000,
        }
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.3,
            zone_min: 0.10,
            zone_max: 0.90,
            movement_threshold: 0.004,
            pinch_threshold: 0.08,
            click_cooldown_ms: 300,
        }
    }
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self { debounce_frames: 3 }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !(0.0..=1.0).contains(&self.detector.min_hand_span) {
            return Err(crate::Error::Config(format!(
                "min_hand_span must be in [0, 1], got {}", self.detector.min_hand_span
            )));
        }
        if self.detector.max_hand_depth <= 0.0 {
            return Err(crate::Error::Config(format!(
                "max_hand_depth must be > 0, got {}", self.detector.max_hand_depth
            )));
        }
        if self.classifier.k == 0 {
            return Err(crate::Error::Config("k must be > 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.gate.confidence_threshold) {
            return Err(crate::Error::Config(format!(
                "confidence_threshold must be in [0, 1], got {}", self.gate.confidence_threshold
            )));
        }
        if self.pointer.smoothing_alpha <= 0.0 || self.pointer.smoothing_alpha > 1.0 {
            return Err(crate::Error::Config(format!(
                "smoothing_alpha must be in (0, 1], got {}", self.pointer.smoothing_alpha
            )));
        }
        if self.pointer.zone_min >= self.pointer.zone_max {
            return Err(crate::Error::Config(format!(
                "zone_min must be below zone_max, got [{}, {}]",
                self.pointer.zone_min, self.pointer.zone_max
            )));
        }
        if !(0.0..=1.0).contains(&self.pointer.zone_min)
            || !(0.0..=1.0).contains(&self.pointer.zone_max)
        {
            return Err(crate::Error::Config(
                "tracking zone bounds must be in [0, 1]".to_string(),
            ));
        }
        if self.pointer.movement_threshold < 0.0 {
            return Err(crate::Error::Config(format!(
                "movement_threshold must be >= 0, got {}", self.pointer.movement_threshold
            )));
        }
        if self.pointer.pinch_threshold <= 0.0 {
            return Err(crate::Error::Config(format!(
                "pinch_threshold must be > 0, got {}", self.pointer.pinch_threshold
            )));
        }
        if self.arbiter.debounce_frames == 0 {
            return Err(crate::Error::Config("debounce_frames must be > 0".to_string()));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content = toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;

        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".handctl").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Read a single value by dotted key, e.g. `gate.cooldown_ms`.
    pub fn get_value(&self, key: &str) -> Result<String, crate::Error> {
        let table: toml::Value = toml::Value::try_from(self.clone())
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        let mut current = &table;
        for part in key.split('.') {
            current = current
                .get(part)
                .ok_or_else(|| crate::Error::Config(format!("unknown config key: {key}")))?;
        }
        Ok(current.to_string())
    }

    /// Set a single value by dotted key. The value is parsed as TOML, so
    /// numbers and booleans keep their types; anything unparsable is a string.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), crate::Error> {
        let mut table: toml::Value = toml::Value::try_from(self.clone())
            .map_err(|e| crate::Error::Config(e.to_string()))?;

        let parts: Vec<&str> = key.split('.').collect();
        let (last, path) = parts
            .split_last()
            .ok_or_else(|| crate::Error::Config("empty config key".to_string()))?;

        let mut current = &mut table;
        for part in path {
            current = current
                .get_mut(*part)
                .ok_or_else(|| crate::Error::Config(format!("unknown config key: {key}")))?;
        }
        let slot = current
            .get_mut(*last)
            .ok_or_else(|| crate::Error::Config(format!("unknown config key: {key}")))?;

        *slot = if let Ok(i) = value.parse::<i64>() {
            toml::Value::Integer(i)
        } else if let Ok(f) = value.parse::<f64>() {
            toml::Value::Float(f)
        } else if let Ok(b) = value.parse::<bool>() {
            toml::Value::Boolean(b)
        } else {
            toml::Value::String(value.to_string())
        };

        let updated: Config = table
            .try_into()
            .map_err(|e: toml::de::Error| crate::Error::Config(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
