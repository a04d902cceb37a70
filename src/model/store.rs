//! Gesture Model
//!
//! A labeled sample store with nearest-neighbor classification. There is no
//! training phase: adding a sample IS training, which is what makes
//! sub-five-minute personalization possible. Classification is a linear scan
//! over squared Euclidean distances; training sets are tens of samples, so
//! an index structure would cost more than it saves.

use crate::features::normalizer::FeatureVector;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

/// Current model file format version
pub const CURRENT_FORMAT_VERSION: &str = "1.0";

/// Default neighbor count. Small because per-label sample counts are small
/// (10-20 examples per gesture).
pub const DEFAULT_K: usize = 5;

/// One labeled training example. Never mutated after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// Normalized feature vector
    pub features: FeatureVector,
    /// Gesture label this example demonstrates
    pub label: String,
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMetadata {
    /// Unique model ID
    pub id: Uuid,
    /// Model creation time
    pub created_at: DateTime<Utc>,
    /// Feature dimensionality shared by every sample (0 until first add)
    pub feature_dim: usize,
    /// Version of the model file format
    pub format_version: String,
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            feature_dim: 0,
            format_version: CURRENT_FORMAT_VERSION.to_string(),
        }
    }
}

/// The active gesture model: an append-only collection of labeled samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureModel {
    /// Model metadata
    pub metadata: ModelMetadata,
    /// All training samples, in insertion order
    samples: Vec<Sample>,
}

impl GestureModel {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self {
            metadata: ModelMetadata::default(),
            samples: Vec::new(),
        }
    }

    /// Append a labeled sample.
    ///
    /// The first sample fixes the model's feature dimensionality; every
    /// later sample must match it or the call fails with
    /// [`Error::DimensionMismatch`]. No other validation is performed;
    /// classification confidence at inference time is the only feedback on
    /// sample quality.
    pub fn add_sample(&mut self, features: FeatureVector, label: impl Into<String>) -> Result<()> {
        if self.samples.is_empty() {
            self.metadata.feature_dim = features.len();
        } else if features.len() != self.metadata.feature_dim {
            return Err(Error::DimensionMismatch {
                expected: self.metadata.feature_dim,
                actual: features.len(),
            });
        }
        self.samples.push(Sample {
            features,
            label: label.into(),
        });
        Ok(())
    }

    /// Classify a query vector by k-nearest-neighbor vote.
    ///
    /// Returns `(label, confidence)` where confidence is the fraction of the
    /// `min(k, sample count)` nearest neighbors carrying the winning label.
    /// Ties between labels with equal votes go to the label of the single
    /// nearest neighbor among the tied labels. Deterministic: identical
    /// model, query, and k always produce the same result.
    pub fn classify(&self, query: &[f32], k: usize) -> Result<(String, f32)> {
        if self.samples.is_empty() {
            return Err(Error::EmptyModel);
        }
        if query.len() != self.metadata.feature_dim {
            return Err(Error::DimensionMismatch {
                expected: self.metadata.feature_dim,
                actual: query.len(),
            });
        }
        let k = k.max(1).min(self.samples.len());

        // Distance to every sample; insertion index breaks distance ties so
        // the sort (and therefore the vote) is deterministic.
        let mut ranked: Vec<(f32, usize)> = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, s)| (squared_distance(query, &s.features), i))
            .collect();
        ranked.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.cmp(&b.1)));

        let neighbors = &ranked[..k];

        // Vote, remembering each label's best (nearest) rank for tie-breaks.
        let mut votes: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for (rank, &(_, idx)) in neighbors.iter().enumerate() {
            let entry = votes
                .entry(self.samples[idx].label.as_str())
                .or_insert((0, rank));
            entry.0 += 1;
        }

        let (label, (count, _)) = votes
            .into_iter()
            .max_by(|a, b| {
                // More votes wins; equal votes go to the nearer neighbor
                // (smaller best rank).
                a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1))
            })
            .expect("neighbors is non-empty");

        Ok((label.to_string(), count as f32 / k as f32))
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the model holds no samples yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Distinct labels in insertion-independent (sorted) order.
    pub fn labels(&self) -> Vec<String> {
        self.label_counts().into_keys().collect()
    }

    /// Per-label sample counts, for training-progress display.
    pub fn label_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for sample in &self.samples {
            *counts.entry(sample.label.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Save the model to a file.
    ///
    /// Writes to `<path>.tmp` and renames into place, so a failed save never
    /// corrupts an existing model file and the in-memory model is untouched
    /// either way.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp_path = path.with_extension("json.tmp");
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load a model from a file.
    ///
    /// Logs a warning if the file was saved with an unknown format version,
    /// but still attempts to deserialize it (forward-compatible via
    /// `#[serde(default)]` on the metadata).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let model: GestureModel = serde_json::from_str(&content)?;
        if model.metadata.format_version != CURRENT_FORMAT_VERSION {
            tracing::warn!(
                id = %model.metadata.id,
                found = %model.metadata.format_version,
                expected = CURRENT_FORMAT_VERSION,
                "Model has different format version; some fields may use default values"
            );
        }
        model.check_consistency()?;
        Ok(model)
    }

    /// Verify every sample matches the metadata dimensionality. A model that
    /// fails this check would misclassify silently, so it is rejected at
    /// load time instead.
    fn check_consistency(&self) -> Result<()> {
        for sample in &self.samples {
            if sample.features.len() != self.metadata.feature_dim {
                return Err(Error::DimensionMismatch {
                    expected: self.metadata.feature_dim,
                    actual: sample.features.len(),
                });
            }
        }
        Ok(())
    }
}

impl Default for GestureModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Squared Euclidean distance. Ordering-equivalent to Euclidean distance,
/// without the sqrt in the per-frame hot loop.
fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
