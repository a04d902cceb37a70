//! Training Recorder
//!
//! Builds a gesture model from live frames. The operator selects a label,
//! then fires capture triggers while holding the pose; each trigger
//! normalizes the current primary hand and appends one sample. Capture
//! triggers arrive in-band on the frame stream, so the recorder never needs
//! its own input channel.

use crate::features::normalizer::Normalizer;
use crate::landmark::types::LandmarkSet;
use crate::model::store::GestureModel;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Interactive model builder.
#[derive(Debug)]
pub struct TrainingRecorder {
    model: GestureModel,
    normalizer: Normalizer,
    active_label: Option<String>,
}

impl TrainingRecorder {
    /// Start a session with an empty model.
    pub fn new() -> Self {
        Self::with_model(GestureModel::new())
    }

    /// Start a session extending an existing model.
    pub fn with_model(model: GestureModel) -> Self {
        Self {
            model,
            normalizer: Normalizer::new(),
            active_label: None,
        }
    }

    /// Select the label the next captures record under.
    ///
    /// Whitespace-only labels are rejected; surrounding whitespace is
    /// trimmed so `" wave "` and `"wave"` are the same gesture.
    pub fn select_label(&mut self, label: &str) -> Result<()> {
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::InvalidSample("empty gesture label".to_string()));
        }
        tracing::info!(label, "training label selected");
        self.active_label = Some(label.to_string());
        Ok(())
    }

    /// The currently selected label, if any.
    pub fn active_label(&self) -> Option<&str> {
        self.active_label.as_deref()
    }

    /// Capture one sample of `hand` under the active label.
    ///
    /// Returns the total sample count for that label after the capture.
    pub fn capture(&mut self, hand: &LandmarkSet) -> Result<usize> {
        let label = self
            .active_label
            .clone()
            .ok_or_else(|| Error::InvalidSample("no training label selected".to_string()))?;

        let features = self.normalizer.normalize(hand)?;
        self.model.add_sample(features, &label)?;

        let count = self
            .model
            .label_counts()
            .get(label.as_str())
            .copied()
            .unwrap_or(0);
        tracing::info!(%label, count, "sample captured");
        Ok(count)
    }

    /// Per-label sample counts for session feedback.
    pub fn label_counts(&self) -> BTreeMap<String, usize> {
        self.model.label_counts()
    }

    /// Total samples recorded so far.
    pub fn sample_count(&self) -> usize {
        self.model.len()
    }

    /// Persist the model being built.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.model.save(path)
    }

    /// Finish the session, yielding the model.
    pub fn into_model(self) -> GestureModel {
        self.model
    }
}

impl Default for TrainingRecorder {
    fn default() -> Self {
        Self::new()
    }
}
