//! Model Persistence Tests
//!
//! Save/load behavior of trained models:
//! - Roundtrips preserve classification behavior exactly
//! - Saves never corrupt an existing model file
//! - Malformed and mismatched files fail loudly at load time

use handctl::features::normalizer::{Normalizer, FEATURE_DIM};
use handctl::landmark::types::{Handedness, Landmark, LandmarkSet, LANDMARK_COUNT};
use handctl::model::store::GestureModel;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn make_hand(offset: f32) -> LandmarkSet {
    let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
    for (i, lm) in landmarks.iter_mut().enumerate() {
        lm.x = offset + (i as f32) * 0.01;
        lm.y = 0.5 + (i as f32) * 0.015;
        lm.z = (i as f32) * 0.001;
    }
    LandmarkSet::new(landmarks, Handedness::Right)
}

/// A model with two distinguishable gestures.
fn make_two_label_model() -> GestureModel {
    let normalizer = Normalizer::new();
    let mut model = GestureModel::new();
    for i in 0..6 {
        let near = normalizer.normalize(&make_hand(0.1 + i as f32 * 0.002)).unwrap();
        model.add_sample(near, "open").unwrap();

        let mut fist = make_hand(0.5);
        // Curl the fingertips toward the palm to change the pose shape.
        for lm in fist.landmarks.iter_mut().skip(4) {
            lm.y -= 0.1;
            lm.z += 0.05;
        }
        let far = normalizer.normalize(&fist).unwrap();
        model.add_sample(far, "fist").unwrap();
    }
    model
}

// ============================================================================
// Roundtrip
// ============================================================================

#[test]
fn test_roundtrip_preserves_classification() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("model.json");

    let model = make_two_label_model();
    model.save(&path).expect("Failed to save model");
    let loaded = GestureModel::load(&path).expect("Failed to load model");

    assert_eq!(loaded.len(), model.len());
    assert_eq!(loaded.labels(), model.labels());
    assert_eq!(loaded.metadata.feature_dim, FEATURE_DIM);

    // Identical query, identical verdict.
    let normalizer = Normalizer::new();
    let query = normalizer.normalize(&make_hand(0.1)).unwrap();
    let before = model.classify(&query, 5).unwrap();
    let after = loaded.classify(&query, 5).unwrap();
    assert_eq!(before, after);
    assert_eq!(before.0, "open");
}

#[test]
fn test_metadata_survives_roundtrip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("model.json");

    let model = make_two_label_model();
    model.save(&path).unwrap();
    let loaded = GestureModel::load(&path).unwrap();

    assert_eq!(loaded.metadata.id, model.metadata.id);
    assert_eq!(loaded.metadata.created_at, model.metadata.created_at);
    assert_eq!(loaded.metadata.format_version, model.metadata.format_version);
}

#[test]
fn test_save_into_missing_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("deep").join("nested").join("model.json");

    make_two_label_model().save(&path).expect("Failed to save model");
    assert!(path.exists());
}

// ============================================================================
// Failure Modes
// ============================================================================

#[test]
fn test_failed_save_leaves_existing_file_intact() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("model.json");

    let original = make_two_label_model();
    original.save(&path).unwrap();
    let bytes_before = std::fs::read(&path).unwrap();

    // A save that cannot complete (target directory replaced by a file on
    // the rename path) must not clobber the original.
    let bad_path = temp_dir.path().join("model.json").join("impossible.json");
    let second = GestureModel::new();
    assert!(second.save(&bad_path).is_err());

    let bytes_after = std::fs::read(&path).unwrap();
    assert_eq!(bytes_before, bytes_after);
}

#[test]
fn test_load_missing_file_fails() {
    let result = GestureModel::load(std::path::Path::new("/tmp/handctl_missing_98765.json"));
    assert!(result.is_err());
}

#[test]
fn test_load_malformed_json_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("garbage.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(GestureModel::load(&path).is_err());
}

#[test]
fn test_load_rejects_mixed_dimensions() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("mixed.json");

    // Hand-edited file with inconsistent sample dimensions.
    let json = serde_json::json!({
        "metadata": {
            "id": "00000000-0000-0000-0000-000000000000",
            "created_at": "2026-01-01T00:00:00Z",
            "feature_dim": 3,
            "format_version": "1.0",
        },
        "samples": [
            { "features": [0.0, 0.0, 0.0], "label": "a" },
            { "features": [0.0, 0.0], "label": "b" },
        ],
    });
    std::fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();
    assert!(GestureModel::load(&path).is_err());
}

#[test]
fn test_load_unknown_format_version_still_loads() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("future.json");

    let mut model = make_two_label_model();
    model.metadata.format_version = "9.9".to_string();
    model.save(&path).unwrap();

    // Logged as a warning, not an error.
    let loaded = GestureModel::load(&path).expect("future version should still load");
    assert_eq!(loaded.len(), model.len());
}

// ============================================================================
// Classification Invariants
// ============================================================================

#[test]
fn test_classify_rejects_wrong_dimension_query() {
    let model = make_two_label_model();
    let result = model.classify(&vec![0.0; 7], 5);
    assert!(result.is_err());
}

#[test]
fn test_classify_empty_model_fails() {
    let model = GestureModel::new();
    let result = model.classify(&vec![0.0; FEATURE_DIM], 5);
    assert!(result.is_err());
}

#[test]
fn test_k_larger_than_sample_count_is_clamped() {
    let mut model = GestureModel::new();
    model.add_sample(vec![0.0; FEATURE_DIM], "only").unwrap();
    model.add_sample(vec![0.1; FEATURE_DIM], "only").unwrap();

    let (label, confidence) = model.classify(&vec![0.0; FEATURE_DIM], 50).unwrap();
    assert_eq!(label, "only");
    assert_eq!(confidence, 1.0);
}
