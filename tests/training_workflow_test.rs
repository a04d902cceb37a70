//! Training Workflow Tests
//!
//! Drives a full training session over the in-band stream protocol:
//! frames and control signals interleaved on one JSONL input, producing a
//! model that the control pipeline then uses to recognize the trained pose.

use handctl::app::config::Config;
use handctl::control::arbiter::ControlMode;
use handctl::control::pipeline::{ActionCommand, ControlPipeline};
use handctl::landmark::types::{index, Handedness, Landmark, LandmarkSet, LANDMARK_COUNT};
use handctl::model::store::GestureModel;
use handctl::stream::source::{ControlSignal, FrameSource, StreamMessage};
use handctl::time::clock::Timestamp;
use handctl::training::recorder::TrainingRecorder;
use handctl::FrameObservation;
use std::io::Cursor;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn make_hand(tip_x: f32, curl: f32) -> LandmarkSet {
    let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
    for (i, lm) in landmarks.iter_mut().enumerate() {
        lm.x = tip_x + (i as f32) * 0.004;
        lm.y = 0.8 - (i as f32) * 0.02 + curl * (i as f32) * 0.005;
        lm.z = curl * 0.002;
    }
    landmarks[index::THUMB_TIP] = Landmark::new(tip_x - 0.25, 0.5, 0.0);
    LandmarkSet::new(landmarks, Handedness::Right)
}

fn frame_line(ms: u64, hands: Vec<LandmarkSet>) -> String {
    let obs = FrameObservation::new(Timestamp::from_millis(ms), hands);
    serde_json::to_string(&StreamMessage::Frame(obs)).unwrap()
}

fn signal_line(signal: ControlSignal) -> String {
    serde_json::to_string(&StreamMessage::Control(signal)).unwrap()
}

/// Run a training session over a prepared JSONL input, the way the train
/// command does.
fn run_session(input: &str, recorder: &mut TrainingRecorder, config: &Config) {
    let mut source = FrameSource::new(Cursor::new(input.to_string()));
    let mut current_hand: Option<LandmarkSet> = None;

    while let Some(message) = source.next_message().unwrap() {
        match message {
            StreamMessage::Frame(obs) => {
                let best = obs
                    .hands
                    .iter()
                    .filter(|h| {
                        h.is_plausible(config.detector.min_hand_span, config.detector.max_hand_depth)
                    })
                    .max_by(|a, b| a.span().partial_cmp(&b.span()).unwrap());
                if let Some(hand) = best {
                    current_hand = Some(hand.clone());
                }
            }
            StreamMessage::Control(ControlSignal::SelectLabel { label }) => {
                recorder.select_label(&label).unwrap();
            }
            StreamMessage::Control(ControlSignal::CaptureSample) => {
                if let Some(hand) = &current_hand {
                    recorder.capture(hand).unwrap();
                }
            }
            StreamMessage::Control(ControlSignal::SaveModel) => {}
        }
    }
}

// ============================================================================
// Session Tests
// ============================================================================

#[test]
fn test_two_label_session_end_to_end() {
    let config = Config::default();
    let mut input = String::new();

    // Teach "open" from five slightly different frames.
    input.push_str(&signal_line(ControlSignal::SelectLabel { label: "open".into() }));
    input.push('\n');
    for i in 0..5u64 {
        input.push_str(&frame_line(i * 33, vec![make_hand(0.4 + i as f32 * 0.002, 0.0)]));
        input.push('\n');
        input.push_str(&signal_line(ControlSignal::CaptureSample));
        input.push('\n');
    }

    // Then "curl" from five frames of a bent pose.
    input.push_str(&signal_line(ControlSignal::SelectLabel { label: "curl".into() }));
    input.push('\n');
    for i in 5..10u64 {
        input.push_str(&frame_line(i * 33, vec![make_hand(0.4, 8.0)]));
        input.push('\n');
        input.push_str(&signal_line(ControlSignal::CaptureSample));
        input.push('\n');
    }

    let mut recorder = TrainingRecorder::new();
    run_session(&input, &mut recorder, &config);

    let counts = recorder.label_counts();
    assert_eq!(counts.get("open"), Some(&5));
    assert_eq!(counts.get("curl"), Some(&5));

    // The trained model drives the live pipeline and recognizes the pose.
    let model = recorder.into_model();
    let mut pipeline_config = Config::default();
    pipeline_config.arbiter.debounce_frames = 1;
    let mut pipeline = ControlPipeline::new(model, &pipeline_config);

    let f = pipeline.process(&FrameObservation::new(
        Timestamp::from_millis(1000),
        vec![make_hand(0.6, 0.0), make_hand(0.2, 0.0)],
    ));
    assert_eq!(f.mode, ControlMode::Gesture);
    let gesture = f.gesture.expect("pose should classify");
    assert_eq!(gesture.label, "open");
    assert!(gesture.confidence >= 0.6);
    assert!(f
        .commands
        .contains(&ActionCommand::TriggerGesture { label: "open".into() }));
}

#[test]
fn test_capture_uses_most_recent_hand() {
    let config = Config::default();
    let mut input = String::new();

    input.push_str(&signal_line(ControlSignal::SelectLabel { label: "pose".into() }));
    input.push('\n');
    // Several frames pass before the capture trigger arrives.
    for i in 0..4u64 {
        input.push_str(&frame_line(i * 33, vec![make_hand(0.3 + i as f32 * 0.05, 0.0)]));
        input.push('\n');
    }
    input.push_str(&signal_line(ControlSignal::CaptureSample));
    input.push('\n');

    let mut recorder = TrainingRecorder::new();
    run_session(&input, &mut recorder, &config);
    assert_eq!(recorder.sample_count(), 1);
}

#[test]
fn test_frames_without_hands_are_not_capturable() {
    let config = Config::default();
    let mut input = String::new();

    input.push_str(&signal_line(ControlSignal::SelectLabel { label: "pose".into() }));
    input.push('\n');
    input.push_str(&frame_line(0, vec![]));
    input.push('\n');

    let mut recorder = TrainingRecorder::new();
    run_session(&input, &mut recorder, &config);
    // No usable hand was ever seen, so nothing could have been captured.
    assert_eq!(recorder.sample_count(), 0);
}

#[test]
fn test_session_extends_saved_model() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("model.json");
    let config = Config::default();

    // First session: one label, saved to disk.
    let mut first = TrainingRecorder::new();
    let mut input = String::new();
    input.push_str(&signal_line(ControlSignal::SelectLabel { label: "open".into() }));
    input.push('\n');
    input.push_str(&frame_line(0, vec![make_hand(0.4, 0.0)]));
    input.push('\n');
    input.push_str(&signal_line(ControlSignal::CaptureSample));
    input.push('\n');
    run_session(&input, &mut first, &config);
    first.save(&path).unwrap();

    // Second session appends a new label to the loaded model.
    let loaded = GestureModel::load(&path).unwrap();
    let mut second = TrainingRecorder::with_model(loaded);
    let mut input = String::new();
    input.push_str(&signal_line(ControlSignal::SelectLabel { label: "curl".into() }));
    input.push('\n');
    input.push_str(&frame_line(0, vec![make_hand(0.4, 8.0)]));
    input.push('\n');
    input.push_str(&signal_line(ControlSignal::CaptureSample));
    input.push('\n');
    run_session(&input, &mut second, &config);

    let counts = second.label_counts();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts.get("open"), Some(&1));
    assert_eq!(counts.get("curl"), Some(&1));
}
