//! Frame classifier orchestration
//!
//! Drives the scoring rules over an ordered frame sequence: per frame, score
//! all three behaviours, normalize the scores to sum to 100, pick the winner,
//! and demote it to `unknown` below the classification threshold.
//!
//! Classification is strictly sequential over the raw input sequence. Each
//! frame's velocity terms read the immediately preceding *input* frame, never
//! a previous classification result, so there is no feedback from past labels
//! and reclassifying the same table always yields an identical stream.

use crate::rules;
use crate::types::{ClassificationRecord, ConfidenceVector, JointFrame, Label};

/// Below this post-normalization confidence, the winning behaviour is
/// relabeled `unknown`. Its numeric confidence is kept in the output record.
pub const UNKNOWN_THRESHOLD: f64 = 40.0;

/// Score one frame against every behaviour and normalize the result.
///
/// # Panics
///
/// Panics if `index` is out of bounds for `frames`.
pub fn score_frame(frames: &[JointFrame], index: usize) -> ConfidenceVector {
    debug_assert!(index < frames.len(), "frame index out of bounds");
    let current = &frames[index];
    let previous = if index > 0 {
        Some(&frames[index - 1])
    } else {
        None
    };

    let mut confidences = ConfidenceVector {
        sitting: rules::score_sitting(current, previous),
        walking: rules::score_walking(current, previous),
        climbing: rules::score_climbing(current, previous),
    };
    confidences.normalize();
    confidences
}

/// Resolve a normalized confidence vector to a label.
///
/// The argmax category wins, ties going to the earlier-declared behaviour.
/// Below [`UNKNOWN_THRESHOLD`] the label is forced to `unknown` while the
/// argmax confidence value is returned unchanged.
pub fn resolve_label(confidences: &ConfidenceVector) -> (Label, f64) {
    let (behavior, confidence) = confidences.argmax();
    if confidence < UNKNOWN_THRESHOLD {
        (Label::Unknown, confidence)
    } else {
        (behavior.into(), confidence)
    }
}

/// Classify the frame at `index`, with the immediately preceding frame as the
/// velocity reference when one exists. Frame numbering is 1-based.
///
/// # Panics
///
/// Panics if `index` is out of bounds for `frames`.
pub fn classify_frame(frames: &[JointFrame], index: usize) -> ClassificationRecord {
    let confidences = score_frame(frames, index);
    let (label, confidence) = resolve_label(&confidences);

    ClassificationRecord {
        frame: (index + 1) as u32,
        sitting: confidences.sitting,
        walking: confidences.walking,
        climbing: confidences.climbing,
        label,
        confidence,
    }
}

/// Classify every frame in order. An empty sequence yields an empty stream.
pub fn classify_all(frames: &[JointFrame]) -> Vec<ClassificationRecord> {
    (0..frames.len())
        .map(|index| classify_frame(frames, index))
        .collect()
}
