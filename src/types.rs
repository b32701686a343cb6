//! Core types for the pose-ethogram pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: joint frames on the way in, confidence vectors inside the
//! classifier, and classification records on the way out.

use serde::{Deserialize, Serialize};

/// Behaviour categories in the ethogram.
///
/// Declaration order doubles as the tie-break order: when two categories end
/// up with identical confidence, the earlier-declared one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    Sitting,
    Walking,
    Climbing,
}

impl Behavior {
    /// All behaviours in declaration (tie-break) order.
    pub const ALL: [Behavior; 3] = [Behavior::Sitting, Behavior::Walking, Behavior::Climbing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::Sitting => "sitting",
            Behavior::Walking => "walking",
            Behavior::Climbing => "climbing",
        }
    }

    /// Case-insensitive parse, for comparing against ground-truth tables that
    /// capitalize freely.
    pub fn from_folded(s: &str) -> Option<Behavior> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sitting" => Some(Behavior::Sitting),
            "walking" => Some(Behavior::Walking),
            "climbing" => Some(Behavior::Climbing),
            _ => None,
        }
    }
}

/// Final per-frame label: a behaviour, or `unknown` when the winning
/// confidence fell below the classification threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Sitting,
    Walking,
    Climbing,
    Unknown,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Sitting => "sitting",
            Label::Walking => "walking",
            Label::Climbing => "climbing",
            Label::Unknown => "unknown",
        }
    }

    /// The behaviour this label names, if any.
    pub fn behavior(&self) -> Option<Behavior> {
        match self {
            Label::Sitting => Some(Behavior::Sitting),
            Label::Walking => Some(Behavior::Walking),
            Label::Climbing => Some(Behavior::Climbing),
            Label::Unknown => None,
        }
    }
}

impl From<Behavior> for Label {
    fn from(b: Behavior) -> Self {
        match b {
            Behavior::Sitting => Label::Sitting,
            Behavior::Walking => Label::Walking,
            Behavior::Climbing => Label::Climbing,
        }
    }
}

/// A 2D coordinate in image pixel space. Missing data is NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A fully-missing coordinate.
    pub fn missing() -> Self {
        Self {
            x: f64::NAN,
            y: f64::NAN,
        }
    }
}

/// One input row: every tracked joint of the subject for a single video frame.
///
/// Validated once at ingestion, so the scoring rules can read any joint
/// without a missing-key path. Coordinates that could not be parsed are NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointFrame {
    pub head: Point,
    pub chest: Point,
    pub torso: Point,
    pub left_shoulder: Point,
    pub left_elbow: Point,
    pub left_hand: Point,
    pub right_shoulder: Point,
    pub right_elbow: Point,
    pub right_hand: Point,
    pub left_hip: Point,
    pub left_knee: Point,
    pub left_foot: Point,
    pub right_hip: Point,
    pub right_knee: Point,
    pub right_foot: Point,
}

/// Per-behaviour confidence scores.
///
/// Raw scores are sums of independent rule weights, each in [0, 100]. After
/// [`ConfidenceVector::normalize`] the three values sum to 100, unless every
/// raw score was zero, in which case they are left untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceVector {
    pub sitting: f64,
    pub walking: f64,
    pub climbing: f64,
}

impl ConfidenceVector {
    pub fn get(&self, behavior: Behavior) -> f64 {
        match behavior {
            Behavior::Sitting => self.sitting,
            Behavior::Walking => self.walking,
            Behavior::Climbing => self.climbing,
        }
    }

    /// Rescale the three scores to sum to 100. Skipped entirely when the raw
    /// sum is zero rather than dividing by it.
    pub fn normalize(&mut self) {
        let total = self.sitting + self.walking + self.climbing;
        if total > 0.0 {
            self.sitting = self.sitting / total * 100.0;
            self.walking = self.walking / total * 100.0;
            self.climbing = self.climbing / total * 100.0;
        }
    }

    /// The highest-confidence behaviour and its score. Ties go to the
    /// earlier-declared behaviour.
    pub fn argmax(&self) -> (Behavior, f64) {
        let mut best = Behavior::ALL[0];
        let mut best_value = self.get(best);
        for behavior in &Behavior::ALL[1..] {
            let value = self.get(*behavior);
            if value > best_value {
                best = *behavior;
                best_value = value;
            }
        }
        (best, best_value)
    }
}

/// Output unit for one frame. Created once, never mutated.
///
/// Serialized column names match the output table contract consumed by the
/// accuracy and overlay collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// 1-based video frame number.
    #[serde(rename = "Frame")]
    pub frame: u32,
    #[serde(rename = "Sitting")]
    pub sitting: f64,
    #[serde(rename = "Walking")]
    pub walking: f64,
    #[serde(rename = "Climbing")]
    pub climbing: f64,
    #[serde(rename = "Classified Behavior")]
    pub label: Label,
    /// Post-normalization confidence of the argmax category, kept even when
    /// the label was demoted to `unknown`.
    #[serde(rename = "Confidence")]
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn behavior_declaration_order() {
        assert_eq!(
            Behavior::ALL,
            [Behavior::Sitting, Behavior::Walking, Behavior::Climbing]
        );
    }

    #[test]
    fn behavior_case_folded_parse() {
        assert_eq!(Behavior::from_folded("Sitting"), Some(Behavior::Sitting));
        assert_eq!(Behavior::from_folded("WALKING"), Some(Behavior::Walking));
        assert_eq!(Behavior::from_folded(" climbing "), Some(Behavior::Climbing));
        assert_eq!(Behavior::from_folded("unknown"), None);
        assert_eq!(Behavior::from_folded("swinging"), None);
    }

    #[test]
    fn normalize_scales_to_100() {
        let mut v = ConfidenceVector {
            sitting: 100.0,
            walking: 0.0,
            climbing: 30.0,
        };
        v.normalize();
        assert!((v.sitting + v.walking + v.climbing - 100.0).abs() < 1e-9);
        assert!((v.sitting - 100.0 / 130.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_skips_all_zero() {
        let mut v = ConfidenceVector {
            sitting: 0.0,
            walking: 0.0,
            climbing: 0.0,
        };
        v.normalize();
        assert_eq!(v.sitting, 0.0);
        assert_eq!(v.walking, 0.0);
        assert_eq!(v.climbing, 0.0);
    }

    #[test]
    fn argmax_tie_goes_to_earlier_declared() {
        let v = ConfidenceVector {
            sitting: 50.0,
            walking: 50.0,
            climbing: 0.0,
        };
        assert_eq!(v.argmax(), (Behavior::Sitting, 50.0));

        let v = ConfidenceVector {
            sitting: 0.0,
            walking: 50.0,
            climbing: 50.0,
        };
        assert_eq!(v.argmax(), (Behavior::Walking, 50.0));
    }

    #[test]
    fn label_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Label::Unknown).unwrap(), "\"unknown\"");
        assert_eq!(serde_json::to_string(&Label::Sitting).unwrap(), "\"sitting\"");
    }
}
