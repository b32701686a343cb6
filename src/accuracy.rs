//! Accuracy evaluation
//!
//! Compares a classification stream against an independently supplied
//! ground-truth stream. The two tables are joined on frame number, both label
//! columns are case-folded before comparison, and the metrics are restricted
//! to the three named behaviours: joined pairs whose truth or prediction
//! falls outside that set (e.g. `unknown`) are excluded from the confusion
//! matrix and surfaced explicitly, never silently dropped. They still count
//! against overall accuracy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;

use crate::error::EthogramError;
use crate::types::{Behavior, ClassificationRecord};

/// One row of the ground-truth table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundTruthRecord {
    #[serde(rename = "Frames")]
    pub frame: u32,
    #[serde(rename = "True_Behaviour")]
    pub behavior: String,
}

/// Read a ground-truth table from CSV.
pub fn read_ground_truth_csv<R: Read>(reader: R) -> Result<Vec<GroundTruthRecord>, EthogramError> {
    let mut input = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in input.deserialize::<GroundTruthRecord>() {
        records.push(result?);
    }
    Ok(records)
}

/// Precision, recall, and F1 for one behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of joined frames whose ground truth is this behaviour.
    pub support: u32,
}

/// 3x3 confusion matrix over the behaviour set. Rows are ground truth,
/// columns are predictions, both in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfusionMatrix {
    counts: [[u32; 3]; 3],
}

impl ConfusionMatrix {
    fn new() -> Self {
        Self { counts: [[0; 3]; 3] }
    }

    fn increment(&mut self, truth: Behavior, predicted: Behavior) {
        self.counts[truth as usize][predicted as usize] += 1;
    }

    pub fn get(&self, truth: Behavior, predicted: Behavior) -> u32 {
        self.counts[truth as usize][predicted as usize]
    }

    pub fn counts(&self) -> &[[u32; 3]; 3] {
        &self.counts
    }

    /// Render as an aligned text grid, truth down the side and predictions
    /// across the top.
    pub fn render(&self) -> String {
        let width = 10;
        let mut out = String::new();
        out.push_str(&format!("{:width$}", "true\\pred", width = width));
        for behavior in Behavior::ALL {
            out.push_str(&format!("{:>width$}", behavior.as_str(), width = width));
        }
        out.push('\n');
        for truth in Behavior::ALL {
            out.push_str(&format!("{:width$}", truth.as_str(), width = width));
            for predicted in Behavior::ALL {
                out.push_str(&format!(
                    "{:>width$}",
                    self.get(truth, predicted),
                    width = width
                ));
            }
            out.push('\n');
        }
        out
    }
}

/// A joined frame whose prediction disagrees with the ground truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub frame: u32,
    pub predicted: String,
    pub actual: String,
}

/// Full evaluation result for one prediction/truth pair of streams.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Number of frames present in both streams.
    pub total_frames: usize,
    /// Fraction of joined frames classified correctly, over ALL joined
    /// frames including those outside the behaviour label space.
    pub accuracy: f64,
    /// Per-behaviour metrics, in declaration order.
    pub per_class: [(Behavior, ClassMetrics); 3],
    pub confusion: ConfusionMatrix,
    /// Joined frames whose truth or prediction is not one of the three
    /// behaviours (e.g. `unknown`); excluded from the confusion matrix.
    pub outside_label_space: usize,
    pub mismatches: Vec<Mismatch>,
}

/// Join predictions with ground truth on frame number and compute metrics.
///
/// An empty join (no overlapping frame numbers) is an error: there is
/// nothing to evaluate and continuing would report a meaningless accuracy.
pub fn evaluate(
    predictions: &[ClassificationRecord],
    truth: &[GroundTruthRecord],
) -> Result<Evaluation, EthogramError> {
    let truth_by_frame: HashMap<u32, &GroundTruthRecord> =
        truth.iter().map(|r| (r.frame, r)).collect();

    let mut total = 0usize;
    let mut correct = 0usize;
    let mut outside = 0usize;
    let mut confusion = ConfusionMatrix::new();
    let mut mismatches = Vec::new();

    for prediction in predictions {
        let Some(actual) = truth_by_frame.get(&prediction.frame) else {
            continue;
        };
        total += 1;

        let predicted_label = prediction.label.as_str();
        let actual_label = actual.behavior.trim().to_ascii_lowercase();

        if predicted_label == actual_label {
            correct += 1;
        } else {
            mismatches.push(Mismatch {
                frame: prediction.frame,
                predicted: predicted_label.to_string(),
                actual: actual_label.clone(),
            });
        }

        match (
            prediction.label.behavior(),
            Behavior::from_folded(&actual_label),
        ) {
            (Some(predicted), Some(actual)) => confusion.increment(actual, predicted),
            _ => outside += 1,
        }
    }

    if total == 0 {
        return Err(EthogramError::EvaluationError(
            "no overlapping frame numbers between predictions and ground truth".to_string(),
        ));
    }

    let per_class = Behavior::ALL.map(|behavior| {
        let metrics = class_metrics(behavior, predictions, &truth_by_frame);
        (behavior, metrics)
    });

    Ok(Evaluation {
        total_frames: total,
        accuracy: correct as f64 / total as f64,
        per_class,
        confusion,
        outside_label_space: outside,
        mismatches,
    })
}

fn class_metrics(
    behavior: Behavior,
    predictions: &[ClassificationRecord],
    truth_by_frame: &HashMap<u32, &GroundTruthRecord>,
) -> ClassMetrics {
    let mut true_positives = 0u32;
    let mut false_positives = 0u32;
    let mut false_negatives = 0u32;

    for prediction in predictions {
        let Some(actual) = truth_by_frame.get(&prediction.frame) else {
            continue;
        };
        let predicted = prediction.label.behavior();
        let actual = Behavior::from_folded(&actual.behavior);

        if predicted == Some(behavior) && actual == Some(behavior) {
            true_positives += 1;
        } else if predicted == Some(behavior) {
            false_positives += 1;
        } else if actual == Some(behavior) {
            false_negatives += 1;
        }
    }

    let precision = ratio(true_positives, true_positives + false_positives);
    let recall = ratio(true_positives, true_positives + false_negatives);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    ClassMetrics {
        precision,
        recall,
        f1,
        support: true_positives + false_negatives,
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Label;
    use pretty_assertions::assert_eq;

    fn prediction(frame: u32, label: Label) -> ClassificationRecord {
        ClassificationRecord {
            frame,
            sitting: 0.0,
            walking: 0.0,
            climbing: 0.0,
            label,
            confidence: 50.0,
        }
    }

    fn truth(frame: u32, behavior: &str) -> GroundTruthRecord {
        GroundTruthRecord {
            frame,
            behavior: behavior.to_string(),
        }
    }

    #[test]
    fn joins_on_frame_and_case_folds() {
        let predictions = vec![
            prediction(1, Label::Sitting),
            prediction(2, Label::Walking),
            prediction(3, Label::Climbing),
            prediction(9, Label::Sitting), // no ground truth for frame 9
        ];
        let truth = vec![
            truth(1, "Sitting"),
            truth(2, "WALKING"),
            truth(3, "sitting"),
            truth(7, "climbing"), // no prediction for frame 7
        ];

        let evaluation = evaluate(&predictions, &truth).unwrap();
        assert_eq!(evaluation.total_frames, 3);
        assert!((evaluation.accuracy - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(evaluation.mismatches.len(), 1);
        assert_eq!(evaluation.mismatches[0].frame, 3);
        assert_eq!(evaluation.mismatches[0].predicted, "climbing");
        assert_eq!(evaluation.mismatches[0].actual, "sitting");
    }

    #[test]
    fn confusion_matrix_counts_behaviour_pairs() {
        let predictions = vec![
            prediction(1, Label::Sitting),
            prediction(2, Label::Sitting),
            prediction(3, Label::Walking),
            prediction(4, Label::Climbing),
        ];
        let truth = vec![
            truth(1, "sitting"),
            truth(2, "walking"),
            truth(3, "walking"),
            truth(4, "sitting"),
        ];

        let evaluation = evaluate(&predictions, &truth).unwrap();
        let confusion = &evaluation.confusion;
        assert_eq!(confusion.get(Behavior::Sitting, Behavior::Sitting), 1);
        assert_eq!(confusion.get(Behavior::Walking, Behavior::Sitting), 1);
        assert_eq!(confusion.get(Behavior::Walking, Behavior::Walking), 1);
        assert_eq!(confusion.get(Behavior::Sitting, Behavior::Climbing), 1);
        assert_eq!(evaluation.outside_label_space, 0);
    }

    #[test]
    fn unknown_counts_against_accuracy_but_not_confusion() {
        let predictions = vec![
            prediction(1, Label::Unknown),
            prediction(2, Label::Sitting),
        ];
        let truth = vec![truth(1, "sitting"), truth(2, "sitting")];

        let evaluation = evaluate(&predictions, &truth).unwrap();
        assert!((evaluation.accuracy - 0.5).abs() < 1e-12);
        assert_eq!(evaluation.outside_label_space, 1);
        // The unknown frame appears nowhere in the matrix...
        let total: u32 = evaluation
            .confusion
            .counts()
            .iter()
            .flatten()
            .sum();
        assert_eq!(total, 1);
        // ...but it does count as a missed sitting frame.
        let (_, sitting) = evaluation.per_class[0];
        assert_eq!(sitting.support, 2);
        assert!((sitting.recall - 0.5).abs() < 1e-12);
        assert_eq!(sitting.precision, 1.0);
    }

    #[test]
    fn per_class_metrics() {
        let predictions = vec![
            prediction(1, Label::Walking),
            prediction(2, Label::Walking),
            prediction(3, Label::Sitting),
        ];
        let truth = vec![
            truth(1, "walking"),
            truth(2, "sitting"),
            truth(3, "walking"),
        ];

        let evaluation = evaluate(&predictions, &truth).unwrap();
        let (_, walking) = evaluation.per_class[1];
        // 1 TP, 1 FP, 1 FN.
        assert!((walking.precision - 0.5).abs() < 1e-12);
        assert!((walking.recall - 0.5).abs() < 1e-12);
        assert!((walking.f1 - 0.5).abs() < 1e-12);
        assert_eq!(walking.support, 2);
    }

    #[test]
    fn disjoint_streams_are_an_error() {
        let predictions = vec![prediction(1, Label::Sitting)];
        let truth = vec![truth(2, "sitting")];
        assert!(matches!(
            evaluate(&predictions, &truth),
            Err(EthogramError::EvaluationError(_))
        ));
    }

    #[test]
    fn matrix_renders_as_aligned_grid() {
        let predictions = vec![prediction(1, Label::Sitting)];
        let truth = vec![truth(1, "sitting")];
        let evaluation = evaluate(&predictions, &truth).unwrap();

        let rendered = evaluation.confusion.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("sitting"));
        assert!(lines[0].contains("climbing"));
        assert!(lines[1].starts_with("sitting"));
        assert!(lines[1].trim_end().ends_with('0'));
    }

    #[test]
    fn ground_truth_csv_parses() {
        let raw = "Frames,True_Behaviour\n1,Sitting\n2,climbing\n";
        let records = read_ground_truth_csv(raw.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].frame, 1);
        assert_eq!(records[1].behavior, "climbing");
    }
}
