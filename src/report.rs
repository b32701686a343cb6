//! Evaluation report encoding
//!
//! Wraps an [`Evaluation`] in a versioned JSON envelope with producer and
//! provenance metadata, so downstream tooling can tell which classifier
//! build produced which accuracy figures.

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::accuracy::{ClassMetrics, ConfusionMatrix, Evaluation, Mismatch};
use crate::error::EthogramError;
use crate::types::Behavior;
use crate::{ETHOGRAM_VERSION, PRODUCER_NAME};

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Report producer metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Per-behaviour entry in the report
#[derive(Debug, Clone, Serialize)]
pub struct ClassReportEntry {
    pub behavior: Behavior,
    #[serde(flatten)]
    pub metrics: ClassMetrics,
}

/// Complete evaluation report payload
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub total_frames: usize,
    pub accuracy: f64,
    pub classes: Vec<ClassReportEntry>,
    /// Rows are ground truth, columns predictions, behaviour declaration order.
    pub confusion_matrix: ConfusionMatrix,
    pub outside_label_space: usize,
    pub mismatches: Vec<Mismatch>,
}

/// Encoder for producing report payloads
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Wrap an evaluation in the report envelope
    pub fn encode(&self, evaluation: &Evaluation) -> EvaluationReport {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: ETHOGRAM_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let classes = evaluation
            .per_class
            .iter()
            .map(|(behavior, metrics)| ClassReportEntry {
                behavior: *behavior,
                metrics: *metrics,
            })
            .collect();

        EvaluationReport {
            report_version: REPORT_VERSION.to_string(),
            producer,
            computed_at_utc: Utc::now().to_rfc3339(),
            total_frames: evaluation.total_frames,
            accuracy: evaluation.accuracy,
            classes,
            confusion_matrix: evaluation.confusion,
            outside_label_space: evaluation.outside_label_space,
            mismatches: evaluation.mismatches.clone(),
        }
    }

    /// Encode to pretty-printed JSON
    pub fn encode_to_json(&self, evaluation: &Evaluation) -> Result<String, EthogramError> {
        let report = self.encode(evaluation);
        Ok(serde_json::to_string_pretty(&report)?)
    }
}
