//! DeepLabCut export adapter
//!
//! Normalizes the raw pose-estimation export into the canonical frame
//! sequence. The export carries a scorer header row followed by two metadata
//! records (body-part names and coordinate axes) before the actual data;
//! tracked columns are the ones whose header cell starts with the scorer
//! name. Cells that do not parse as numbers become NaN.

use super::{PoseTableAdapter, POSE_COLUMNS};
use crate::error::EthogramError;
use crate::types::{JointFrame, Point};

/// Number of metadata records between the header and the first data row.
const METADATA_ROWS: usize = 2;

/// Adapter for raw DeepLabCut-style CSV exports.
pub struct DeepLabCutAdapter {
    scorer_prefix: String,
}

impl Default for DeepLabCutAdapter {
    fn default() -> Self {
        Self::new("test")
    }
}

impl DeepLabCutAdapter {
    /// Create an adapter selecting columns whose header starts with the given
    /// scorer name.
    pub fn new(scorer_prefix: impl Into<String>) -> Self {
        Self {
            scorer_prefix: scorer_prefix.into(),
        }
    }

    fn frame_from_cells(cells: &[f64]) -> JointFrame {
        JointFrame {
            head: Point::new(cells[0], cells[1]),
            chest: Point::new(cells[2], cells[3]),
            torso: Point::new(cells[4], cells[5]),
            left_shoulder: Point::new(cells[6], cells[7]),
            left_elbow: Point::new(cells[8], cells[9]),
            left_hand: Point::new(cells[10], cells[11]),
            right_shoulder: Point::new(cells[12], cells[13]),
            right_elbow: Point::new(cells[14], cells[15]),
            right_hand: Point::new(cells[16], cells[17]),
            left_hip: Point::new(cells[18], cells[19]),
            left_knee: Point::new(cells[20], cells[21]),
            left_foot: Point::new(cells[22], cells[23]),
            right_hip: Point::new(cells[24], cells[25]),
            right_knee: Point::new(cells[26], cells[27]),
            right_foot: Point::new(cells[28], cells[29]),
        }
    }
}

impl PoseTableAdapter for DeepLabCutAdapter {
    fn parse(&self, raw: &str) -> Result<Vec<JointFrame>, EthogramError> {
        let mut reader = csv::Reader::from_reader(raw.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| EthogramError::ParseError(e.to_string()))?
            .clone();

        // Tracked columns carry the scorer name; everything else (frame
        // index, metadata) is dropped. Surplus tracked columns beyond the
        // fixed joint set are trimmed.
        let mut tracked: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.starts_with(&self.scorer_prefix))
            .map(|(i, _)| i)
            .collect();
        if tracked.len() < POSE_COLUMNS.len() {
            return Err(EthogramError::SchemaError(format!(
                "expected {} tracked columns with scorer prefix '{}', found {}",
                POSE_COLUMNS.len(),
                self.scorer_prefix,
                tracked.len()
            )));
        }
        tracked.truncate(POSE_COLUMNS.len());

        let mut frames = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                EthogramError::SchemaError(format!("row {}: {}", index + 1, e))
            })?;
            // The body-part and axis rows sit between the header and the data.
            if index < METADATA_ROWS {
                continue;
            }

            let cells: Vec<f64> = tracked
                .iter()
                .map(|&i| {
                    record
                        .get(i)
                        .and_then(|cell| cell.trim().parse::<f64>().ok())
                        .unwrap_or(f64::NAN)
                })
                .collect();
            frames.push(Self::frame_from_cells(&cells));
        }

        Ok(frames)
    }
}
