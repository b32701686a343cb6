//! Processed pose table adapter
//!
//! Reads and writes the normalized 30-column pose table: one row per video
//! frame, `{joint}_x`/`{joint}_y` for the fifteen tracked joints, in the
//! canonical column order.

use serde::{Deserialize, Serialize};
use std::io::Write;

use super::{PoseTableAdapter, POSE_COLUMNS};
use crate::error::EthogramError;
use crate::types::{JointFrame, Point};

/// One serialized row of the processed table. Absent cells deserialize to
/// `None` and become NaN in the [`JointFrame`].
#[derive(Debug, Serialize, Deserialize)]
struct PoseRow {
    head_x: Option<f64>,
    head_y: Option<f64>,
    chest_x: Option<f64>,
    chest_y: Option<f64>,
    torso_x: Option<f64>,
    torso_y: Option<f64>,
    left_shoulder_x: Option<f64>,
    left_shoulder_y: Option<f64>,
    left_elbow_x: Option<f64>,
    left_elbow_y: Option<f64>,
    left_hand_x: Option<f64>,
    left_hand_y: Option<f64>,
    right_shoulder_x: Option<f64>,
    right_shoulder_y: Option<f64>,
    right_elbow_x: Option<f64>,
    right_elbow_y: Option<f64>,
    right_hand_x: Option<f64>,
    right_hand_y: Option<f64>,
    left_hip_x: Option<f64>,
    left_hip_y: Option<f64>,
    left_knee_x: Option<f64>,
    left_knee_y: Option<f64>,
    left_foot_x: Option<f64>,
    left_foot_y: Option<f64>,
    right_hip_x: Option<f64>,
    right_hip_y: Option<f64>,
    right_knee_x: Option<f64>,
    right_knee_y: Option<f64>,
    right_foot_x: Option<f64>,
    right_foot_y: Option<f64>,
}

fn point(x: Option<f64>, y: Option<f64>) -> Point {
    Point::new(x.unwrap_or(f64::NAN), y.unwrap_or(f64::NAN))
}

impl From<PoseRow> for JointFrame {
    fn from(row: PoseRow) -> Self {
        JointFrame {
            head: point(row.head_x, row.head_y),
            chest: point(row.chest_x, row.chest_y),
            torso: point(row.torso_x, row.torso_y),
            left_shoulder: point(row.left_shoulder_x, row.left_shoulder_y),
            left_elbow: point(row.left_elbow_x, row.left_elbow_y),
            left_hand: point(row.left_hand_x, row.left_hand_y),
            right_shoulder: point(row.right_shoulder_x, row.right_shoulder_y),
            right_elbow: point(row.right_elbow_x, row.right_elbow_y),
            right_hand: point(row.right_hand_x, row.right_hand_y),
            left_hip: point(row.left_hip_x, row.left_hip_y),
            left_knee: point(row.left_knee_x, row.left_knee_y),
            left_foot: point(row.left_foot_x, row.left_foot_y),
            right_hip: point(row.right_hip_x, row.right_hip_y),
            right_knee: point(row.right_knee_x, row.right_knee_y),
            right_foot: point(row.right_foot_x, row.right_foot_y),
        }
    }
}

impl From<&JointFrame> for PoseRow {
    fn from(frame: &JointFrame) -> Self {
        PoseRow {
            head_x: Some(frame.head.x),
            head_y: Some(frame.head.y),
            chest_x: Some(frame.chest.x),
            chest_y: Some(frame.chest.y),
            torso_x: Some(frame.torso.x),
            torso_y: Some(frame.torso.y),
            left_shoulder_x: Some(frame.left_shoulder.x),
            left_shoulder_y: Some(frame.left_shoulder.y),
            left_elbow_x: Some(frame.left_elbow.x),
            left_elbow_y: Some(frame.left_elbow.y),
            left_hand_x: Some(frame.left_hand.x),
            left_hand_y: Some(frame.left_hand.y),
            right_shoulder_x: Some(frame.right_shoulder.x),
            right_shoulder_y: Some(frame.right_shoulder.y),
            right_elbow_x: Some(frame.right_elbow.x),
            right_elbow_y: Some(frame.right_elbow.y),
            right_hand_x: Some(frame.right_hand.x),
            right_hand_y: Some(frame.right_hand.y),
            left_hip_x: Some(frame.left_hip.x),
            left_hip_y: Some(frame.left_hip.y),
            left_knee_x: Some(frame.left_knee.x),
            left_knee_y: Some(frame.left_knee.y),
            left_foot_x: Some(frame.left_foot.x),
            left_foot_y: Some(frame.left_foot.y),
            right_hip_x: Some(frame.right_hip.x),
            right_hip_y: Some(frame.right_hip.y),
            right_knee_x: Some(frame.right_knee.x),
            right_knee_y: Some(frame.right_knee.y),
            right_foot_x: Some(frame.right_foot.x),
            right_foot_y: Some(frame.right_foot.y),
        }
    }
}

/// Adapter for the processed 30-column pose table.
pub struct ProcessedCsvAdapter;

impl PoseTableAdapter for ProcessedCsvAdapter {
    fn parse(&self, raw: &str) -> Result<Vec<JointFrame>, EthogramError> {
        let mut reader = csv::Reader::from_reader(raw.as_bytes());

        // Reject a wrong header before touching any row.
        let headers = reader
            .headers()
            .map_err(|e| EthogramError::ParseError(e.to_string()))?
            .clone();
        for expected in POSE_COLUMNS {
            if !headers.iter().any(|h| h == expected) {
                return Err(EthogramError::MissingColumn(expected.to_string()));
            }
        }
        // The contract is exactly these 30 columns; a stray header means the
        // table is not a processed pose table.
        for header in headers.iter() {
            if !POSE_COLUMNS.contains(&header) {
                return Err(EthogramError::SchemaError(format!(
                    "unexpected column {:?}",
                    header
                )));
            }
        }

        let mut frames = Vec::new();
        for (index, result) in reader.deserialize::<PoseRow>().enumerate() {
            // A row whose field count disagrees with the header is a schema
            // inconsistency, fatal per the input contract.
            let row = result.map_err(|e| {
                EthogramError::SchemaError(format!("row {}: {}", index + 1, e))
            })?;
            frames.push(JointFrame::from(row));
        }
        Ok(frames)
    }
}

/// Write a frame sequence back out as the processed 30-column table.
pub fn write_frames_csv<W: Write>(frames: &[JointFrame], writer: W) -> Result<(), EthogramError> {
    let mut out = csv::Writer::from_writer(writer);
    for frame in frames {
        out.serialize(PoseRow::from(frame))?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}
