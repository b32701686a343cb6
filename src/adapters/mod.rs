//! Pose table adapters
//!
//! Adapters parse tabular pose-estimation output and map it to the canonical
//! [`JointFrame`] sequence the classifier consumes. Structural problems
//! (wrong column count, missing tracked columns) are fatal and rejected here,
//! before classification begins; unparseable cells degrade to NaN instead.

mod deeplabcut;
mod processed;

pub use deeplabcut::DeepLabCutAdapter;
pub use processed::{write_frames_csv, ProcessedCsvAdapter};

use crate::error::EthogramError;
use crate::types::JointFrame;

/// The canonical column order of the processed pose table: fifteen joints,
/// x before y, matching the classifier's input contract.
pub const POSE_COLUMNS: [&str; 30] = [
    "head_x",
    "head_y",
    "chest_x",
    "chest_y",
    "torso_x",
    "torso_y",
    "left_shoulder_x",
    "left_shoulder_y",
    "left_elbow_x",
    "left_elbow_y",
    "left_hand_x",
    "left_hand_y",
    "right_shoulder_x",
    "right_shoulder_y",
    "right_elbow_x",
    "right_elbow_y",
    "right_hand_x",
    "right_hand_y",
    "left_hip_x",
    "left_hip_y",
    "left_knee_x",
    "left_knee_y",
    "left_foot_x",
    "left_foot_y",
    "right_hip_x",
    "right_hip_y",
    "right_knee_x",
    "right_knee_y",
    "right_foot_x",
    "right_foot_y",
];

/// Trait for pose table adapters.
pub trait PoseTableAdapter {
    /// Parse raw tabular text into an ordered frame sequence.
    fn parse(&self, raw: &str) -> Result<Vec<JointFrame>, EthogramError>;
}
