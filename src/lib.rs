//! pose-ethogram - Rule-based behaviour classification from 2D pose estimation
//!
//! Classifies the behaviour of a filmed primate subject (sitting, walking,
//! climbing) per video frame from 2D body-joint coordinates, using
//! hand-authored geometric and kinematic rules through a deterministic
//! pipeline: pose table adaptation → per-behaviour scoring → confidence
//! normalization → labeling.
//!
//! ## Modules
//!
//! - **Classifier core**: geometry helpers, scoring rules, and the
//!   frame-sequential classifier producing the classification stream
//! - **Collaborators**: pose table adapters, accuracy evaluation, and
//!   video-overlay timing, all consumers or producers of the core's contracts

pub mod accuracy;
pub mod adapters;
pub mod classifier;
pub mod error;
pub mod geometry;
pub mod overlay;
pub mod report;
pub mod rules;
pub mod stream;
pub mod types;

pub use classifier::{classify_all, classify_frame, resolve_label, UNKNOWN_THRESHOLD};
pub use error::EthogramError;
pub use types::{Behavior, ClassificationRecord, ConfidenceVector, JointFrame, Label, Point};

// Adapter exports
pub use adapters::{DeepLabCutAdapter, PoseTableAdapter, ProcessedCsvAdapter};

/// Crate version embedded in evaluation reports
pub const ETHOGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for evaluation reports
pub const PRODUCER_NAME: &str = "pose-ethogram";
