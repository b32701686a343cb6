//! Video overlay timing
//!
//! Maps video timestamps onto the classification stream so a renderer can
//! burn the classified behaviour and its confidence into each video frame.
//! The classification stream is sampled at a fixed interval starting at a
//! wall-clock offset into the video; before that offset a defined default cue
//! is shown rather than an empty state, and past the end of the stream the
//! last record keeps displaying. This module produces the cue plan only;
//! pixel rendering is up to the video tooling.

use serde::Serialize;

use crate::error::EthogramError;
use crate::types::ClassificationRecord;

/// Cue shown before the start offset, and whenever the stream is empty.
pub const DEFAULT_LABEL: &str = "UNKNOWN";
pub const DEFAULT_CONFIDENCE: f64 = 100.0;

/// What the renderer should display for one moment of video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayCue {
    /// Uppercased label, ready for display.
    pub label: String,
    pub confidence: f64,
}

impl OverlayCue {
    fn default_cue() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            confidence: DEFAULT_CONFIDENCE,
        }
    }

    /// Burned-in caption text, e.g. `SITTING: 76.9%`.
    pub fn caption(&self) -> String {
        format!("{}: {:.1}%", self.label, self.confidence)
    }
}

impl From<&ClassificationRecord> for OverlayCue {
    fn from(record: &ClassificationRecord) -> Self {
        Self {
            label: record.label.as_str().to_ascii_uppercase(),
            confidence: record.confidence,
        }
    }
}

/// One row of the rendered cue plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedCue {
    /// 0-based video frame number.
    pub video_frame: u32,
    /// Timestamp of that frame, seconds from the start of the video.
    pub time_sec: f64,
    pub label: String,
    pub confidence: f64,
}

/// Time alignment between a video and a classification stream.
#[derive(Debug, Clone, Copy)]
pub struct OverlayTimeline {
    start_time: f64,
    frame_interval: f64,
}

impl OverlayTimeline {
    /// Create a timeline with a start offset and sampling interval, both in
    /// seconds. The interval must be positive and finite; the offset must be
    /// non-negative and finite.
    pub fn new(start_time: f64, frame_interval: f64) -> Result<Self, EthogramError> {
        if !frame_interval.is_finite() || frame_interval <= 0.0 {
            return Err(EthogramError::InvalidTiming(format!(
                "frame interval must be positive, got {}",
                frame_interval
            )));
        }
        if !start_time.is_finite() || start_time < 0.0 {
            return Err(EthogramError::InvalidTiming(format!(
                "start time must be non-negative, got {}",
                start_time
            )));
        }
        Ok(Self {
            start_time,
            frame_interval,
        })
    }

    /// Index into the stream for a timestamp at or after the start offset.
    fn stream_index(&self, t: f64) -> usize {
        ((t - self.start_time) / self.frame_interval).floor() as usize
    }

    /// The cue to display at video timestamp `t` (seconds).
    pub fn cue_at(&self, t: f64, stream: &[ClassificationRecord]) -> OverlayCue {
        if t < self.start_time || stream.is_empty() {
            return OverlayCue::default_cue();
        }
        // Past the end of the stream the last record holds.
        let index = self.stream_index(t).min(stream.len() - 1);
        OverlayCue::from(&stream[index])
    }

    /// Produce a cue for every video frame of a `frame_count`-frame video
    /// running at `fps`.
    pub fn plan(
        &self,
        stream: &[ClassificationRecord],
        fps: f64,
        frame_count: usize,
    ) -> Result<Vec<PlannedCue>, EthogramError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(EthogramError::InvalidFrameRate(fps));
        }

        let mut cues = Vec::with_capacity(frame_count);
        for video_frame in 0..frame_count {
            let time_sec = video_frame as f64 / fps;
            let cue = self.cue_at(time_sec, stream);
            cues.push(PlannedCue {
                video_frame: video_frame as u32,
                time_sec,
                label: cue.label,
                confidence: cue.confidence,
            });
        }
        Ok(cues)
    }
}
