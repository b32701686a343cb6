//! Per-behaviour scoring rules
//!
//! Each behaviour has an independent scoring function combining two or three
//! geometric or kinematic sub-conditions, each contributing a fixed weight.
//! Weights were hand-tuned so that two of three typical cues clear the
//! classification threshold. No rule looks further back than the immediately
//! preceding frame.
//!
//! A NaN coordinate makes the affected comparison false, which withholds that
//! sub-rule's weight. Missing data lowers confidence; it never raises an
//! error.

use crate::geometry::{angle_degrees, distance, frame_displacement, midpoint};
use crate::types::JointFrame;

/// Torso displacement below this many pixels counts as "not moving".
const LOW_MOVEMENT_PX: f64 = 50.0;
/// Hip-to-knee distance below this indicates bent legs.
const BENT_LEG_PX: f64 = 100.0;
/// Torso angle band (head -> torso -> hip centre) for an upright trunk.
const TORSO_ANGLE_MIN_DEG: f64 = 100.0;
const TORSO_ANGLE_MAX_DEG: f64 = 178.0;
/// Horizontal torso travel band for locomotion.
const WALK_TRAVEL_MIN_PX: f64 = 90.0;
const WALK_TRAVEL_MAX_PX: f64 = 1000.0;
/// Foot separation band for a walking gait.
const STRIDE_MIN_PX: f64 = 115.0;
const STRIDE_MAX_PX: f64 = 125.0;
/// Shoulder-to-hand distance above this counts as an extended arm.
const ARM_EXTENSION_PX: f64 = 125.0;

/// Sitting: low inter-frame torso movement (+35), both legs bent (+35),
/// upright torso (+30). Capped at 100.
pub fn score_sitting(current: &JointFrame, previous: Option<&JointFrame>) -> f64 {
    let mut confidence: f64 = 0.0;

    // Low movement between frames indicates sitting. Contributes nothing on
    // the first frame of a sequence.
    if previous.is_some() {
        let movement = frame_displacement(current.torso, previous.map(|p| p.torso));
        if movement < LOW_MOVEMENT_PX {
            confidence += 35.0;
        }
    }

    // Short hip-to-knee distance on both sides indicates bent legs.
    let left_hip_to_knee = distance(current.left_hip, current.left_knee);
    let right_hip_to_knee = distance(current.right_hip, current.right_knee);
    if left_hip_to_knee < BENT_LEG_PX && right_hip_to_knee < BENT_LEG_PX {
        confidence += 35.0;
    }

    // Vertical torso: angle from head through torso to the hip centre.
    let hip_center = midpoint(current.left_hip, current.right_hip);
    let torso_angle = angle_degrees(current.head, current.torso, hip_center);
    if torso_angle > TORSO_ANGLE_MIN_DEG && torso_angle < TORSO_ANGLE_MAX_DEG {
        confidence += 30.0;
    }

    confidence.min(100.0)
}

/// Walking: horizontal torso travel between frames (+50), moderate foot
/// separation (+50). Capped at 100.
pub fn score_walking(current: &JointFrame, previous: Option<&JointFrame>) -> f64 {
    let mut confidence: f64 = 0.0;

    // Horizontal movement between frames. Contributes nothing on the first
    // frame of a sequence.
    if let Some(prev) = previous {
        let horizontal_movement = (current.torso.x - prev.torso.x).abs();
        if horizontal_movement > WALK_TRAVEL_MIN_PX && horizontal_movement < WALK_TRAVEL_MAX_PX {
            confidence += 50.0;
        }
    }

    // Moderate leg separation indicates a stride.
    let leg_separation = distance(current.left_foot, current.right_foot);
    if leg_separation > STRIDE_MIN_PX && leg_separation < STRIDE_MAX_PX {
        confidence += 50.0;
    }

    confidence.min(100.0)
}

/// Climbing: either arm extended (+40), both hands above the torso (+30),
/// both feet hanging below the torso (+30). Capped at 100.
///
/// Image coordinates grow downward, so "above" means a smaller y.
pub fn score_climbing(current: &JointFrame, _previous: Option<&JointFrame>) -> f64 {
    let mut confidence: f64 = 0.0;

    let left_arm_extension = distance(current.left_shoulder, current.left_hand);
    let right_arm_extension = distance(current.right_shoulder, current.right_hand);
    if left_arm_extension > ARM_EXTENSION_PX || right_arm_extension > ARM_EXTENSION_PX {
        confidence += 40.0;
    }

    let hands_elevated =
        current.left_hand.y < current.torso.y && current.right_hand.y < current.torso.y;
    if hands_elevated {
        confidence += 30.0;
    }

    let feet_hanging =
        current.left_foot.y > current.torso.y && current.right_foot.y > current.torso.y;
    if feet_hanging {
        confidence += 30.0;
    }

    confidence.min(100.0)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::types::Point;

    #[test]
    fn sitting_scores_100_with_all_cues() {
        let current = seated_frame();
        let mut previous = seated_frame();
        previous.torso = Point::new(290.0, 300.0); // 10 px displacement

        assert_eq!(score_sitting(&current, Some(&previous)), 100.0);
    }

    #[test]
    fn sitting_first_frame_skips_movement_bonus() {
        let current = seated_frame();
        // Legs bent (+35) and torso upright (+30), but no previous frame.
        assert_eq!(score_sitting(&current, None), 65.0);
    }

    #[test]
    fn sitting_large_movement_withholds_bonus() {
        let current = seated_frame();
        let mut previous = seated_frame();
        previous.torso = Point::new(200.0, 300.0); // 100 px displacement

        assert_eq!(score_sitting(&current, Some(&previous)), 65.0);
    }

    #[test]
    fn walking_needs_travel_and_stride() {
        let mut current = neutral_frame();
        current.left_foot = Point::new(240.0, 560.0);
        current.right_foot = Point::new(360.0, 560.0); // separation 120 px

        let mut previous = neutral_frame();
        previous.torso = Point::new(150.0, 300.0); // horizontal travel 150 px

        assert_eq!(score_walking(&current, Some(&previous)), 100.0);
        // Stride alone, no previous frame.
        assert_eq!(score_walking(&current, None), 50.0);
    }

    #[test]
    fn walking_travel_band_is_exclusive() {
        let mut current = neutral_frame();
        let mut previous = neutral_frame();

        previous.torso = Point::new(current.torso.x - 90.0, 300.0);
        assert_eq!(score_walking(&current, Some(&previous)), 0.0);

        previous.torso = Point::new(current.torso.x - 1000.0, 300.0);
        assert_eq!(score_walking(&current, Some(&previous)), 0.0);

        // Vertical travel does not count.
        previous.torso = Point::new(current.torso.x, 100.0);
        current.torso = Point::new(current.torso.x, 300.0);
        assert_eq!(score_walking(&current, Some(&previous)), 0.0);
    }

    #[test]
    fn climbing_scores_100_with_all_cues() {
        let current = climbing_frame();
        assert_eq!(score_climbing(&current, None), 100.0);
    }

    #[test]
    fn climbing_either_arm_qualifies() {
        let mut current = climbing_frame();
        // Retract the left arm; the right stays short too.
        current.left_hand = Point::new(300.0, 120.0); // 60 px from shoulder
        current.right_hand = Point::new(340.0, 120.0);
        // Hands still above torso, feet still below: 30 + 30.
        assert_eq!(score_climbing(&current, None), 60.0);

        // Stretch only the right arm past the threshold.
        current.right_hand = Point::new(340.0, 40.0); // 140 px
        assert_eq!(score_climbing(&current, None), 100.0);
    }

    #[test]
    fn full_cue_scores_stay_at_the_100_ceiling() {
        let seated = seated_frame();
        let mut seated_prev = seated_frame();
        seated_prev.torso = Point::new(290.0, 300.0);

        let scores = [
            score_sitting(&seated, Some(&seated_prev)),
            score_climbing(&climbing_frame(), None),
        ];
        for score in scores {
            assert_eq!(score, 100.0_f64.min(score));
            assert_eq!(score, 100.0);
        }
    }

    #[test]
    fn missing_coordinates_score_zero_not_error() {
        let frame = missing_frame();
        assert_eq!(score_sitting(&frame, None), 0.0);
        assert_eq!(score_walking(&frame, None), 0.0);
        assert_eq!(score_climbing(&frame, None), 0.0);

        // NaN previous frame withholds the motion bonuses too.
        let seated = seated_frame();
        assert_eq!(score_sitting(&seated, Some(&frame)), 65.0);
        assert_eq!(score_walking(&seated, Some(&frame)), 0.0);
    }
}
