//! Planar geometry and kinematics helpers
//!
//! Pure functions over [`Point`] pairs. NaN coordinates propagate through
//! every computation; the scoring rules rely on NaN comparisons evaluating
//! false rather than on any error path.

use crate::types::Point;

/// Euclidean distance between two points, in pixels.
pub fn distance(p1: Point, p2: Point) -> f64 {
    ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt()
}

/// Absolute angle in degrees between the rays `p2 -> p1` and `p2 -> p3`,
/// computed as `|deg(atan2(p3 - p2) - atan2(p1 - p2))|`.
///
/// The raw atan2 difference spans (-360, 360) before the absolute value, so
/// the result can exceed 180 degrees. This is NOT a canonical interior angle:
/// callers comparing against a degree band are comparing an unsigned
/// magnitude whose value depends on point ordering. The sitting rule depends
/// on this exact arithmetic; do not canonicalize it.
pub fn angle_degrees(p1: Point, p2: Point, p3: Point) -> f64 {
    let angle = (p3.y - p2.y).atan2(p3.x - p2.x) - (p1.y - p2.y).atan2(p1.x - p2.x);
    angle.to_degrees().abs()
}

/// Arithmetic mean of two points. Used to synthesize the centre-of-hips
/// reference point, which is not a tracked joint.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Distance moved by one joint between consecutive frames.
///
/// Returns 0 when there is no previous frame: the first frame of a sequence
/// has zero velocity by definition, not missing velocity.
pub fn frame_displacement(current: Point, previous: Option<Point>) -> f64 {
    match previous {
        Some(prev) => distance(prev, current),
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_planar_euclidean() {
        let d = distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn distance_propagates_nan() {
        let d = distance(Point::new(f64::NAN, 0.0), Point::new(3.0, 4.0));
        assert!(d.is_nan());
    }

    #[test]
    fn right_angle_is_90() {
        let a = angle_degrees(
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
        );
        assert!((a - 90.0).abs() < 1e-9);
    }

    #[test]
    fn angle_can_exceed_180() {
        // Ray ordering that produces a reflex magnitude. The arithmetic is
        // |deg(atan2) - deg(atan2)|, not an interior angle.
        let a = angle_degrees(
            Point::new(-1.0, -1.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
        );
        // atan2(1, 0) = 90 deg, atan2(-1, -1) = -135 deg, diff = 225 deg.
        assert!((a - 225.0).abs() < 1e-9);
    }

    #[test]
    fn angle_propagates_nan() {
        let a = angle_degrees(
            Point::missing(),
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
        );
        assert!(a.is_nan());
    }

    #[test]
    fn midpoint_is_mean() {
        let m = midpoint(Point::new(250.0, 400.0), Point::new(350.0, 420.0));
        assert_eq!(m, Point::new(300.0, 410.0));
    }

    #[test]
    fn displacement_without_previous_frame_is_zero() {
        assert_eq!(frame_displacement(Point::new(10.0, 10.0), None), 0.0);
    }

    #[test]
    fn displacement_between_frames() {
        let d = frame_displacement(Point::new(13.0, 14.0), Some(Point::new(10.0, 10.0)));
        assert!((d - 5.0).abs() < 1e-12);
    }
}
