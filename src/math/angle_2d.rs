//! Orientation angles of segments, in degrees.

use super::Point2;

/// Returns the orientation of segment `start → end` in degrees.
///
/// The direction vector is flipped whenever it points upwards
/// (`start.y < end.y`), so the reported angle always comes from the lower
/// half-plane plus the positive x-axis: for finite input the result lies in
/// `(-180, 0] ∪ {180}`, a subset of `(-180, 180]`. A segment and its
/// reverse receive the same angle.
///
/// A zero `dy` is normalized to `+0.0`, otherwise a leftward horizontal
/// segment ending at `y = -0.0` would report `-180`.
#[must_use]
pub fn segment_angle(start: &Point2, end: &Point2) -> f64 {
    let flip = start.y < end.y;
    let (dx, dy) = if flip {
        (start.x - end.x, start.y - end.y)
    } else {
        (end.x - start.x, end.y - start.y)
    };
    (dy + 0.0).atan2(dx).to_degrees()
}

/// Absolute difference between two segment angles, reduced into `[0, 180)`.
///
/// Horizontal segments can be reported as either `0` or `180`; the
/// reduction makes both compare equal.
#[must_use]
pub fn angle_difference(from_angle: f64, to_angle: f64) -> f64 {
    (from_angle - to_angle).abs() % 180.0
}

/// Folds a difference near 180° back towards 0°.
///
/// Differences `>= 180 - tolerance` become `180 - diff`. The fold is
/// inclusive, so a difference of exactly `180 - tolerance` folds to exactly
/// `tolerance`, which [`is_parallel`] rejects.
#[must_use]
pub fn fold_angle_difference(diff: f64, tolerance: f64) -> f64 {
    if diff >= 180.0 - tolerance {
        180.0 - diff
    } else {
        diff
    }
}

/// A folded difference counts as parallel when strictly below `tolerance`.
#[must_use]
pub fn is_parallel(folded_diff: f64, tolerance: f64) -> bool {
    folded_diff < tolerance
}
