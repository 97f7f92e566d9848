use super::Point2;

/// Orientation of `c` relative to the directed line `a → b`.
///
/// Positive for counter-clockwise, negative for clockwise, zero if collinear.
#[must_use]
pub fn orient_2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Returns `true` if `p`, known to be collinear with `a → b`, lies within
/// the segment's bounding box.
fn within_extent(a: &Point2, b: &Point2, p: &Point2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Bounded segment-segment intersection test in 2D.
///
/// Returns `true` when segments `a0 → a1` and `b0 → b1` share at least one
/// point: a proper crossing, a T-junction, a shared endpoint, or a
/// collinear overlap.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn segments_intersect_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let d1 = orient_2d(b0, b1, a0);
    let d2 = orient_2d(b0, b1, a1);
    let d3 = orient_2d(a0, a1, b0);
    let d4 = orient_2d(a0, a1, b1);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && within_extent(b0, b1, a0))
        || (d2 == 0.0 && within_extent(b0, b1, a1))
        || (d3 == 0.0 && within_extent(a0, a1, b0))
        || (d4 == 0.0 && within_extent(a0, a1, b1))
}
