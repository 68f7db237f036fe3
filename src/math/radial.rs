use super::Point3;

/// Returns the minimum distance from point `(px, py)` to the line segment
/// from `(ax, ay)` to `(bx, by)`.
#[must_use]
pub fn point_to_segment_dist(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((px - ax) * dx + (py - ay) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);

    let closest_x = ax + t * dx;
    let closest_y = ay + t * dy;

    ((px - closest_x).powi(2) + (py - closest_y).powi(2)).sqrt()
}

/// Transverse distance of a point from the z-axis.
#[must_use]
pub fn perp(point: &Point3) -> f64 {
    point.x.hypot(point.y)
}

/// Closest transverse approach of the segment `a -> b` to the z-axis.
///
/// A module edge tangent to a cylinder reaches its smallest radius between
/// the vertices, so vertex radii alone overestimate the inner extent.
#[must_use]
pub fn segment_min_perp(a: &Point3, b: &Point3) -> f64 {
    point_to_segment_dist(0.0, 0.0, a.x, a.y, b.x, b.y)
}
