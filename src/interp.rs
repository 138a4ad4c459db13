use crate::types::{Value, Vector3Like};

/// Below this difference in corner values an edge is treated as degenerate.
pub const DEGENERATE_EPSILON: Value = 1e-10;

/// Returns the interpolation factor `t` at which the edge from `v0` to `v1`
/// crosses `iso_val`.
///
/// `t` is clamped to `[0, 1]`. Near-degenerate edges and non-finite inputs
/// give `0.5`, so the result is always finite.
#[inline]
pub fn find_t(v0: Value, v1: Value, iso_val: Value) -> Value {
    let denom = v1 - v0;
    if !denom.is_finite() || denom.abs() < DEGENERATE_EPSILON {
        return 0.5;
    }

    let t = (iso_val - v0) / denom;
    if t.is_finite() { t.clamp(0., 1.) } else { 0.5 }
}

/// Linearly interpolate between two points by factor `t`: `p0 + (p1 - p0) * t`.
#[inline]
pub fn interpolate_points<V: Vector3Like>(p0: V, p1: V, t: Value) -> V {
    let step = p1.minus(p0).scaled(t);
    V::from_xyz(
        p0.axis(0) + step.axis(0),
        p0.axis(1) + step.axis(1),
        p0.axis(2) + step.axis(2),
    )
}

/// Position where the surface crosses the edge `p0 → p1`.
#[inline]
pub fn edge_crossing<V: Vector3Like>(p0: V, p1: V, v0: Value, v1: Value, iso_val: Value) -> V {
    interpolate_points(p0, p1, find_t(v0, v1, iso_val))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::types::Point;

    #[test]
    fn t_at_zero_crossing() {
        assert_relative_eq!(find_t(-1., 3., 0.), 0.25);
        assert_relative_eq!(find_t(2., -2., 0.), 0.5);
        assert_relative_eq!(find_t(0.2, 0.8, 0.5), 0.5);
    }

    #[test]
    fn t_is_clamped() {
        assert_eq!(find_t(1., 2., 0.), 0.);
        assert_eq!(find_t(-2., -1., 0.), 1.);
    }

    #[test]
    fn degenerate_edges_use_midpoint() {
        assert_eq!(find_t(0., 0., 0.), 0.5);
        assert_eq!(find_t(1e-12, -1e-12, 0.), 0.5);
    }

    #[test]
    fn non_finite_values_use_midpoint() {
        assert_eq!(find_t(-1., Value::NAN, 0.), 0.5);
        assert_eq!(find_t(Value::NAN, 1., 0.), 0.5);
        assert_eq!(find_t(-1., Value::INFINITY, 0.), 0.5);
    }

    #[test]
    fn crossing_position() {
        let p = edge_crossing(
            Point::new(0., 0., 0.),
            Point::new(2., 4., 0.),
            -1.,
            3.,
            0.,
        );
        assert_relative_eq!(p, Point::new(0.5, 1., 0.));
    }
}
