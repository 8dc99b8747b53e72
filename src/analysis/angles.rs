//! Joint angle geometry.

/// Angle at vertex `b` formed by `a` and `c`, in degrees within `[0, 180]`.
///
/// Uses the difference of the two atan2 headings; reflex results are folded
/// back so `a`/`c` order does not matter.
pub fn calculate_angle(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    let radians = (c[1] - b[1]).atan2(c[0] - b[0]) - (a[1] - b[1]).atan2(a[0] - b[0]);
    let angle = radians.to_degrees().abs();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}
