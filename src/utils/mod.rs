/// Wrap an angle in degrees into `[-180, 180)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Shortest signed rotation from `from` to `to`, in degrees.
pub fn heading_difference(to: f64, from: f64) -> f64 {
    normalize_degrees(to - from)
}
