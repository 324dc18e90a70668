//! Length-to-score curve shared by the title and meta description checks

/// Score a measured length against an ideal `[min, max]` range.
///
/// ```text
/// n <= 0          -> 0
/// 0 < n < min     -> ramps 0 .. 60
/// min <= n <= max -> 100
/// n > max         -> 60, falling toward 20 as the overshoot reaches max
/// ```
pub fn length_score(n: usize, min: usize, max: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let (min, max) = (min.max(1), max.max(min.max(1)));
    if n < min {
        return 60.0 * n as f64 / min as f64;
    }
    if n <= max {
        return 100.0;
    }
    let overshoot = (n - max) as f64 / max as f64;
    (60.0 - 40.0 * overshoot).max(20.0)
}
