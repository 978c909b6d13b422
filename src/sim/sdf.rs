//! Signed distance helpers
//!
//! Used by the mask rasterizer (stroked segments) and the goal check.

use glam::Vec2;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Distance from `p` to the segment `a`–`b` (a capsule of zero radius)
pub fn sd_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sd_circle() {
        let c = Vec2::new(100.0, 100.0);
        assert!((sd_circle(Vec2::new(100.0, 106.0), c, 10.0) + 4.0).abs() < 1e-5);
        assert!(sd_circle(Vec2::new(120.0, 100.0), c, 10.0) > 0.0);
    }

    #[test]
    fn test_sd_segment_perpendicular_and_caps() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((sd_segment(Vec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-5);
        // Beyond the end: distance to the endpoint (round cap)
        assert!((sd_segment(Vec2::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-5);
        assert!(sd_segment(Vec2::new(7.0, 0.0), a, b).abs() < 1e-5);
    }

    #[test]
    fn test_sd_segment_degenerate() {
        let a = Vec2::new(2.0, 2.0);
        assert!((sd_segment(Vec2::new(5.0, 6.0), a, a) - 5.0).abs() < 1e-5);
    }
}
