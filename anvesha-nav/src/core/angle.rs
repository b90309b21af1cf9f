//! Angle normalization and interpolation helpers.

use std::f32::consts::PI;

/// Normalize an angle to [-PI, PI].
pub fn normalize_angle(angle: f32) -> f32 {
    let mut result = angle;
    while result > PI {
        result -= 2.0 * PI;
    }
    while result < -PI {
        result += 2.0 * PI;
    }
    result
}

/// True if two bearings differ by less than `tolerance` (wrap-aware).
#[inline]
pub fn angle_within(a: f32, b: f32, tolerance: f32) -> bool {
    normalize_angle(a - b).abs() < tolerance
}

/// Blend `from` toward `to` by `factor`, taking the shortest angular path.
#[inline]
pub fn lerp_angle(from: f32, to: f32, factor: f32) -> f32 {
    from + normalize_angle(to - from) * factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(0.0) - 0.0).abs() < 1e-6);
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(-3.0 * PI) - (-PI)).abs() < 1e-6);
    }

    #[test]
    fn test_angle_within_wraps() {
        // 179 degrees and -179 degrees are 2 degrees apart
        let a = PI - 0.017;
        let b = -PI + 0.017;
        assert!(angle_within(a, b, 0.1));
        assert!(!angle_within(0.0, PI / 2.0, 0.1));
    }

    #[test]
    fn test_lerp_angle_shortest_path() {
        // Interpolating across the wrap must not loop the long way round
        let next = lerp_angle(PI - 0.1, -PI + 0.1, 0.5);
        assert!(next.abs() > PI - 0.2);
    }
}
