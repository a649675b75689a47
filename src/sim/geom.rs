//! Vector helpers used by the collision code

use glam::Vec2;

/// Squared length
#[inline]
pub fn len_sq(v: Vec2) -> f32 {
    v.dot(v)
}

/// Mirror `v` about the axis `n` (unit): 2(v·n)n - v
#[inline]
pub fn reflect(v: Vec2, n: Vec2) -> Vec2 {
    2.0 * v.dot(n) * n - v
}

/// Part of `v` perpendicular to the unit axis `n`: v - (v·n)n
#[inline]
pub fn reject(v: Vec2, n: Vec2) -> Vec2 {
    v - v.dot(n) * n
}

/// Split `v` into (along `n`, across `n`) for a unit axis `n`
#[inline]
pub fn decompose(v: Vec2, n: Vec2) -> (Vec2, Vec2) {
    let across = reject(v, n);
    (v - across, across)
}

/// Contact axis for two centers `d = a - b` apart: the perpendicular of
/// `d`, scaled by `1/dist`.
#[inline]
pub fn contact_axis(d: Vec2, dist: f32) -> Vec2 {
    Vec2::new(d.y, -d.x) / dist
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_mirrors_about_axis() {
        let v = Vec2::new(3.0, 2.0);
        let r = reflect(v, Vec2::Y);
        assert!((r - Vec2::new(-3.0, 2.0)).length() < 1e-6);
        let r = reflect(v, Vec2::X);
        assert!((r - Vec2::new(3.0, -2.0)).length() < 1e-6);
    }

    #[test]
    fn test_decompose_sums_back() {
        let v = Vec2::new(1.5, -4.0);
        let n = Vec2::new(0.6, 0.8);
        let (along, across) = decompose(v, n);
        assert!((along + across - v).length() < 1e-5);
        assert!(across.dot(n).abs() < 1e-5);
    }

    #[test]
    fn test_contact_axis_is_unit_and_perpendicular() {
        let d = Vec2::new(3.0, 4.0);
        let n = contact_axis(d, 5.0);
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!(n.dot(d).abs() < 1e-6);
        assert_eq!(len_sq(d), 25.0);
    }
}
