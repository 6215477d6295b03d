//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
/// 
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap an angle in degrees into the range [0, 360).
pub fn wrap_360<T>(angle_deg: T) -> T
where
    T: Float
{
    let full: T = T::from(360.0).unwrap_or_else(T::zero);
    let wrapped = rem_euclid(angle_deg, full);

    // Round-off can produce exactly 360
    if wrapped >= full { wrapped - full } else { wrapped }
}

/// Bring an angular difference in degrees into the range [-180, 180] by
/// repeatedly adding or removing whole turns.
///
/// The result is the signed shortest path, positive meaning clockwise.
pub fn wrap_180<T>(diff_deg: T) -> T
where
    T: Float
{
    let full: T = T::from(360.0).unwrap_or_else(T::zero);
    let half: T = T::from(180.0).unwrap_or_else(T::zero);

    if !diff_deg.is_finite() {
        return diff_deg;
    }

    let mut d = diff_deg;
    while d > half {
        d = d - full;
    }
    while d < -half {
        d = d + full;
    }
    d
}

/// Force values whose magnitude is below `threshold` to exactly zero.
pub fn apply_deadzone<T>(value: T, threshold: T) -> T
where
    T: Float
{
    if value.abs() < threshold { T::zero() } else { value }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wrap_180() {
        assert_eq!(wrap_180(270f64), -90f64);
        assert_eq!(wrap_180(-270f64), 90f64);
        assert_eq!(wrap_180(180f64), 180f64);
        assert_eq!(wrap_180(-180f64), -180f64);
        assert_eq!(wrap_180(725f64), 5f64);
        assert_eq!(wrap_180(-359f64), 1f64);

        for i in -2000..2000 {
            let d = wrap_180(i as f64 * 0.73);
            assert!(d >= -180.0 && d <= 180.0, "{} out of range", d);
        }
    }

    #[test]
    fn test_wrap_360() {
        assert_eq!(wrap_360(370f64), 10f64);
        assert_eq!(wrap_360(-10f64), 350f64);
        assert_eq!(wrap_360(360f64), 0f64);
        assert_eq!(wrap_360(0f64), 0f64);
    }

    #[test]
    fn test_apply_deadzone() {
        assert_eq!(apply_deadzone(4.9f64, 5.0), 0.0);
        assert_eq!(apply_deadzone(-4.9f64, 5.0), 0.0);
        assert_eq!(apply_deadzone(5.0f64, 5.0), 5.0);
        assert_eq!(apply_deadzone(-63.0f64, 5.0), -63.0);
    }
}
