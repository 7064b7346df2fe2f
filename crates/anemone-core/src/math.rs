//! Small numeric helpers shared by the engine.
//!
//! All functions are allocation-free and `no_std` friendly.

use libm::tanh;

/// Drive below which [`tanh_clip`] passes the signal through unchanged.
///
/// `tanh(d * x) / tanh(d)` tends to `x` as `d` tends to zero, but the ratio
/// itself is `0 / 0` at `d = 0`.
const MIN_DRIVE: f64 = 1e-6;

/// Linear interpolation between two values.
///
/// Returns exactly `a` at `t = 0` and exactly `b` at `t = 1`.
///
/// # Example
/// ```rust
/// use anemone_core::lerp;
///
/// assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
/// assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
/// ```
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

/// Maps `value` linearly from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// No clamping is applied; values outside the input range extrapolate.
///
/// # Example
/// ```rust
/// use anemone_core::map_range;
///
/// assert!((map_range(0.5, 0.0, 1.0, 0.0, 10.0) - 5.0).abs() < 1e-12);
/// ```
#[inline]
pub fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    out_min + (out_max - out_min) * ((value - in_min) / (in_max - in_min))
}

/// Normalized tanh soft clipper.
///
/// Computes `tanh(drive * x) / tanh(drive)`, which keeps full scale at full
/// scale (`x = ±1` maps to `±1`) while bending everything in between. Low
/// drive is nearly linear; high drive saturates hard. Output magnitude is
/// bounded by `1 / tanh(drive)` for any input.
///
/// Drives at or below a tiny threshold return `x` unchanged.
///
/// # Example
/// ```rust
/// use anemone_core::tanh_clip;
///
/// assert!((tanh_clip(1.0, 5.0) - 1.0).abs() < 1e-12);
/// assert!(tanh_clip(10.0, 5.0) < 1.01);
/// assert_eq!(tanh_clip(0.3, 0.0), 0.3);
/// ```
#[inline]
pub fn tanh_clip(x: f64, drive: f64) -> f64 {
    if drive <= MIN_DRIVE {
        x
    } else {
        tanh(drive * x) / tanh(drive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_exact() {
        assert_eq!(lerp(-0.75, 0.25, 0.0), -0.75);
        assert_eq!(lerp(-0.75, 0.25, 1.0), 0.25);
    }

    #[test]
    fn map_range_feedback_mapping() {
        assert_eq!(map_range(0.0, 0.0, 1.0, 0.0, 0.99), 0.0);
        assert!((map_range(1.0, 0.0, 1.0, 0.0, 0.99) - 0.99).abs() < 1e-15);
    }

    #[test]
    fn tanh_clip_is_odd() {
        for &x in &[0.1, 0.5, 1.0, 3.0] {
            assert!((tanh_clip(x, 4.0) + tanh_clip(-x, 4.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn tanh_clip_bounded_by_inverse_tanh_drive() {
        let drive = 2.0;
        let bound = 1.0 / tanh(drive);
        for &x in &[1.0, 5.0, 100.0, -1e6] {
            assert!(tanh_clip(x, drive).abs() <= bound + 1e-12);
        }
    }

    #[test]
    fn tanh_clip_low_drive_nearly_linear() {
        // Drive seeded from the soft clip floor.
        let drive = 0.01;
        for &x in &[-0.8, -0.2, 0.0, 0.4, 0.9] {
            assert!((tanh_clip(x, drive) - x).abs() < 1e-4, "x={x}");
        }
    }

    #[test]
    fn tanh_clip_zero_drive_passthrough() {
        assert_eq!(tanh_clip(0.123, 0.0), 0.123);
        assert!(tanh_clip(0.5, 0.0).is_finite());
    }
}
