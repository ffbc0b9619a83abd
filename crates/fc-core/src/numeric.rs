use crate::{CoreError, CoreResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Smallest positive value a physical quantity is allowed to take inside
/// derivative evaluation.
pub const PHYSICAL_FLOOR: Real = 1e-6;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Require a finite, strictly positive value.
pub fn ensure_positive(v: Real, what: &'static str) -> CoreResult<Real> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}

/// Raise `v` to at least `floor`.
///
/// Unlike `f64::max`, a NaN input stays NaN so that modeling problems remain
/// visible in the output instead of being replaced by the floor.
#[inline]
pub fn floor_positive(v: Real, floor: Real) -> Real {
    if v < floor { floor } else { v }
}

/// Divide with the denominator floored at `eps`.
#[inline]
pub fn safe_div(num: Real, den: Real, eps: Real) -> Real {
    num / floor_positive(den, eps)
}

/// Number of fixed steps needed to cover `[t0, t_final]` with step `dt`.
///
/// This is `ceil((t_final - t0) / dt)`, except that a ratio within floating
/// point tolerance of a positive integer snaps to that integer (so `1.0 / 0.1`
/// is 10 steps, not 11). Any horizon past `t0` takes at least one step.
pub fn step_count(t0: Real, t_final: Real, dt: Real) -> CoreResult<usize> {
    let t0 = ensure_finite(t0, "t0")?;
    let t_final = ensure_finite(t_final, "t_final")?;
    let dt = ensure_positive(dt, "dt must be finite and positive")?;
    if t_final < t0 {
        return Err(CoreError::InvalidArg {
            what: "t_final must not precede t0",
        });
    }

    let ratio = (t_final - t0) / dt;
    let nearest = ratio.round();
    let steps = if nearest >= 1.0 && nearly_equal(ratio, nearest, Tolerances::default()) {
        nearest
    } else {
        ratio.ceil()
    };
    let steps = ensure_finite(steps, "step count")? as usize;
    if t_final > t0 {
        Ok(steps.max(1))
    } else {
        Ok(steps)
    }
}

/// Time of grid point `k`, computed without accumulating round-off.
#[inline]
pub fn grid_time(t0: Real, dt: Real, k: usize) -> Real {
    t0 + k as Real * dt
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive(0.0, "x").is_err());
        assert!(ensure_positive(-1.0, "x").is_err());
        assert!(ensure_positive(Real::INFINITY, "x").is_err());
        assert_eq!(ensure_positive(2.5, "x").unwrap(), 2.5);
    }

    #[test]
    fn floor_keeps_nan_visible() {
        assert_eq!(floor_positive(-3.0, PHYSICAL_FLOOR), PHYSICAL_FLOOR);
        assert_eq!(floor_positive(0.5, PHYSICAL_FLOOR), 0.5);
        assert!(floor_positive(Real::NAN, PHYSICAL_FLOOR).is_nan());
    }

    #[test]
    fn safe_div_guards_zero_denominator() {
        assert_eq!(safe_div(1.0, 0.0, 1e-3), 1000.0);
        assert_eq!(safe_div(1.0, 4.0, 1e-3), 0.25);
    }

    #[test]
    fn step_count_snaps_to_integer_ratio() {
        assert_eq!(step_count(0.0, 1.0, 0.1).unwrap(), 10);
        assert_eq!(step_count(0.0, 0.3, 0.1).unwrap(), 3);
        assert_eq!(step_count(0.0, 0.7, 0.1).unwrap(), 7);
        assert_eq!(step_count(0.0, 2.0, 0.01).unwrap(), 200);
    }

    #[test]
    fn step_count_rounds_partial_step_up() {
        assert_eq!(step_count(0.0, 1.05, 0.1).unwrap(), 11);
        assert_eq!(step_count(0.0, 0.0, 0.1).unwrap(), 0);
    }

    #[test]
    fn tiny_horizon_still_takes_one_step() {
        assert_eq!(step_count(0.0, 1e-14, 1.0).unwrap(), 1);
        assert_eq!(step_count(0.0, 4e-13, 1.0).unwrap(), 1);
        assert_eq!(step_count(2.0, 2.0 + 1e-12, 0.5).unwrap(), 1);
        // ratio underflows to zero
        assert_eq!(step_count(0.0, 1e-320, 1e10).unwrap(), 1);
    }

    #[test]
    fn step_count_rejects_bad_arguments() {
        assert!(step_count(0.0, 1.0, 0.0).is_err());
        assert!(step_count(0.0, 1.0, -0.1).is_err());
        assert!(step_count(1.0, 0.0, 0.1).is_err());
        assert!(step_count(0.0, Real::NAN, 0.1).is_err());
    }

    #[test]
    fn grid_time_is_exact_multiple() {
        assert_eq!(grid_time(0.0, 0.1, 0), 0.0);
        assert!(nearly_equal(grid_time(0.0, 0.1, 10), 1.0, Tolerances::default()));
    }

    proptest! {
        #[test]
        fn step_grid_covers_horizon(span in 0.0f64..100.0, dt in 1e-3f64..1.0) {
            let steps = step_count(0.0, span, dt).unwrap();
            let end = grid_time(0.0, dt, steps);
            prop_assert!(end >= span - 1e-9 * span.max(1.0));
            prop_assert!(end < span + dt + 1e-9);
        }
    }
}
