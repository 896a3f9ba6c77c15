//! Central finite-difference estimators.
//!
//! Only the two estimators the numeric derivative mode needs. Both have
//! `O(h²)` truncation error; the second derivative loses precision quickly
//! for steps below ~1e-5 in `f64`.

/// First derivative: `(f(x+h) - f(x-h)) / 2h`.
#[inline]
pub fn central_first(f: impl Fn(f64) -> f64, x: f64, h: f64) -> f64 {
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// Second derivative: `(f(x+h) - 2f(x) + f(x-h)) / h²`.
#[inline]
pub fn central_second(f: impl Fn(f64) -> f64, x: f64, h: f64) -> f64 {
    (f(x + h) - 2.0 * f(x) + f(x - h)) / (h * h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cubic_derivatives() {
        let f = |x: f64| x * x * x;
        assert_abs_diff_eq!(central_first(f, 2.0, 1e-5), 12.0, epsilon = 1e-6);
        assert_abs_diff_eq!(central_second(f, 2.0, 1e-4), 12.0, epsilon = 1e-4);
    }

    #[test]
    fn exp_derivatives() {
        let x = 0.3f64;
        assert_abs_diff_eq!(central_first(f64::exp, x, 1e-5), x.exp(), epsilon = 1e-8);
        assert_abs_diff_eq!(central_second(f64::exp, x, 1e-4), x.exp(), epsilon = 1e-5);
    }
}
