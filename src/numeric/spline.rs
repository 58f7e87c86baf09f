// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Natural cubic spline construction and evaluation.

spec.md §9's "Global state" redesign flag calls out an upstream analogue
that kept last-bracketing indices between calls as a monotone-query
optimisation. That state is rebound here to the `Spline` object itself
rather than carried implicitly between unrelated calls: `eval` takes
`&self` and re-derives its bracket on every call, which is the correct
default until profiling shows a monotone-query caller (the integrator
resamples left to right, but the straightforward binary search is not the
bottleneck at the sample counts spec.md describes).
*/

use super::error::Error;

/// A natural (or clamped) cubic spline over strictly increasing knots.
#[derive(Debug, Clone)]
pub struct Spline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivatives at each knot, from the tridiagonal solve.
    y2: Vec<f64>,
}

impl Spline {
    /// Build a natural cubic spline through `(x[i], y[i])`.
    ///
    /// # Arguments
    ///
    /// * `x` - strictly increasing knot positions.
    ///
    /// * `y` - values at each knot, same length as `x`.
    ///
    /// * `yp1` - first-derivative boundary condition at `x[0]`. Values with
    ///   magnitude greater than 1e30 request the "natural" boundary
    ///   (second derivative zero) instead of a clamped first derivative.
    ///
    /// * `ypn` - same as `yp1`, at the last knot.
    ///
    /// # Returns
    ///
    /// * a `Spline` ready for [`Spline::eval`], or an error if `x`/`y`
    ///   mismatch in length, have fewer than 2 points, or `x` is not
    ///   strictly increasing.
    pub fn new(x: &[f64], y: &[f64], yp1: f64, ypn: f64) -> Result<Self, Error> {
        if x.len() != y.len() {
            return Err(Error::InvalidInput {
                function: "Spline::new",
                reason: format!("x has {} points, y has {}", x.len(), y.len()),
            });
        }
        let n = x.len();
        if n < 2 {
            return Err(Error::TooFewSamples {
                function: "Spline::new",
                minimum: 2,
                actual: n,
            });
        }
        for i in 1..n {
            if x[i] <= x[i - 1] {
                return Err(Error::InvalidInput {
                    function: "Spline::new",
                    reason: "x must be strictly increasing".to_string(),
                });
            }
        }

        let mut y2 = vec![0.0_f64; n];
        let mut u = vec![0.0_f64; n];

        const NATURAL_THRESHOLD: f64 = 1.0e30;

        if yp1.abs() > NATURAL_THRESHOLD {
            y2[0] = 0.0;
            u[0] = 0.0;
        } else {
            y2[0] = -0.5;
            u[0] = (3.0 / (x[1] - x[0])) * ((y[1] - y[0]) / (x[1] - x[0]) - yp1);
        }

        for i in 1..n - 1 {
            let sig = (x[i] - x[i - 1]) / (x[i + 1] - x[i - 1]);
            let p = sig * y2[i - 1] + 2.0;
            y2[i] = (sig - 1.0) / p;
            u[i] = (y[i + 1] - y[i]) / (x[i + 1] - x[i]) - (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
            u[i] = (6.0 * u[i] / (x[i + 1] - x[i - 1]) - sig * u[i - 1]) / p;
        }

        let (qn, un) = if ypn.abs() > NATURAL_THRESHOLD {
            (0.0, 0.0)
        } else {
            let qn = 0.5;
            let un = (3.0 / (x[n - 1] - x[n - 2]))
                * (ypn - (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]));
            (qn, un)
        };

        y2[n - 1] = (un - qn * u[n - 2]) / (qn * y2[n - 2] + 1.0);
        for k in (0..n - 1).rev() {
            y2[k] = y2[k] * y2[k + 1] + u[k];
        }

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            y2,
        })
    }

    /// Evaluate the spline at `x_query`.
    ///
    /// `x_query` outside `[x[0], x[n-1]]` clamps to the nearest end value
    /// rather than extrapolating, per spec.md §4.A.
    pub fn eval(&self, x_query: f64) -> f64 {
        let n = self.x.len();
        if x_query <= self.x[0] {
            return self.y[0];
        }
        if x_query >= self.x[n - 1] {
            return self.y[n - 1];
        }

        // Binary search for the bracketing interval [lo, hi].
        let mut lo = 0usize;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.x[mid] > x_query {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let h = self.x[hi] - self.x[lo];
        if h == 0.0 {
            return 0.0;
        }

        let a = (self.x[hi] - x_query) / h;
        let b = (x_query - self.x[lo]) / h;

        a * self.y[lo]
            + b * self.y[hi]
            + ((a.powi(3) - a) * self.y2[lo] + (b.powi(3) - b) * self.y2[hi]) * (h * h) / 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_spline_evaluates_at_knots() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
        let spline = Spline::new(&x, &y, 1.0e31, 1.0e31).unwrap();
        for (xi, yi) in x.iter().zip(y.iter()) {
            let got = spline.eval(*xi);
            assert!(approx_eq!(f64, got, *yi, epsilon = 1e-12), "got {got} want {yi}");
        }
    }

    #[test]
    fn test_spline_clamps_outside_range() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y = vec![0.0, 1.0, 4.0, 9.0];
        let spline = Spline::new(&x, &y, 1.0e31, 1.0e31).unwrap();
        assert_eq!(spline.eval(-5.0), 0.0);
        assert_eq!(spline.eval(100.0), 9.0);
    }

    #[test]
    fn test_spline_linear_data_is_linear() {
        let x = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let y = vec![0.0, 2.0, 4.0, 6.0, 8.0];
        let spline = Spline::new(&x, &y, 1.0e31, 1.0e31).unwrap();
        for i in 0..=40 {
            let xq = i as f64 * 0.1;
            let got = spline.eval(xq);
            assert!(approx_eq!(f64, got, 2.0 * xq, epsilon = 1e-9), "got {got} at {xq}");
        }
    }

    #[test]
    fn test_spline_rejects_mismatched_lengths() {
        let err = Spline::new(&[0.0, 1.0], &[0.0], 1.0e31, 1.0e31).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_spline_rejects_non_increasing_x() {
        let err = Spline::new(&[0.0, 1.0, 0.5], &[0.0, 1.0, 2.0], 1.0e31, 1.0e31).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_spline_rejects_too_few_points() {
        let err = Spline::new(&[0.0], &[0.0], 1.0e31, 1.0e31).unwrap_err();
        assert!(matches!(err, Error::TooFewSamples { .. }));
        assert_eq!(err.kind(), crate::error::ErrorKind::Domain);
    }
}
