// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Tabulated integration via 5-point Newton-Cotes (Boole's rule) over a
resampled natural cubic spline.
*/

use super::error::Error;
use super::spline::Spline;

/// Integrate tabulated `(x[i], f[i])` samples over `[x[0], x[n-1]]`.
///
/// Expands the segment count to the next multiple of 4, builds a natural
/// cubic spline of `f` over `x`, resamples at `segments + 1` equally spaced
/// points, then sums the Boole-rule contribution of each block of 5
/// consecutive resampled values.
///
/// # Arguments
///
/// * `x` - strictly increasing sample positions. Must have at least 5
///   points (spec.md §4.A: "callers must supply at least 5 points").
///
/// * `f` - sample values, same length as `x`.
///
/// # Returns
///
/// * the definite integral of the spline-resampled function over
///   `[x[0], x[n-1]]`.
pub fn integrate(x: &[f64], f: &[f64]) -> Result<f64, Error> {
    let n = x.len();
    if n < 5 {
        return Err(Error::TooFewSamples {
            function: "integrate",
            minimum: 5,
            actual: n,
        });
    }

    let raw_segments = n - 1;
    let segments = raw_segments.div_ceil(4) * 4;

    let spline = Spline::new(x, f, 1.0e31, 1.0e31)?;

    let x0 = x[0];
    let xn = x[n - 1];
    let h = (xn - x0) / segments as f64;

    let resampled_len = segments + 1;
    let mut resampled: Vec<f64> = Vec::new();
    resampled
        .try_reserve_exact(resampled_len)
        .map_err(|_| Error::ResourceExhausted {
            function: "integrate",
            requested: resampled_len,
        })?;
    for j in 0..resampled_len {
        let xj = x0 + j as f64 * h;
        resampled.push(spline.eval(xj));
    }

    let mut total = 0.0_f64;
    let mut k = 0usize;
    while k + 4 < resampled_len {
        let z0 = resampled[k];
        let z1 = resampled[k + 1];
        let z2 = resampled[k + 2];
        let z3 = resampled[k + 3];
        let z4 = resampled[k + 4];
        total += 14.0 * (z0 + z4) + 64.0 * (z1 + z3) + 24.0 * z2;
        k += 4;
    }

    Ok(total * h / 45.0)
}
