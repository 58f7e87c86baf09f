// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The point-level reducer (spec.md §4.E): for each grid point that ran
MODTRAN, at each configured elevation, collapses three spectrally
tabulated MODTRAN runs into a (τ, Lu, Ld) triple and writes it into the
matching [`crate::modtran::ElevationSlot`].

This is the numerically heaviest component (spec.md allocates it 25% of
the core budget) and the one place in the crate where `rayon` is used:
each grid point's reduction only reads its own MODTRAN subtree and only
writes its own [`crate::modtran::ModtranPoint`], so the loop is sharded
across points with `par_iter`.
*/

pub mod error;
pub use error::Error;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::grid::GridPointStore;
use crate::modtran::{ModtranPoint, ModtranPointStore};
use crate::numeric::{blackbody_radiance, integrate};
use crate::spectral_response::SpectralResponse;

#[cfg(test)]
mod test;

/// Water-body emissivity εw, spec.md §6 "Constants of record".
pub const WATER_EMISSIVITY: f64 = 0.98988;

/// Parse `grid_elevations.txt`: one `elevation_m elevation_dir_tag` line
/// per `run_modtran` grid point, in ascending grid-index order (see
/// DESIGN.md's resolution of the §6 row-association open question).
/// Returns the association keyed by grid point index.
pub fn load_grid_elevations(
    path: &Path,
    grid: &GridPointStore,
) -> Result<HashMap<usize, (f64, i32)>, Error> {
    let path_str = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|_| Error::MissingGridElevations {
        path: path_str.clone(),
    })?;

    let lines: Vec<&str> = contents.lines().filter(|l| !l.trim().is_empty()).collect();
    let run_indices: Vec<usize> = grid
        .points
        .iter()
        .filter(|p| p.run_modtran)
        .map(|p| p.index)
        .collect();

    let mut associations = HashMap::with_capacity(run_indices.len());
    for (line_num, (line, index)) in lines.iter().zip(run_indices.iter()).enumerate() {
        let mut parts = line.split_whitespace();
        let elevation_m: f64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::MalformedGridElevationRow {
                path: path_str.clone(),
                line_num: line_num + 1,
                line: line.to_string(),
            })?;
        let elevation_dir_tag: i32 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::MalformedGridElevationRow {
                path: path_str.clone(),
                line_num: line_num + 1,
                line: line.to_string(),
            })?;
        associations.insert(*index, (elevation_m, elevation_dir_tag));
    }

    Ok(associations)
}

/// The directory for a grid point's MODTRAN output tree:
/// `{row}_{col}_{narr_row}_{narr_col}` (spec.md §5).
fn point_dir(base: &Path, point: &crate::grid::GridPoint) -> PathBuf {
    base.join(format!(
        "{}_{}_{}_{}",
        point.row, point.col, point.narr_row, point.narr_col
    ))
}

/// The `st_modtran.{hdr,data}` directory for one (point, elevation, T,
/// albedo) MODTRAN run: `{elevation:.3f}/{temp:03d}/{albedo:.1f}`.
fn run_dir(point_dir: &Path, elevation_km: f64, temp_k: i32, albedo: f64) -> PathBuf {
    point_dir
        .join(format!("{elevation_km:.3}"))
        .join(format!("{temp_k:03}"))
        .join(format!("{albedo:.1}"))
}

/// One (wavelength, radiance) MODTRAN data file, read as an `N`-row
/// two-column whitespace-separated table.
fn read_data_file(path: &Path) -> Result<(Vec<f64>, Vec<f64>), Error> {
    let path_str = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|_| Error::MissingData {
        path: path_str.clone(),
    })?;

    let mut wavelengths = Vec::new();
    let mut radiances = Vec::new();
    for (line_num, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let w: f64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::MalformedDataRow {
                path: path_str.clone(),
                line_num: line_num + 1,
                line: line.to_string(),
            })?;
        let r: f64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::MalformedDataRow {
                path: path_str.clone(),
                line_num: line_num + 1,
                line: line.to_string(),
            })?;
        wavelengths.push(w);
        radiances.push(r);
    }

    Ok((wavelengths, radiances))
}

/// `st_modtran.hdr`: line 1 is the radiance record count `N`, line 2 is
/// the ground-surface temperature `zero_temp` (K) for the (T=0K,
/// albedo=0.1) run.
fn read_header(path: &Path) -> Result<(usize, f64), Error> {
    let path_str = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|_| Error::MissingHeader {
        path: path_str.clone(),
    })?;

    let lines: Vec<&str> = contents.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() != 2 {
        return Err(Error::MalformedHeader {
            path: path_str,
            lines: lines.len(),
        });
    }

    let count: usize = lines[0]
        .trim()
        .parse()
        .map_err(|_| Error::HeaderNotNumeric {
            path: path_str.clone(),
            line_num: 1,
            line: lines[0].to_string(),
        })?;
    let zero_temp: f64 = lines[1]
        .trim()
        .parse()
        .map_err(|_| Error::HeaderNotNumeric {
            path: path_str.clone(),
            line_num: 2,
            line: lines[1].to_string(),
        })?;

    Ok((count, zero_temp))
}

/// Piecewise-linearly interpolate a MODTRAN (wavelength, radiance) curve
/// onto `targets` (the sensor's response-grid wavelengths).
///
/// spec.md §4.E: MODTRAN wavelengths are assumed monotone *decreasing* by
/// index in the source file ordering; this function verifies the actual
/// direction on each call (cheap relative to the interpolation itself) and
/// walks the array in whichever direction is increasing, rather than
/// assuming decreasing order blindly — a point worth flagging since the
/// spec's own wording calls it an assumption "the implementation must
/// match". Left-of-range and right-of-range targets extrapolate from the
/// nearest two samples instead of clamping (spec.md's explicit "fall back
/// to extrapolation" edge case, distinct from [`crate::numeric::Spline`]'s
/// clamping behavior).
fn interpolate_to_response_grid(wavelengths: &[f64], radiances: &[f64], targets: &[f64]) -> Vec<f64> {
    let n = wavelengths.len();
    debug_assert_eq!(n, radiances.len());

    let ascending = n < 2 || wavelengths[0] <= wavelengths[n - 1];

    let interp_one = |target: f64| -> f64 {
        if n == 0 {
            return 0.0;
        }
        if n == 1 {
            return radiances[0];
        }

        // Work with an ascending view regardless of the source file's
        // actual ordering.
        let at = |i: usize| -> (f64, f64) {
            if ascending {
                (wavelengths[i], radiances[i])
            } else {
                (wavelengths[n - 1 - i], radiances[n - 1 - i])
            }
        };

        if target <= at(0).0 {
            let (x0, y0) = at(0);
            let (x1, y1) = at(1);
            return linear_extrap(x0, y0, x1, y1, target);
        }
        if target >= at(n - 1).0 {
            let (x0, y0) = at(n - 2);
            let (x1, y1) = at(n - 1);
            return linear_extrap(x0, y0, x1, y1, target);
        }

        let mut lo = 0usize;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if at(mid).0 <= target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let (x0, y0) = at(lo);
        let (x1, y1) = at(hi);
        linear_extrap(x0, y0, x1, y1, target)
    };

    targets.iter().map(|&t| interp_one(t)).collect()
}

fn linear_extrap(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    if x1 == x0 {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Band-integrated radiance: ∫ f(λ)·R(λ) dλ / ∫ R(λ) dλ over the
/// response grid.
fn band_integrate(response: &SpectralResponse, f: &[f64]) -> Result<f64, error::Error> {
    let numerator: Vec<f64> = f
        .iter()
        .zip(&response.response)
        .map(|(v, r)| v * r)
        .collect();
    let num = integrate(&response.wavelength_um, &numerator)?;
    let den = integrate(&response.wavelength_um, &response.response)?;
    Ok(num / den)
}

impl From<crate::numeric::Error> for Error {
    fn from(source: crate::numeric::Error) -> Self {
        // Wrapped with point/elevation context by callers that know it;
        // this blanket conversion exists so `?` composes inside helpers
        // that don't (band_integrate above).
        Error::Numeric {
            index: usize::MAX,
            elevation_km: f64::NAN,
            source,
        }
    }
}

/// Reduce a single (point, elevation): read the three MODTRAN runs, solve
/// for (τ, Lu), then Ld. `lt_273`/`lt_310` are precomputed once per scene
/// (they depend only on the sensor response, invariant across points and
/// elevations).
#[allow(clippy::too_many_arguments)]
fn reduce_one(
    base_dir: &Path,
    point: &crate::grid::GridPoint,
    elevation_km: f64,
    response: &SpectralResponse,
    lt_273: f64,
    lt_310: f64,
) -> Result<(f64, f64, f64), Error> {
    let point_dir = point_dir(base_dir, point);

    let dir_0k = run_dir(&point_dir, elevation_km, 0, 0.1);
    let (count, zero_temp) = read_header(&dir_0k.join("st_modtran.hdr"))?;

    let dir_273 = run_dir(&point_dir, elevation_km, 273, 0.0);
    let dir_310 = run_dir(&point_dir, elevation_km, 310, 0.0);

    let (wavelengths, rad_273) = read_data_file(&dir_273.join("st_modtran.data"))?;
    let (_, rad_310) = read_data_file(&dir_310.join("st_modtran.data"))?;
    let (_, rad_0k) = read_data_file(&dir_0k.join("st_modtran.data"))?;

    for (name, radiances) in [("273K", &rad_273), ("310K", &rad_310), ("0K", &rad_0k)] {
        if radiances.len() != count {
            return Err(Error::RowCountMismatch {
                path: format!("{} ({name} run)", point_dir.display()),
                declared: count,
                found: radiances.len(),
            });
        }
    }

    let lobs_273 = interpolate_to_response_grid(&wavelengths, &rad_273, &response.wavelength_um);
    let lobs_310 = interpolate_to_response_grid(&wavelengths, &rad_310, &response.wavelength_um);
    let lobs_0k = interpolate_to_response_grid(&wavelengths, &rad_0k, &response.wavelength_um);

    let l_obs_1 = band_integrate(response, &lobs_273).map_err(|e| wrap(e, point.index, elevation_km))?;
    let l_obs_2 = band_integrate(response, &lobs_310).map_err(|e| wrap(e, point.index, elevation_km))?;
    let l_obs_3 = band_integrate(response, &lobs_0k).map_err(|e| wrap(e, point.index, elevation_km))?;

    let lt_zero = if zero_temp <= 0.0 {
        0.0
    } else {
        let b = blackbody_radiance(&response.wavelength_um, zero_temp);
        band_integrate(response, &b).map_err(|e| wrap(e, point.index, elevation_km))?
    };

    solve_tau_lu_ld(lt_273, lt_310, lt_zero, l_obs_1, l_obs_2, l_obs_3, point.index, elevation_km)
}

/// Solve the 2-equation linear system for (τ, Lu), then Ld from the
/// water-body radiance equation, per spec.md §4.E points 5-6. Pulled out
/// of [`reduce_one`] as a pure function of the six band-integrated
/// radiances so the algebra itself is directly testable (spec.md §8
/// scenarios 3 and 4) without standing up a MODTRAN output tree.
#[allow(clippy::too_many_arguments)]
fn solve_tau_lu_ld(
    lt_273: f64,
    lt_310: f64,
    lt_zero: f64,
    l_obs_1: f64,
    l_obs_2: f64,
    l_obs_3: f64,
    index: usize,
    elevation_km: f64,
) -> Result<(f64, f64, f64), Error> {
    let delta = lt_310 - lt_273;
    if delta.abs() < f64::EPSILON {
        return Err(Error::SingularSystem { index, elevation_km });
    }

    let tau = (l_obs_2 - l_obs_1) / delta;
    let lu = (lt_310 * l_obs_1 - lt_273 * l_obs_2) / delta;

    let albedo_w = 1.0 - WATER_EMISSIVITY;
    if albedo_w.abs() < f64::EPSILON {
        return Err(Error::ZeroAlbedo { index, elevation_km });
    }
    let ld = ((l_obs_3 - lu) / tau - lt_zero * WATER_EMISSIVITY) / albedo_w;

    Ok((tau, lu, ld))
}

fn wrap(e: Error, index: usize, elevation_km: f64) -> Error {
    match e {
        Error::Numeric { source, .. } => Error::Numeric {
            index,
            elevation_km,
            source,
        },
        other => other,
    }
}

/// Run the reducer over every `run_modtran` point in `store`, writing
/// (τ, Lu, Ld) into each of its elevation slots. Sharded across points
/// with `rayon`; each point's slots are written only by that point's
/// task. Lt(273)/Lt(310) are computed once up front since they depend
/// only on `response` (spec.md §4.E point 3).
///
/// Fails hard: spec.md §7 requires the whole scene to fail if any
/// point's elevation slot cannot be filled, so the first error any task
/// observes propagates and no partially updated store is returned.
pub fn reduce_all(
    store: &mut ModtranPointStore,
    base_dir: &Path,
    response: &SpectralResponse,
) -> Result<(), Error> {
    let lt_273 = band_integrate(response, &blackbody_radiance(&response.wavelength_um, 273.0))?;
    let lt_310 = band_integrate(response, &blackbody_radiance(&response.wavelength_um, 310.0))?;

    let results: Vec<Result<ModtranPoint, Error>> = store
        .points
        .par_iter()
        .map(|p| reduce_point(base_dir, p, response, lt_273, lt_310))
        .collect();

    let mut updated = Vec::with_capacity(results.len());
    for r in results {
        updated.push(r?);
    }
    store.points = updated;
    Ok(())
}

fn reduce_point(
    base_dir: &Path,
    point: &ModtranPoint,
    response: &SpectralResponse,
    lt_273: f64,
    lt_310: f64,
) -> Result<ModtranPoint, Error> {
    if !point.ran_modtran {
        return Ok(point.clone());
    }

    let mut out = point.clone();
    for slot in &mut out.elevations {
        let (tau, lu, ld) =
            reduce_one(base_dir, &point.point, slot.elevation_km, response, lt_273, lt_310)?;
        slot.transmission = tau;
        slot.upwelled_radiance = lu;
        slot.downwelled_radiance = ld;
    }
    Ok(out)
}
