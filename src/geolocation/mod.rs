// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The geolocation collaborator: per-pixel (longitude, latitude) and
(easting, northing) lookup for the reference band.

spec.md §1 explicitly excludes map-projection math from this crate's
scope ("handling map projections (delegated to a geolocation
collaborator)"); [`crate::interpolate`] only needs *some* concrete source
of those four values per pixel, so this module defines the seam as a
trait with one concrete, file-backed implementation rather than hand-rolling
a projector.
*/

pub mod error;
pub use error::Error;

use std::fs;
use std::path::Path;

#[cfg(test)]
mod test;

/// One pixel's geographic coordinates. spec.md §4.F point 2 derives map
/// projection coordinates (easting/northing) separately, from the scene's
/// UL corner and pixel size (see [`crate::interpolate::SceneGeometry`]);
/// only longitude/latitude come from this collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelLocation {
    pub lon: f64,
    pub lat: f64,
}

/// Seam for per-pixel geolocation, so the interpolator never depends on a
/// concrete projection implementation.
pub trait PixelGeolocation {
    fn lines(&self) -> usize;
    fn samples(&self) -> usize;

    /// Geolocate `(line, sample)`. Implementations should return
    /// [`Error::OutOfBounds`] rather than panicking when asked for a
    /// pixel outside the raster's extent.
    fn locate(&self, line: usize, sample: usize) -> Result<PixelLocation, Error>;
}

/// A geolocation source backed by two pre-generated flat `f64` rasters
/// (lon, lat), each `lines * samples` values in row-major order. Producing
/// these rasters (running the actual map projection) is outside this
/// crate's scope; this reader only consumes them.
#[derive(Debug, Clone)]
pub struct PrecomputedGeolocation {
    lines: usize,
    samples: usize,
    lon: Vec<f64>,
    lat: Vec<f64>,
}

impl PrecomputedGeolocation {
    /// Load the two rasters from `lon_path`/`lat_path`, each expected to
    /// hold exactly `lines * samples` little-endian `f64` values.
    pub fn load(lon_path: &Path, lat_path: &Path, lines: usize, samples: usize) -> Result<Self, Error> {
        Ok(Self {
            lines,
            samples,
            lon: read_flat_f64(lon_path, lines, samples)?,
            lat: read_flat_f64(lat_path, lines, samples)?,
        })
    }

    /// Build directly from in-memory rasters (used by tests and by
    /// callers that already have the arrays in hand).
    pub fn from_arrays(lines: usize, samples: usize, lon: Vec<f64>, lat: Vec<f64>) -> Self {
        Self {
            lines,
            samples,
            lon,
            lat,
        }
    }
}

impl PixelGeolocation for PrecomputedGeolocation {
    fn lines(&self) -> usize {
        self.lines
    }

    fn samples(&self) -> usize {
        self.samples
    }

    fn locate(&self, line: usize, sample: usize) -> Result<PixelLocation, Error> {
        if line >= self.lines || sample >= self.samples {
            return Err(Error::OutOfBounds {
                line,
                sample,
                lines: self.lines,
                samples: self.samples,
            });
        }
        let idx = line * self.samples + sample;
        Ok(PixelLocation {
            lon: self.lon[idx],
            lat: self.lat[idx],
        })
    }
}

fn read_flat_f64(path: &Path, lines: usize, samples: usize) -> Result<Vec<f64>, Error> {
    let path_str = path.display().to_string();
    let bytes = fs::read(path).map_err(|_| Error::MissingFile {
        path: path_str.clone(),
    })?;

    let expected = lines * samples * std::mem::size_of::<f64>();
    if bytes.len() != expected {
        return Err(Error::SizeMismatch {
            path: path_str,
            lines,
            samples,
            expected,
            actual: bytes.len(),
        });
    }

    // `fs::read`'s buffer alignment is not guaranteed, and `cast_slice`
    // panics on a misaligned pointer rather than erroring; `try_cast_slice`
    // reports the same condition as a `Result` so a misaligned read fails
    // gracefully instead of aborting.
    let values: &[f64] = bytemuck::try_cast_slice(&bytes).map_err(|_| Error::Misaligned { path: path_str })?;
    Ok(values.to_vec())
}
