// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The intermediate-raster writer (spec.md §4.G): streams the four
per-pixel bands — thermal radiance (passed through from the input), τ,
Lu, Ld — to flat binary files registered to the scene's reference band.

Each band is written as `lines * samples` little-endian `f32` values in
row-major order, via `bytemuck`'s checked byte-reinterpretation rather than
an unsafe slice cast.
*/

pub mod error;
pub use error::Error;

use std::fs;
use std::path::Path;

#[cfg(test)]
mod test;

/// No-data sentinel written for pixels with no valid thermal input, or
/// where [`crate::interpolate`] could not form a quadrant. Matches
/// [`crate::interpolate::NO_DATA_VALUE`] cast to `f32`.
pub const NO_DATA_F32: f32 = -9999.0;

/// The four aligned output bands for one scene, each sized
/// `lines * samples`.
#[derive(Debug, Clone)]
pub struct SceneRasters {
    pub lines: usize,
    pub samples: usize,
    pub thermal_radiance: Vec<f32>,
    pub transmittance: Vec<f32>,
    pub upwelled_radiance: Vec<f32>,
    pub downwelled_radiance: Vec<f32>,
}

impl SceneRasters {
    /// Allocate all four bands, filled with the no-data sentinel; callers
    /// overwrite per-pixel as the interpolator runs.
    pub fn new(lines: usize, samples: usize) -> Self {
        let n = lines * samples;
        Self {
            lines,
            samples,
            thermal_radiance: vec![NO_DATA_F32; n],
            transmittance: vec![NO_DATA_F32; n],
            upwelled_radiance: vec![NO_DATA_F32; n],
            downwelled_radiance: vec![NO_DATA_F32; n],
        }
    }

    /// Set one pixel's four values at once; `line`/`sample` are
    /// 0-based against the scene's reference band.
    pub fn set_pixel(&mut self, line: usize, sample: usize, thermal: f32, tau: f32, lu: f32, ld: f32) {
        let idx = line * self.samples + sample;
        self.thermal_radiance[idx] = thermal;
        self.transmittance[idx] = tau;
        self.upwelled_radiance[idx] = lu;
        self.downwelled_radiance[idx] = ld;
    }

    /// Write all four bands to `dir`, using spec.md §6's product names.
    pub fn write_all(&self, dir: &Path) -> Result<(), Error> {
        write_band(&dir.join("thermal_radiance.img"), &self.thermal_radiance, self.lines, self.samples)?;
        write_band(&dir.join("transmittance.img"), &self.transmittance, self.lines, self.samples)?;
        write_band(&dir.join("upwelled_radiance.img"), &self.upwelled_radiance, self.lines, self.samples)?;
        write_band(
            &dir.join("downwelled_radiance.img"),
            &self.downwelled_radiance,
            self.lines,
            self.samples,
        )?;
        Ok(())
    }
}

fn write_band(path: &Path, data: &[f32], lines: usize, samples: usize) -> Result<(), Error> {
    let expected = lines * samples;
    if data.len() != expected {
        return Err(Error::SizeMismatch {
            path: path.display().to_string(),
            lines,
            samples,
            expected,
            actual: data.len(),
        });
    }

    let bytes: &[u8] = bytemuck::cast_slice(data);
    fs::write(path, bytes).map_err(|_| Error::WriteFailed {
        path: path.display().to_string(),
    })
}
