// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The two delimited text outputs spec.md §6 requires alongside the
intermediate rasters: `atmospheric_parameters.txt` (one row per
`(point, elevation)` that ran MODTRAN) and `used_points.txt` (the
`run_modtran` points themselves, pipe-and-quote-delimited).

Both are written with the `csv` crate rather than hand-rolled string
formatting.
*/

pub mod error;
pub use error::Error;

use std::path::Path;

use csv::WriterBuilder;

use crate::grid::GridPointStore;
use crate::modtran::ModtranPointStore;

#[cfg(test)]
mod test;

/// Numeric fields in both outputs are formatted to 12 decimal digits of
/// precision, per spec.md §6.
fn fmt12(v: f64) -> String {
    format!("{v:.12}")
}

/// Write `atmospheric_parameters.txt`: `lat,lon,elevation_km,tau,lu,ld`,
/// one row per `(point, elevation)` slot belonging to a `run_modtran`
/// point.
pub fn write_atmospheric_parameters(path: &Path, store: &ModtranPointStore) -> Result<(), Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|_| Error::CreateFailed {
            path: path.display().to_string(),
        })?;

    for point in &store.points {
        if !point.ran_modtran {
            continue;
        }
        for slot in &point.elevations {
            writer
                .write_record([
                    fmt12(point.point.lat),
                    fmt12(point.point.lon),
                    fmt12(slot.elevation_km),
                    fmt12(slot.transmission),
                    fmt12(slot.upwelled_radiance),
                    fmt12(slot.downwelled_radiance),
                ])
                .map_err(|e| Error::WriteFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
        }
    }

    writer.flush().map_err(|e| Error::WriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Write `used_points.txt`: `"index"|"map_x"|"map_y"`, one row per
/// `run_modtran` grid point.
pub fn write_used_points(path: &Path, store: &GridPointStore) -> Result<(), Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(b'|')
        .quote_style(csv::QuoteStyle::Always)
        .from_path(path)
        .map_err(|_| Error::CreateFailed {
            path: path.display().to_string(),
        })?;

    for point in &store.points {
        if !point.run_modtran {
            continue;
        }
        writer
            .write_record([point.index.to_string(), fmt12(point.map_x), fmt12(point.map_y)])
            .map_err(|e| Error::WriteFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
    }

    writer.flush().map_err(|e| Error::WriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
