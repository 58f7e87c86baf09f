// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The NARR grid-point store: a structured lat/lon mesh loaded from
`grid_points.hdr` and `grid_points.bin`.
*/

pub mod error;
pub use error::Error;

use std::fs;
use std::path::Path;

use bytemuck::{Pod, Zeroable};


/// On-disk layout of one grid point record in `grid_points.bin`. Field
/// order is chosen so the struct has no interior padding (f64 fields
/// first, keeping every i32 field 4-byte aligned with no gaps) — the fixed
/// per-record size spec.md §6 asks the core to assert, not derive.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct GridPointRecord {
    lon: f64,
    lat: f64,
    map_x: f64,
    map_y: f64,
    row: i32,
    col: i32,
    narr_row: i32,
    narr_col: i32,
    index: i32,
    run_modtran: i32,
}

/// A point on the structured lat/lon mesh, per spec.md §3.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPoint {
    /// 0-based row within the mesh.
    pub row: usize,
    /// 0-based column within the mesh.
    pub col: usize,
    /// Upstream NARR row identifier.
    pub narr_row: i32,
    /// Upstream NARR column identifier.
    pub narr_col: i32,
    /// Longitude, decimal degrees.
    pub lon: f64,
    /// Latitude, decimal degrees.
    pub lat: f64,
    /// Projected easting, metres, in the scene's projection.
    pub map_x: f64,
    /// Projected northing, metres, in the scene's projection.
    pub map_y: f64,
    /// Flat index into the mesh; `index == row * cols + col`.
    pub index: usize,
    /// Whether this point's columns lie within the scene bounds and
    /// MODTRAN was executed for it.
    pub run_modtran: bool,
}

/// The full grid, with its row/column shape.
#[derive(Debug, Clone)]
pub struct GridPointStore {
    pub rows: usize,
    pub cols: usize,
    pub points: Vec<GridPoint>,
}

impl GridPointStore {
    /// Load the grid from `{dir}/grid_points.hdr` and
    /// `{dir}/grid_points.bin`.
    pub fn load(dir: &Path) -> Result<Self, Error> {
        let hdr_path = dir.join("grid_points.hdr");
        let bin_path = dir.join("grid_points.bin");

        let (count, rows, cols) = Self::load_header(&hdr_path)?;
        let points = Self::load_records(&bin_path, count)?;

        Ok(Self { rows, cols, points })
    }

    fn load_header(path: &Path) -> Result<(usize, usize, usize), Error> {
        let path_str = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|_| Error::MissingHeader {
            path: path_str.clone(),
        })?;

        let lines: Vec<&str> = contents.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.len() != 3 {
            return Err(Error::MalformedHeader {
                path: path_str,
                lines: lines.len(),
            });
        }

        let parse_line = |idx: usize| -> Result<usize, Error> {
            lines[idx]
                .trim()
                .parse::<usize>()
                .map_err(|_| Error::HeaderNotInteger {
                    path: path_str.clone(),
                    line_num: idx + 1,
                    line: lines[idx].to_string(),
                })
        };

        let count = parse_line(0)?;
        let rows = parse_line(1)?;
        let cols = parse_line(2)?;

        if rows * cols != count {
            return Err(Error::HeaderInconsistent {
                path: path_str,
                expected: rows * cols,
                count,
            });
        }

        Ok((count, rows, cols))
    }

    fn load_records(path: &Path, count: usize) -> Result<Vec<GridPoint>, Error> {
        let path_str = path.display().to_string();
        let bytes = fs::read(path).map_err(|_| Error::MissingRecords {
            path: path_str.clone(),
        })?;

        let record_size = std::mem::size_of::<GridPointRecord>();
        let expected_bytes = count * record_size;
        if bytes.len() != expected_bytes {
            return Err(Error::RecordSizeMismatch {
                path: path_str,
                expected: count,
                record_size,
                expected_bytes,
                actual_bytes: bytes.len(),
            });
        }

        // `fs::read`'s buffer alignment is not guaranteed, and `cast_slice`
        // panics on a misaligned pointer rather than erroring; `try_cast_slice`
        // reports the same condition as a `Result` so a misaligned read fails
        // gracefully instead of aborting.
        let records: &[GridPointRecord] =
            bytemuck::try_cast_slice(&bytes).map_err(|_| Error::MisalignedRecords { path: path_str })?;

        let mut points = Vec::with_capacity(count);
        for r in records {
            points.push(GridPoint {
                row: r.row as usize,
                col: r.col as usize,
                narr_row: r.narr_row,
                narr_col: r.narr_col,
                lon: r.lon,
                lat: r.lat,
                map_x: r.map_x,
                map_y: r.map_y,
                index: r.index as usize,
                run_modtran: r.run_modtran != 0,
            });
        }

        Ok(points)
    }

    /// The point directly "below" `index` in mesh coordinates, or `None`
    /// if `index` is in the first row.
    pub fn below(&self, index: usize) -> Option<usize> {
        if index >= self.cols {
            Some(index - self.cols)
        } else {
            None
        }
    }
}
