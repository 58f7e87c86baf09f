// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::*;
use crate::grid::GridPoint;
use crate::modtran::{ElevationSlot, ModtranPoint};
use std::fs;
use tempdir::TempDir;

fn sample_grid_store() -> GridPointStore {
    let points = vec![
        GridPoint {
            row: 0,
            col: 0,
            narr_row: 10,
            narr_col: 20,
            lon: -110.5,
            lat: 40.25,
            map_x: 500_000.0,
            map_y: 4_456_000.0,
            index: 0,
            run_modtran: true,
        },
        GridPoint {
            row: 0,
            col: 1,
            narr_row: 10,
            narr_col: 21,
            lon: -110.4,
            lat: 40.25,
            map_x: 501_000.0,
            map_y: 4_456_000.0,
            index: 1,
            run_modtran: false,
        },
    ];
    GridPointStore { rows: 1, cols: 2, points }
}

fn sample_modtran_store() -> ModtranPointStore {
    let grid = sample_grid_store();
    let points = grid
        .points
        .iter()
        .map(|p| ModtranPoint {
            point: p.clone(),
            ran_modtran: p.run_modtran,
            elevations: vec![ElevationSlot {
                elevation_km: 0.5,
                elevation_directory: 500,
                transmission: 0.87654321,
                upwelled_radiance: 1.2345,
                downwelled_radiance: 2.3456,
            }],
        })
        .collect();
    ModtranPointStore {
        rows: grid.rows,
        cols: grid.cols,
        points,
    }
}

#[test]
fn test_write_atmospheric_parameters_skips_non_modtran_points() {
    let store = sample_modtran_store();
    let tdir = TempDir::new("csv_output").unwrap();
    let path = tdir.path().join("atmospheric_parameters.txt");
    write_atmospheric_parameters(&path, &store).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("40.250000000000,-110.500000000000,0.500000000000"));
}

#[test]
fn test_write_used_points_format() {
    let store = sample_grid_store();
    let tdir = TempDir::new("csv_output").unwrap();
    let path = tdir.path().join("used_points.txt");
    write_used_points(&path, &store).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0], "\"0\"|\"500000.000000000000\"|\"4456000.000000000000\"");
}
