// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::*;
use crate::geolocation::PrecomputedGeolocation;
use crate::grid::GridPoint;
use crate::modtran::{ElevationSlot, ModtranPoint};
use float_cmp::approx_eq;
use std::f64::consts::PI;

fn uniform_slot(elevation_km: f64, tau: f64, lu: f64, ld: f64) -> ElevationSlot {
    ElevationSlot {
        elevation_km,
        elevation_directory: 0,
        transmission: tau,
        upwelled_radiance: lu,
        downwelled_radiance: ld,
    }
}

/// A `rows x cols` mesh with 0.01-degree spacing in lon/lat and 1000m
/// spacing in map_x/map_y, every point carrying the same two elevation
/// slots (0.0km, 1.0km), each with the given (tau, lu, ld).
fn uniform_store(rows: usize, cols: usize, tau: f64, lu: f64, ld: f64) -> ModtranPointStore {
    let mut points = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let index = row * cols + col;
            let point = GridPoint {
                row,
                col,
                narr_row: row as i32,
                narr_col: col as i32,
                lon: col as f64 * 0.01,
                lat: row as f64 * 0.01,
                map_x: col as f64 * 1000.0,
                map_y: row as f64 * 1000.0,
                index,
                run_modtran: true,
            };
            points.push(ModtranPoint {
                point,
                ran_modtran: true,
                elevations: vec![
                    uniform_slot(0.0, tau, lu, ld),
                    uniform_slot(1.0, tau, lu, ld),
                ],
            });
        }
    }
    ModtranPointStore { rows, cols, points }
}

#[test]
fn test_haversine_same_point_is_zero() {
    assert_eq!(haversine_distance_m(0.0, 0.0, 0.0, 0.0), 0.0);
}

#[test]
fn test_haversine_quarter_meridian() {
    let d = haversine_distance_m(0.0, 0.0, 0.0, 90.0);
    let expected = PI * EARTH_RADIUS_M / 2.0;
    assert!((d - expected).abs() < 1.0, "got {d}, want {expected}");
}

#[test]
fn test_vertical_interpolate_above_all_returns_topmost() {
    let point = ModtranPoint {
        point: GridPoint {
            row: 0,
            col: 0,
            narr_row: 0,
            narr_col: 0,
            lon: 0.0,
            lat: 0.0,
            map_x: 0.0,
            map_y: 0.0,
            index: 0,
            run_modtran: true,
        },
        ran_modtran: true,
        elevations: vec![
            uniform_slot(0.0, 0.5, 1.0, 2.0),
            uniform_slot(1.0, 0.6, 1.5, 2.5),
            uniform_slot(2.0, 0.7, 2.0, 3.0),
        ],
    };

    let (tau, lu, ld) = vertical_interpolate(&point, 100.0);
    assert_eq!((tau, lu, ld), (0.7, 2.0, 3.0));
}

#[test]
fn test_vertical_interpolate_below_all_returns_bottom() {
    let point = ModtranPoint {
        point: GridPoint {
            row: 0,
            col: 0,
            narr_row: 0,
            narr_col: 0,
            lon: 0.0,
            lat: 0.0,
            map_x: 0.0,
            map_y: 0.0,
            index: 0,
            run_modtran: true,
        },
        ran_modtran: true,
        elevations: vec![uniform_slot(1.0, 0.5, 1.0, 2.0), uniform_slot(2.0, 0.6, 1.5, 2.5)],
    };

    let (tau, lu, ld) = vertical_interpolate(&point, -5.0);
    assert_eq!((tau, lu, ld), (0.5, 1.0, 2.0));
}

#[test]
fn test_vertical_interpolate_midpoint() {
    let point = ModtranPoint {
        point: GridPoint {
            row: 0,
            col: 0,
            narr_row: 0,
            narr_col: 0,
            lon: 0.0,
            lat: 0.0,
            map_x: 0.0,
            map_y: 0.0,
            index: 0,
            run_modtran: true,
        },
        ran_modtran: true,
        elevations: vec![uniform_slot(0.0, 0.0, 0.0, 0.0), uniform_slot(2.0, 2.0, 4.0, 6.0)],
    };

    let (tau, lu, ld) = vertical_interpolate(&point, 1.0);
    assert!(approx_eq!(f64, tau, 1.0, epsilon = 1e-12));
    assert!(approx_eq!(f64, lu, 2.0, epsilon = 1e-12));
    assert!(approx_eq!(f64, ld, 3.0, epsilon = 1e-12));
}

#[test]
fn test_idw_equidistant_average() {
    // A 2x2 mesh with distinct values; the center point is equidistant
    // from all four corners, so IDW collapses to a plain mean.
    let mut store = uniform_store(2, 2, 0.0, 0.0, 0.0);
    let values = [1.0, 2.0, 3.0, 4.0];
    for (point, &v) in store.points.iter_mut().zip(values.iter()) {
        for slot in &mut point.elevations {
            slot.transmission = v;
        }
    }

    let interpolator = PixelInterpolator::new(&store).unwrap();
    let vertices: [(usize, (f64, f64, f64)); 4] = [
        (0, (1.0, 0.0, 0.0)),
        (1, (2.0, 0.0, 0.0)),
        (2, (3.0, 0.0, 0.0)),
        (3, (4.0, 0.0, 0.0)),
    ];
    let params = interpolator.horizontal_interpolate(&vertices, 500.0, 500.0);
    assert!(approx_eq!(f64, params.tau, 2.5, epsilon = 1e-12), "got {}", params.tau);
}

#[test]
fn test_idw_exact_at_vertex_returns_that_value() {
    let store = uniform_store(2, 2, 0.0, 0.0, 0.0);
    let interpolator = PixelInterpolator::new(&store).unwrap();
    let vertices: [(usize, (f64, f64, f64)); 4] = [
        (0, (1.0, 0.0, 0.0)),
        (1, (2.0, 0.0, 0.0)),
        (2, (3.0, 0.0, 0.0)),
        (3, (4.0, 0.0, 0.0)),
    ];
    // Exactly at vertex 3's map coordinates (col=1, row=1 -> 1000, 1000).
    let params = interpolator.horizontal_interpolate(&vertices, 1000.0, 1000.0);
    assert_eq!(params.tau, 4.0);
}

#[test]
fn test_uniform_grid_pixel_returns_constant() {
    let store = uniform_store(3, 3, 0.8, 1.0, 2.0);
    let interpolator = PixelInterpolator::new(&store).unwrap();

    // One pixel, inside the mesh, geolocated near the center point (1,1).
    let geo = PrecomputedGeolocation::from_arrays(1, 1, vec![0.008], vec![0.012]);
    let geometry = SceneGeometry::new(500.0, 1500.0, 1000.0, 1000.0);
    let mut scratch = LineScratch::new();

    let params = interpolator
        .process_pixel(&geo, &geometry, &mut scratch, 0, 0, 300.0, -9999.0, 0.5)
        .unwrap();

    assert!(approx_eq!(f64, params.tau, 0.8, epsilon = 1e-12), "got {}", params.tau);
    assert!(approx_eq!(f64, params.lu, 1.0e4, epsilon = 1e-9), "got {}", params.lu);
    assert!(approx_eq!(f64, params.ld, 2.0e4, epsilon = 1e-9), "got {}", params.ld);
}

#[test]
fn test_no_data_thermal_short_circuits() {
    let store = uniform_store(3, 3, 0.8, 1.0, 2.0);
    let interpolator = PixelInterpolator::new(&store).unwrap();
    let geo = PrecomputedGeolocation::from_arrays(1, 1, vec![0.0], vec![0.0]);
    let geometry = SceneGeometry::new(0.0, 0.0, 1000.0, 1000.0);
    let mut scratch = LineScratch::new();

    let params = interpolator
        .process_pixel(&geo, &geometry, &mut scratch, 0, 0, -9999.0, -9999.0, 0.5)
        .unwrap();

    assert_eq!(params, PixelParameters::NO_DATA);
}

#[test]
fn test_single_row_mesh_emits_no_data_at_border() {
    // A 1-row mesh: every quadrant needs a row above or below the
    // center that does not exist, so every candidate quadrant has an
    // infinite-distance member and the pixel falls back to no-data.
    let store = uniform_store(1, 4, 0.8, 1.0, 2.0);
    let interpolator = PixelInterpolator::new(&store).unwrap();
    let geo = PrecomputedGeolocation::from_arrays(1, 1, vec![0.013], vec![0.0]);
    let geometry = SceneGeometry::new(0.0, 0.0, 1000.0, 1000.0);
    let mut scratch = LineScratch::new();

    let params = interpolator
        .process_pixel(&geo, &geometry, &mut scratch, 0, 0, 300.0, -9999.0, 0.5)
        .unwrap();

    assert_eq!(params, PixelParameters::NO_DATA);
}

#[test]
fn test_store_shape_mismatch_is_rejected() {
    let mut store = uniform_store(2, 2, 0.8, 1.0, 2.0);
    store.points.pop();
    let err = PixelInterpolator::new(&store).unwrap_err();
    assert!(matches!(err, Error::StoreShapeMismatch { .. }));
    assert_eq!(err.kind(), crate::error::ErrorKind::Domain);
}
