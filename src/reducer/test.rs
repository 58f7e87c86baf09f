// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::*;
use crate::grid::GridPoint;
use float_cmp::approx_eq;
use std::fs;
use tempdir::TempDir;

#[test]
fn test_solve_tau_lu_ld_recovers_known_values() {
    // spec.md §8 scenario 3: Lobs1 = 2*tau + Lu, Lobs2 = 5*tau + Lu,
    // Lt(273)=2, Lt(310)=5, tau0=0.7, Lu0=0.3 -> recovered (0.7, 0.3).
    let tau0 = 0.7;
    let lu0 = 0.3;
    let l_obs_1 = 2.0 * tau0 + lu0;
    let l_obs_2 = 5.0 * tau0 + lu0;
    // scenario 4: Lobs3=1.0, Lu=0.3, tau=0.7, Lt(0K)=0.0 -> Ld ~ 98.81.
    let l_obs_3 = 1.0;

    let (tau, lu, ld) = solve_tau_lu_ld(2.0, 5.0, 0.0, l_obs_1, l_obs_2, l_obs_3, 0, 0.5).unwrap();

    assert!(approx_eq!(f64, tau, 0.7, epsilon = 1e-10), "got tau={tau}");
    assert!(approx_eq!(f64, lu, 0.3, epsilon = 1e-10), "got lu={lu}");
    assert!(approx_eq!(f64, ld, 98.81, epsilon = 0.1), "got ld={ld}");
}

#[test]
fn test_solve_tau_lu_ld_singular_system() {
    let err = solve_tau_lu_ld(3.0, 3.0, 0.0, 1.0, 1.0, 1.0, 7, 0.5).unwrap_err();
    assert!(matches!(err, Error::SingularSystem { index: 7, .. }));
    assert_eq!(err.kind(), crate::error::ErrorKind::Domain);
}

fn write_modtran_run(dir: &Path, wavelengths: &[f64], radiances: &[f64]) {
    fs::create_dir_all(dir).unwrap();
    let body: String = wavelengths
        .iter()
        .zip(radiances)
        .map(|(w, r)| format!("{w} {r}\n"))
        .collect();
    fs::write(dir.join("st_modtran.data"), body).unwrap();
}

fn write_modtran_header(dir: &Path, count: usize, zero_temp: f64) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("st_modtran.hdr"), format!("{count}\n{zero_temp}\n")).unwrap();
}

/// Builds a full on-disk MODTRAN output tree for a single (point,
/// elevation) and runs `reduce_one` over it end to end, checking the
/// invariant from spec.md §8: tau in (0, 1.5], Lu/Ld finite and >= 0.
#[test]
fn test_reduce_one_end_to_end_satisfies_invariants() {
    let tdir = TempDir::new("reducer").unwrap();
    let base = tdir.path();

    let point = GridPoint {
        row: 2,
        col: 3,
        narr_row: 12,
        narr_col: 13,
        lon: -110.0,
        lat: 40.0,
        map_x: 500_000.0,
        map_y: 4_400_000.0,
        index: 23,
        run_modtran: true,
    };

    let point_dir = base.join("2_3_12_13");
    let elevation_km = 0.500;

    // Ten wavelengths spanning the response grid below; radiances are
    // synthetic but positive and smoothly varying so the band integrals
    // are well-conditioned.
    let wavelengths: Vec<f64> = (0..10).map(|i| 10.0 + i as f64 * 0.2).collect();
    let rad_273: Vec<f64> = wavelengths.iter().map(|_| 9.0e-7).collect();
    let rad_310: Vec<f64> = wavelengths.iter().map(|_| 1.1e-6).collect();
    let rad_0k: Vec<f64> = wavelengths.iter().map(|_| 1.3e-6).collect();

    write_modtran_run(&point_dir.join(format!("{elevation_km:.3}/273/0.0")), &wavelengths, &rad_273);
    write_modtran_run(&point_dir.join(format!("{elevation_km:.3}/310/0.0")), &wavelengths, &rad_310);
    write_modtran_run(&point_dir.join(format!("{elevation_km:.3}/000/0.1")), &wavelengths, &rad_0k);
    write_modtran_header(&point_dir.join(format!("{elevation_km:.3}/000/0.1")), wavelengths.len(), 290.0);

    let response = SpectralResponse {
        sensor: crate::spectral_response::Sensor::L5Tm,
        wavelength_um: vec![10.2, 10.6, 11.0, 11.4, 11.8],
        response: vec![0.1, 0.6, 1.0, 0.5, 0.1],
    };

    let lt_273 = band_integrate(&response, &blackbody_radiance(&response.wavelength_um, 273.0)).unwrap();
    let lt_310 = band_integrate(&response, &blackbody_radiance(&response.wavelength_um, 310.0)).unwrap();

    let (tau, lu, ld) = reduce_one(base, &point, elevation_km, &response, lt_273, lt_310).unwrap();

    assert!(tau.is_finite() && tau > 0.0 && tau <= 1.5, "tau={tau}");
    assert!(lu.is_finite() && lu >= 0.0, "lu={lu}");
    assert!(ld.is_finite() && ld >= 0.0, "ld={ld}");
}

#[test]
fn test_reduce_one_missing_header_is_reported() {
    let tdir = TempDir::new("reducer").unwrap();
    let base = tdir.path();
    let point = GridPoint {
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
    };
    let response = SpectralResponse {
        sensor: crate::spectral_response::Sensor::L5Tm,
        wavelength_um: vec![10.0, 10.5, 11.0, 11.5, 12.0],
        response: vec![0.1, 0.5, 1.0, 0.5, 0.1],
    };

    let err = reduce_one(base, &point, 0.5, &response, 2.0, 5.0).unwrap_err();
    assert!(matches!(err, Error::MissingHeader { .. }));
    assert_eq!(err.kind(), crate::error::ErrorKind::ConfigMissing);
}

#[test]
fn test_load_grid_elevations_associates_in_index_order() {
    let tdir = TempDir::new("reducer").unwrap();
    let path = tdir.path().join("grid_elevations.txt");
    fs::write(&path, "500.0 500\n750.5 750\n").unwrap();

    let points = vec![
        GridPoint {
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
        GridPoint {
            row: 0,
            col: 1,
            narr_row: 0,
            narr_col: 1,
            lon: 0.1,
            lat: 0.0,
            map_x: 100.0,
            map_y: 0.0,
            index: 1,
            run_modtran: false,
        },
        GridPoint {
            row: 1,
            col: 0,
            narr_row: 1,
            narr_col: 0,
            lon: 0.0,
            lat: 0.1,
            map_x: 0.0,
            map_y: 100.0,
            index: 2,
            run_modtran: true,
        },
    ];
    let grid = GridPointStore { rows: 2, cols: 2, points };

    let associations = load_grid_elevations(&path, &grid).unwrap();
    assert_eq!(associations.get(&0), Some(&(500.0, 500)));
    assert_eq!(associations.get(&2), Some(&(750.5, 750)));
    assert_eq!(associations.get(&1), None);
}
