// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs;
use std::path::Path;

use criterion::{criterion_group, criterion_main, Criterion};
use tempdir::TempDir;

use st_atmospheric_parameters::grid::{GridPoint, GridPointStore};
use st_atmospheric_parameters::modtran::{ElevationProfile, ModtranPointStore};
use st_atmospheric_parameters::reducer;
use st_atmospheric_parameters::spectral_response::{Sensor, SpectralResponse};

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

/// A 3x3 grid, every point run_modtran, one elevation each, with a full
/// on-disk MODTRAN output tree underneath `base`.
fn build_fixture(base: &Path) -> (GridPointStore, ModtranPointStore, SpectralResponse) {
    let wavelengths: Vec<f64> = (0..10).map(|i| 10.0 + i as f64 * 0.2).collect();
    let rad_273: Vec<f64> = wavelengths.iter().map(|_| 9.0e-7).collect();
    let rad_310: Vec<f64> = wavelengths.iter().map(|_| 1.1e-6).collect();
    let rad_0k: Vec<f64> = wavelengths.iter().map(|_| 1.3e-6).collect();

    let mut points = Vec::new();
    for row in 0..3 {
        for col in 0..3 {
            let index = row * 3 + col;
            points.push(GridPoint {
                row,
                col,
                narr_row: row as i32,
                narr_col: col as i32,
                lon: col as f64 * 0.1,
                lat: row as f64 * 0.1,
                map_x: col as f64 * 1000.0,
                map_y: row as f64 * 1000.0,
                index,
                run_modtran: true,
            });

            let point_dir = base.join(format!("{row}_{col}_{row}_{col}"));
            write_modtran_run(&point_dir.join("0.500/273/0.0"), &wavelengths, &rad_273);
            write_modtran_run(&point_dir.join("0.500/310/0.0"), &wavelengths, &rad_310);
            write_modtran_run(&point_dir.join("0.500/000/0.1"), &wavelengths, &rad_0k);
            write_modtran_header(&point_dir.join("0.500/000/0.1"), wavelengths.len(), 290.0);
        }
    }

    let grid = GridPointStore { rows: 3, cols: 3, points };
    let profile = ElevationProfile { elevations_km: vec![0.5] };
    let modtran_store = ModtranPointStore::allocate_from_grid(&grid, &profile);

    let response = SpectralResponse {
        sensor: Sensor::L5Tm,
        wavelength_um: vec![10.2, 10.6, 11.0, 11.4, 11.8],
        response: vec![0.1, 0.6, 1.0, 0.5, 0.1],
    };

    (grid, modtran_store, response)
}

fn bench_reduce_all_3x3(c: &mut Criterion) {
    let tdir = TempDir::new("reducer-bench").unwrap();
    let (_grid, modtran_store, response) = build_fixture(tdir.path());

    c.bench_function("reduce_all_3x3_grid", |b| {
        b.iter_batched(
            || modtran_store.clone(),
            |mut store| reducer::reduce_all(&mut store, tdir.path(), &response).expect("reduce_all"),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_reduce_all_3x3);
criterion_main!(benches);
