// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::*;
use tempdir::TempDir;

fn write_f64(dir: &Path, name: &str, values: &[f64]) -> std::path::PathBuf {
    let path = dir.join(name);
    let bytes: &[u8] = bytemuck::cast_slice(values);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_load_and_locate() {
    let tdir = TempDir::new("geolocation").unwrap();
    let lon = write_f64(tdir.path(), "lon.bin", &[1.0, 2.0, 3.0, 4.0]);
    let lat = write_f64(tdir.path(), "lat.bin", &[10.0, 20.0, 30.0, 40.0]);

    let geo = PrecomputedGeolocation::load(&lon, &lat, 2, 2).unwrap();
    let p = geo.locate(1, 1).unwrap();
    assert_eq!(p.lon, 4.0);
    assert_eq!(p.lat, 40.0);
}

#[test]
fn test_out_of_bounds() {
    let geo = PrecomputedGeolocation::from_arrays(2, 2, vec![0.0; 4], vec![0.0; 4]);
    let err = geo.locate(5, 0).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds { .. }));
    assert_eq!(err.kind(), crate::error::ErrorKind::Domain);
}

#[test]
fn test_size_mismatch() {
    let tdir = TempDir::new("geolocation").unwrap();
    let lon = write_f64(tdir.path(), "lon.bin", &[1.0, 2.0]);
    let lat = write_f64(tdir.path(), "lat.bin", &[1.0, 2.0]);

    let err = PrecomputedGeolocation::load(&lon, &lat, 2, 2).unwrap_err();
    assert!(matches!(err, Error::SizeMismatch { .. }));
    assert_eq!(err.kind(), crate::error::ErrorKind::IoRead);
}
