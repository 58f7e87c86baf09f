// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::*;
use tempdir::TempDir;

#[test]
fn test_new_fills_no_data() {
    let rasters = SceneRasters::new(2, 3);
    assert_eq!(rasters.thermal_radiance.len(), 6);
    assert!(rasters.transmittance.iter().all(|&v| v == NO_DATA_F32));
}

#[test]
fn test_set_pixel_and_write_roundtrip() {
    let mut rasters = SceneRasters::new(2, 2);
    rasters.set_pixel(0, 0, 300.5, 0.8, 1.0, 2.0);
    rasters.set_pixel(1, 1, 301.0, 0.9, 1.1, 2.1);

    let tdir = TempDir::new("raster").unwrap();
    rasters.write_all(tdir.path()).unwrap();

    let bytes = fs::read(tdir.path().join("transmittance.img")).unwrap();
    let values: &[f32] = bytemuck::cast_slice(&bytes);
    assert_eq!(values, &[0.8, NO_DATA_F32, NO_DATA_F32, 0.9]);
}

#[test]
fn test_size_mismatch_is_rejected() {
    let err = write_band(&std::env::temp_dir().join("x.img"), &[1.0, 2.0], 2, 2).unwrap_err();
    assert!(matches!(err, Error::SizeMismatch { .. }));
    assert_eq!(err.kind(), crate::error::ErrorKind::Domain);
}
