// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Per-pixel atmospheric transmittance, upwelled and downwelled radiance for
Landsat thermal scenes, fused from a sparse MODTRAN lat/lon/elevation grid.

Two stages, covered by the `reducer` and `interpolate` modules
respectively: collapsing MODTRAN's spectrally tabulated runs at each grid
point/elevation into a (τ, Lu, Ld) triple, then spatially and vertically
interpolating those triples onto every thermal pixel in the scene.
*/

pub mod config;
pub mod csv_output;
pub mod error;
pub mod geolocation;
pub mod grid;
pub mod interpolate;
pub mod modtran;
pub mod numeric;
pub mod raster;
pub mod reducer;
pub mod spectral_response;

pub use error::{Error, ErrorKind};
