// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The numeric kernel: Planck blackbody radiance, natural cubic splines, and
tabulated 5-point Newton-Cotes integration. Everything here is a pure
function or a small value type — no filesystem access, no knowledge of
grids, points, or sensors.
*/

pub mod error;
pub mod integration;
pub mod planck;
pub mod spline;

pub use error::Error;
pub use integration::integrate;
pub use planck::blackbody_radiance;
pub use spline::Spline;
