// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The pixel-level interpolator (spec.md §4.F): for every valid thermal
pixel, locate the enclosing grid cell, interpolate (τ, Lu, Ld) vertically
to the pixel's elevation at each of the cell's four vertices, then
interpolate horizontally to the pixel's map location by inverse-distance
weighting.

This is the largest single component by spec.md's budget (30%). It is the
one place the §9 "mesh off-by-one" redesign flag bites: the 9-point
neighborhood fixup is computed here in row/col space (not raw `±1`/`±K`
index arithmetic) specifically so a boundary row or column never wraps
into the wrong mesh row — see [`PixelInterpolator::nine_point_neighborhood`].
*/

pub mod error;
pub use error::Error;

use crate::geolocation::PixelGeolocation;
use crate::modtran::{ModtranPoint, ModtranPointStore};

#[cfg(test)]
mod test;

/// Equatorial radius, metres, per spec.md §4.F.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Sentinel value written to all three derived bands for a no-data
/// thermal pixel, or when no quadrant could be formed at a mesh border
/// (spec.md §9 open question, resolved here as: emit no-data rather than
/// guess — see DESIGN.md).
pub const NO_DATA_VALUE: f64 = -9999.0;

/// Haversine distance, metres, between two (lon, lat) pairs given in
/// decimal degrees.
///
/// spec.md §9 flags the upstream source's formula as buggy (it computes
/// `R·2 + asin(sqrt(a))` instead of `R·2·asin(sqrt(a))`); this is the
/// mathematically correct form, so any comparison against the old
/// source's golden data must be regenerated.
pub fn haversine_distance_m(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let lat1r = lat1.to_radians();
    let lat2r = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1r.cos() * lat2r.cos() * (dlon / 2.0).sin().powi(2);
    // Clamp against float error pushing `a` fractionally above 1.0 for
    // near-antipodal/coincident points, which would otherwise NaN the asin.
    2.0 * EARTH_RADIUS_M * a.clamp(0.0, 1.0).sqrt().asin()
}

/// One grid point index paired with its distance (metres) to the pixel
/// currently under consideration. spec.md §4.F calls this a "GridItem".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridItem {
    pub index: usize,
    pub distance: f64,
}

/// A resolved (τ, Lu, Ld) triple for one pixel, already scaled to output
/// units, or the no-data sentinel in all three fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelParameters {
    pub tau: f64,
    pub lu: f64,
    pub ld: f64,
}

impl PixelParameters {
    pub const NO_DATA: Self = Self {
        tau: NO_DATA_VALUE,
        lu: NO_DATA_VALUE,
        ld: NO_DATA_VALUE,
    };
}

/// The scene's simple affine map: (line, sample) -> (easting, northing),
/// from the reference band's UL corner and pixel size. spec.md §4.F point
/// 2 keeps this separate from the longitude/latitude geolocation
/// collaborator (§1's map-projection Non-goal covers lon/lat only; the
/// scene's own raster grid is already in projected coordinates).
#[derive(Debug, Clone, Copy)]
pub struct SceneGeometry {
    pub ul_x: f64,
    pub ul_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl SceneGeometry {
    pub fn new(ul_x: f64, ul_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            ul_x,
            ul_y,
            pixel_width,
            pixel_height,
        }
    }

    pub fn map_xy(&self, line: usize, sample: usize) -> (f64, f64) {
        let easting = self.ul_x + sample as f64 * self.pixel_width;
        let northing = self.ul_y - line as f64 * self.pixel_height;
        (easting, northing)
    }
}

/// Per-line scratch state for the center-point search (spec.md §4.F point
/// 3): carries the previous pixel's 9-point neighborhood forward so later
/// samples in the same line search locally instead of over the whole mesh.
/// Reset at the start of every line.
#[derive(Debug, Clone, Default)]
pub struct LineScratch {
    previous_neighborhood: Option<[Option<usize>; 9]>,
}

impl LineScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new scene line: the first pixel of the next line always
    /// does a full-mesh search.
    pub fn reset(&mut self) {
        self.previous_neighborhood = None;
    }
}

/// Neighborhood slot order, matching spec.md §4.F point 4's naming.
/// Offsets are in (row, col), not raw index arithmetic — see the module
/// doc comment and [`PixelInterpolator::nine_point_neighborhood`].
const NEIGHBORHOOD_OFFSETS: [(isize, isize); 9] = [
    (0, 0),   // CC
    (-1, -1), // LL = C-1-K
    (0, -1),  // LC = C-1
    (1, -1),  // UL = C-1+K
    (1, 0),   // UC = C+K
    (1, 1),   // UR = C+1+K
    (0, 1),   // RC = C+1
    (-1, 1),  // LR = C+1-K
    (-1, 0),  // DC = C-K
];

const CC: usize = 0;
const LL: usize = 1;
const LC: usize = 2;
const UL: usize = 3;
const UC: usize = 4;
const UR: usize = 5;
const RC: usize = 6;
const LR: usize = 7;
const DC: usize = 8;

/// Pixel-level interpolator bound to a populated [`ModtranPointStore`]
/// (spec.md §4.F). One instance serves a whole scene; callers drive it one
/// line (and one [`LineScratch`]) at a time.
pub struct PixelInterpolator<'a> {
    store: &'a ModtranPointStore,
}

impl<'a> PixelInterpolator<'a> {
    pub fn new(store: &'a ModtranPointStore) -> Result<Self, Error> {
        let expected = store.rows * store.cols;
        if expected != store.points.len() {
            return Err(Error::StoreShapeMismatch {
                grid_points: expected,
                modtran_points: store.points.len(),
            });
        }
        Ok(Self { store })
    }

    /// Resolve (τ, Lu, Ld) for one pixel. `thermal_value == no_data_thermal`
    /// short-circuits to the no-data sentinel without touching `scratch`'s
    /// center state, matching spec.md §4.F point 1.
    #[allow(clippy::too_many_arguments)]
    pub fn process_pixel<G: PixelGeolocation>(
        &self,
        geo: &G,
        geometry: &SceneGeometry,
        scratch: &mut LineScratch,
        line: usize,
        sample: usize,
        thermal_value: f64,
        no_data_thermal: f64,
        elevation_m: f64,
    ) -> Result<PixelParameters, Error> {
        if thermal_value == no_data_thermal {
            return Ok(PixelParameters::NO_DATA);
        }

        let loc = geo
            .locate(line, sample)
            .map_err(|source| Error::Geolocation { line, sample, source })?;
        let (easting, northing) = geometry.map_xy(line, sample);

        let center = match scratch.previous_neighborhood {
            None => self.full_mesh_search(loc.lon, loc.lat)?,
            Some(ref neighborhood) => self.neighborhood_search(neighborhood, loc.lon, loc.lat),
        };

        let neighborhood = self.nine_point_neighborhood(center);
        let distances = self.neighborhood_distances(&neighborhood, loc.lon, loc.lat);
        scratch.previous_neighborhood = Some(neighborhood);

        let Some(vertices) = select_quadrant(&neighborhood, &distances) else {
            return Ok(PixelParameters::NO_DATA);
        };

        let elevation_km = elevation_m * 1.0e-3;
        let vertex_values: [(usize, (f64, f64, f64)); 4] = [
            (vertices[0], vertical_interpolate(&self.store.points[vertices[0]], elevation_km)),
            (vertices[1], vertical_interpolate(&self.store.points[vertices[1]], elevation_km)),
            (vertices[2], vertical_interpolate(&self.store.points[vertices[2]], elevation_km)),
            (vertices[3], vertical_interpolate(&self.store.points[vertices[3]], elevation_km)),
        ];

        let mut params = self.horizontal_interpolate(&vertex_values, easting, northing);
        // W·cm⁻²·sr⁻¹·µm⁻¹ -> W·m⁻²·sr⁻¹ (spec.md §4.F point 8); τ is unitless.
        params.lu *= 1.0e4;
        params.ld *= 1.0e4;
        Ok(params)
    }

    fn full_mesh_search(&self, lon: f64, lat: f64) -> Result<usize, Error> {
        self.store
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| GridItem {
                index: i,
                distance: haversine_distance_m(lon, lat, p.point.lon, p.point.lat),
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .map(|item| item.index)
            .ok_or(Error::EmptyGrid)
    }

    fn neighborhood_search(&self, neighborhood: &[Option<usize>; 9], lon: f64, lat: f64) -> usize {
        neighborhood
            .iter()
            .filter_map(|&idx| idx)
            .map(|i| GridItem {
                index: i,
                distance: haversine_distance_m(lon, lat, self.store.points[i].point.lon, self.store.points[i].point.lat),
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .map(|item| item.index)
            // CC is always Some in a well-formed neighborhood, so this only
            // triggers if every slot were somehow invalid.
            .unwrap_or_else(|| neighborhood[CC].expect("center slot is always populated"))
    }

    /// Build the 9-point neighborhood around `center` in row/col space,
    /// so a boundary row or column yields `None` rather than silently
    /// wrapping into the adjacent mesh row (spec.md §9's documented
    /// off-by-one, resolved per DESIGN.md).
    fn nine_point_neighborhood(&self, center: usize) -> [Option<usize>; 9] {
        let cols = self.store.cols;
        let rows = self.store.rows;
        let center_row = (center / cols) as isize;
        let center_col = (center % cols) as isize;

        let mut out = [None; 9];
        for (slot, (dr, dc)) in out.iter_mut().zip(NEIGHBORHOOD_OFFSETS.iter()) {
            let row = center_row + dr;
            let col = center_col + dc;
            *slot = if row < 0 || col < 0 || row as usize >= rows || col as usize >= cols {
                None
            } else {
                Some(row as usize * cols + col as usize)
            };
        }
        out
    }

    fn neighborhood_distances(&self, neighborhood: &[Option<usize>; 9], lon: f64, lat: f64) -> [f64; 9] {
        let mut out = [f64::INFINITY; 9];
        for (slot, idx) in out.iter_mut().zip(neighborhood.iter()) {
            if let Some(idx) = idx {
                let p = &self.store.points[*idx].point;
                *slot = haversine_distance_m(lon, lat, p.lon, p.lat);
            }
        }
        out
    }

    /// Shepard's-method (inverse distance, power 1) horizontal blend of
    /// the four cell vertices' already-vertically-interpolated values.
    fn horizontal_interpolate(&self, vertices: &[(usize, (f64, f64, f64)); 4], easting: f64, northing: f64) -> PixelParameters {
        let mut dists = [0.0_f64; 4];
        for (slot, (idx, _)) in dists.iter_mut().zip(vertices.iter()) {
            let p = &self.store.points[*idx].point;
            let dx = p.map_x - easting;
            let dy = p.map_y - northing;
            *slot = (dx * dx + dy * dy).sqrt();
        }

        if let Some(i) = dists.iter().position(|&d| d == 0.0) {
            let (_, v) = vertices[i];
            return PixelParameters { tau: v.0, lu: v.1, ld: v.2 };
        }

        let weights: [f64; 4] = std::array::from_fn(|i| 1.0 / dists[i]);
        let sum_w: f64 = weights.iter().sum();

        let mut tau = 0.0;
        let mut lu = 0.0;
        let mut ld = 0.0;
        for (w, (_, v)) in weights.iter().zip(vertices.iter()) {
            let w = w / sum_w;
            tau += w * v.0;
            lu += w * v.1;
            ld += w * v.2;
        }
        PixelParameters { tau, lu, ld }
    }
}

/// Choose the quadrant (of four candidate 2x2 cells sharing the center
/// vertex) with the smallest mean distance over its three non-center
/// members, per spec.md §4.F point 5. Returns `None` if every candidate
/// quadrant has at least one out-of-mesh member in all four quadrants
/// (only possible on a 1-row or 1-col mesh), which the caller treats as
/// no-data.
fn select_quadrant(neighborhood: &[Option<usize>; 9], distances: &[f64; 9]) -> Option<[usize; 4]> {
    let mean3 = |a: usize, b: usize, c: usize| (distances[a] + distances[b] + distances[c]) / 3.0;

    let candidates = [
        (mean3(DC, LL, LC), [LL, LC, DC, CC]),
        (mean3(LC, UL, UC), [LC, UL, UC, CC]),
        (mean3(UC, UR, RC), [CC, RC, UC, UR]),
        (mean3(RC, LR, DC), [DC, RC, LR, CC]),
    ];

    let (best_mean, best_slots) = candidates
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))?;

    if !best_mean.is_finite() {
        return None;
    }

    let mut out = [0usize; 4];
    for (o, slot) in out.iter_mut().zip(best_slots.iter()) {
        *o = neighborhood[*slot]?;
    }
    Some(out)
}

/// Linearly interpolate (τ, Lu, Ld) to `elevation_km` between the two
/// elevation slots straddling it, per spec.md §4.F point 6. Assumes
/// `point.elevations` is ordered ascending by elevation (the natural order
/// of `modtran_elevations.txt`).
fn vertical_interpolate(point: &ModtranPoint, elevation_km: f64) -> (f64, f64, f64) {
    let slots = &point.elevations;
    let n = slots.len();
    debug_assert!(n > 0);

    let mut below: Option<usize> = None;
    for (i, slot) in slots.iter().enumerate() {
        if slot.elevation_km < elevation_km {
            below = Some(i);
        } else {
            break;
        }
    }

    let (bi, ai) = match below {
        None => (0, 0),
        Some(b) if b + 1 < n => (b, b + 1),
        Some(_) => (n - 1, n - 1),
    };

    if bi == ai {
        let s = &slots[ai];
        return (s.transmission, s.upwelled_radiance, s.downwelled_radiance);
    }

    let below = &slots[bi];
    let above = &slots[ai];
    let d_elev = above.elevation_km - below.elevation_km;

    let interp = |below_v: f64, above_v: f64| -> f64 {
        let slope = if d_elev != 0.0 { (above_v - below_v) / d_elev } else { 0.0 };
        slope * (elevation_km - above.elevation_km) + above_v
    };

    (
        interp(below.transmission, above.transmission),
        interp(below.upwelled_radiance, above.upwelled_radiance),
        interp(below.downwelled_radiance, above.downwelled_radiance),
    )
}
