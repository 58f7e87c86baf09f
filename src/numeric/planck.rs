// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Planck blackbody radiance.
*/

/// Planck's constant, J·s.
const PLANCK_H: f64 = 6.626_075_5e-34;
/// Boltzmann's constant, J/K.
const BOLTZMANN_K: f64 = 1.380_650_3e-23;
/// Speed of light, m/s.
const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Blackbody spectral radiance at temperature `temperature_k`, for each
/// wavelength in `wavelengths_um` (µm).
///
/// # Arguments
///
/// * `wavelengths_um` - wavelengths in microns.
///
/// * `temperature_k` - blackbody temperature in Kelvin.
///
/// # Returns
///
/// * spectral radiance in W·cm⁻²·sr⁻¹·µm⁻¹, one value per input wavelength.
///   `temperature_k <= 0.0` returns all zeros: MODTRAN's "cold space" run
///   (T = 0 K) has no blackbody term and callers treat its radiance as zero.
pub fn blackbody_radiance(wavelengths_um: &[f64], temperature_k: f64) -> Vec<f64> {
    if temperature_k <= 0.0 {
        return vec![0.0; wavelengths_um.len()];
    }

    wavelengths_um
        .iter()
        .map(|&lambda_um| blackbody_radiance_one(lambda_um, temperature_k))
        .collect()
}

/// Planck radiance at a single wavelength/temperature pair. See
/// [`blackbody_radiance`] for units.
fn blackbody_radiance_one(lambda_um: f64, temperature_k: f64) -> f64 {
    if temperature_k <= 0.0 {
        return 0.0;
    }

    let lambda_m = lambda_um * 1e-6;
    let numerator = 2.0 * PLANCK_H * SPEED_OF_LIGHT * SPEED_OF_LIGHT * 1e-6;
    let exponent = (PLANCK_H * SPEED_OF_LIGHT) / (lambda_m * BOLTZMANN_K * temperature_k);
    let denominator = lambda_m.powi(5) * (exponent.exp() - 1.0);

    // W·m⁻² -> W·cm⁻²
    (numerator / denominator) * 1e-4
}
