// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// Given a scene's working directory (grid/MODTRAN stores) and the outputs
// of its geolocation/elevation/thermal-input collaborators, run the
// atmospheric-parameters engine end to end and write the four rasters
// plus the two delimited text products.
//
// run with:
// $ ST_DATA_DIR=/path/to/spectral-responses \
//     st_atmospheric_parameters --xml scene.xml --instrument TM --satellite LANDSAT_5 \
//     --lines 1000 --samples 1000 --ul-x 500000 --ul-y 4500000 \
//     --pixel-width 30 --pixel-height 30 \
//     --lon-raster lon.bin --lat-raster lat.bin \
//     --thermal-raster thermal.bin --elevation-raster elevation.bin
//
// Turn on logging with --debug, or: $ export RUST_LOG=st_atmospheric_parameters=debug

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::{error, info};

use st_atmospheric_parameters::config::{self, Config};
use st_atmospheric_parameters::csv_output;
use st_atmospheric_parameters::geolocation::{self, PrecomputedGeolocation};
use st_atmospheric_parameters::grid::{self, GridPointStore};
use st_atmospheric_parameters::interpolate::{self, LineScratch, PixelInterpolator, SceneGeometry};
use st_atmospheric_parameters::modtran::{self, ElevationProfile, ModtranPointStore};
use st_atmospheric_parameters::numeric;
use st_atmospheric_parameters::raster::{self, SceneRasters};
use st_atmospheric_parameters::reducer;
use st_atmospheric_parameters::spectral_response::{self, Sensor, SpectralResponse};
use st_atmospheric_parameters::ErrorKind;

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Driving MODTRAN, reading Landsat XML metadata and real map-projection
/// math are all delegated collaborators (out of scope for this engine);
/// the flags below are how their outputs reach the core rather than this
/// binary re-deriving them.
#[derive(Parser, Debug)]
#[clap(name = "st_atmospheric_parameters", author, version = built_info::PKG_VERSION)]
struct Opt {
    /// The scene's XML metadata file. Not parsed here (XML metadata
    /// parsing is delegated); only checked to exist, and echoed to logs.
    #[clap(long)]
    xml: PathBuf,

    /// Raise the log level to debug.
    #[clap(long)]
    debug: bool,

    /// The scene's working directory (grid/MODTRAN stores and output
    /// products). Defaults to the current directory.
    #[clap(long)]
    working_dir: Option<PathBuf>,

    /// Sensor instrument tag, as it appears in Landsat metadata (e.g. `TM`).
    #[clap(long)]
    instrument: String,

    /// Sensor satellite tag (e.g. `LANDSAT_5`).
    #[clap(long)]
    satellite: String,

    /// Reference band lines (rows).
    #[clap(long)]
    lines: usize,

    /// Reference band samples (columns).
    #[clap(long)]
    samples: usize,

    /// Reference band upper-left corner easting, metres.
    #[clap(long = "ul-x")]
    ul_x: f64,

    /// Reference band upper-left corner northing, metres.
    #[clap(long = "ul-y")]
    ul_y: f64,

    /// Reference band pixel width, metres.
    #[clap(long = "pixel-width")]
    pixel_width: f64,

    /// Reference band pixel height, metres.
    #[clap(long = "pixel-height")]
    pixel_height: f64,

    /// Flat `lines * samples` little-endian f64 longitude raster.
    #[clap(long = "lon-raster")]
    lon_raster: PathBuf,

    /// Flat `lines * samples` little-endian f64 latitude raster.
    #[clap(long = "lat-raster")]
    lat_raster: PathBuf,

    /// Flat `lines * samples` little-endian f64 thermal-radiance input.
    #[clap(long = "thermal-raster")]
    thermal_raster: PathBuf,

    /// Flat `lines * samples` little-endian f64 elevation-above-geoid
    /// input, metres.
    #[clap(long = "elevation-raster")]
    elevation_raster: PathBuf,

    /// Thermal input sentinel identifying a no-data pixel.
    #[clap(long = "no-data-thermal", default_value_t = -9999.0)]
    no_data_thermal: f64,
}

fn read_flat_f64(path: &PathBuf, lines: usize, samples: usize) -> anyhow::Result<Vec<f64>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let expected = lines * samples * std::mem::size_of::<f64>();
    anyhow::ensure!(
        bytes.len() == expected,
        "{}: expected {expected} bytes ({lines}x{samples} f64 values), found {}",
        path.display(),
        bytes.len()
    );
    // `fs::read`'s buffer alignment is not guaranteed, and `cast_slice`
    // panics on a misaligned pointer rather than erroring; `try_cast_slice`
    // reports the same condition as a `Result` so a misaligned read fails
    // gracefully instead of aborting.
    let values: &[f64] = bytemuck::try_cast_slice(&bytes)
        .map_err(|e| anyhow::anyhow!("{}: not aligned for f64 decoding: {e:?}", path.display()))?;
    Ok(values.to_vec())
}

fn run(opt: Opt) -> anyhow::Result<()> {
    anyhow::ensure!(opt.xml.is_file(), "xml metadata file not found: {}", opt.xml.display());
    info!("scene metadata: {}", opt.xml.display());

    let working_dir = opt.working_dir.clone().unwrap_or(std::env::current_dir()?);
    let config = Config::resolve(opt.xml.clone(), opt.debug, working_dir.clone())
        .context("resolving configuration")?;

    let sensor = Sensor::from_instrument_satellite(&opt.instrument, &opt.satellite)
        .context("resolving sensor")?;
    let response = SpectralResponse::load(&config.data_dir, sensor).context("loading spectral response")?;

    let grid = GridPointStore::load(&config.working_dir).context("loading grid point store")?;
    let profile = ElevationProfile::load(&config.working_dir.join("modtran_elevations.txt"))
        .context("loading elevation profile")?;
    let mut modtran_store = ModtranPointStore::allocate_from_grid(&grid, &profile);

    let associations = reducer::load_grid_elevations(&config.working_dir.join("grid_elevations.txt"), &grid)
        .context("loading grid_elevations.txt")?;
    for point in &mut modtran_store.points {
        if let Some(&(_elevation_m, tag)) = associations.get(&point.point.index) {
            for slot in &mut point.elevations {
                slot.elevation_directory = tag;
            }
        }
    }

    reducer::reduce_all(&mut modtran_store, &config.working_dir, &response).context("reducing MODTRAN output")?;

    let geo = PrecomputedGeolocation::load(&opt.lon_raster, &opt.lat_raster, opt.lines, opt.samples)
        .context("loading geolocation rasters")?;
    let thermal = read_flat_f64(&opt.thermal_raster, opt.lines, opt.samples).context("loading thermal raster")?;
    let elevation = read_flat_f64(&opt.elevation_raster, opt.lines, opt.samples).context("loading elevation raster")?;

    let geometry = SceneGeometry::new(opt.ul_x, opt.ul_y, opt.pixel_width, opt.pixel_height);
    let interpolator = PixelInterpolator::new(&modtran_store).context("initializing pixel interpolator")?;
    let mut out = SceneRasters::new(opt.lines, opt.samples);

    for line in 0..opt.lines {
        let mut scratch = LineScratch::new();
        for sample in 0..opt.samples {
            let idx = line * opt.samples + sample;
            let params = interpolator
                .process_pixel(
                    &geo,
                    &geometry,
                    &mut scratch,
                    line,
                    sample,
                    thermal[idx],
                    opt.no_data_thermal,
                    elevation[idx],
                )
                .with_context(|| format!("interpolating pixel ({line}, {sample})"))?;
            out.set_pixel(line, sample, thermal[idx] as f32, params.tau as f32, params.lu as f32, params.ld as f32);
        }
    }

    out.write_all(&config.working_dir).context("writing output rasters")?;
    csv_output::write_atmospheric_parameters(&config.working_dir.join("atmospheric_parameters.txt"), &modtran_store)
        .context("writing atmospheric_parameters.txt")?;
    csv_output::write_used_points(&config.working_dir.join("used_points.txt"), &grid)
        .context("writing used_points.txt")?;

    info!("scene complete: {} pixels", opt.lines * opt.samples);
    Ok(())
}

/// Walk an anyhow error's cause chain looking for one of this crate's own
/// leaf error types, and classify it per spec.md §7's taxonomy (§7 asks
/// that every fatal error be logged with a consistent category). Every
/// fallible call in `run` bottoms out in one of these types before
/// `.context(...)` wraps it for a human-readable message, so the original
/// type is still present somewhere in the chain.
fn classify(err: &anyhow::Error) -> Option<ErrorKind> {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<config::Error>() {
            return Some(e.kind());
        }
        if let Some(e) = cause.downcast_ref::<spectral_response::Error>() {
            return Some(e.kind());
        }
        if let Some(e) = cause.downcast_ref::<grid::Error>() {
            return Some(e.kind());
        }
        if let Some(e) = cause.downcast_ref::<modtran::Error>() {
            return Some(e.kind());
        }
        if let Some(e) = cause.downcast_ref::<reducer::Error>() {
            return Some(e.kind());
        }
        if let Some(e) = cause.downcast_ref::<geolocation::Error>() {
            return Some(e.kind());
        }
        if let Some(e) = cause.downcast_ref::<interpolate::Error>() {
            return Some(e.kind());
        }
        if let Some(e) = cause.downcast_ref::<raster::Error>() {
            return Some(e.kind());
        }
        if let Some(e) = cause.downcast_ref::<csv_output::Error>() {
            return Some(e.kind());
        }
        if let Some(e) = cause.downcast_ref::<numeric::Error>() {
            return Some(e.kind());
        }
    }
    None
}

fn main() -> ExitCode {
    let opt = Opt::parse();
    let level = if opt.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    log::debug!(
        "{} {} built {} with rustc {}",
        built_info::PKG_NAME,
        built_info::PKG_VERSION,
        built_info::BUILT_TIME_UTC,
        built_info::RUSTC_VERSION,
    );

    if let Err(e) = run(opt) {
        match classify(&e) {
            Some(kind) => error!("{kind}: {e:#}"),
            None => error!("{e:#}"),
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
