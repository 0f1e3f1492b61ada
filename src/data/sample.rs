//! Synthetic station tables for demos and tests.
//!
//! The generator produces tables shaped exactly like logger exports:
//!
//! - MET: 10-minute rows with east/southwest cup pairs per registry height,
//!   one direction vane and barometric pressure in hPa
//! - Lidar: 10-minute rows with speeds at 102 m plus the registry heights
//! - ERA5: hourly rows with a raw textual `Date/time [UTC]` column
//!
//! Wind speed follows a Weibull distribution at the reference height and a
//! power-law profile with a noisy exponent above and below it. The boom that
//! sits downwind of the tower loses part of its reading, so the directional
//! fusion has something real to correct.

use chrono::{NaiveDateTime, TimeDelta};
use polars::prelude::Column;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Normal, Weibull};

use crate::domain::{
    FormatterConfig, SensorChoice, StationKind, TIMESTAMP_COLUMN, lidar_speed_column, met_east_column,
    met_southwest_column,
};
use crate::error::{FormatError, Result};
use crate::table::{ObservationTable, datetime_column, numeric_column, text_column};

/// Reference height (m) for the synthetic speed profile.
const REFERENCE_HEIGHT: f64 = 46.0;

/// Fraction of the reading lost by a boom sitting in the tower wake.
const WAKE_DEFICIT: f64 = 0.18;

/// Sampling cadence of the instrumented stations.
const LOGGER_INTERVAL_MIN: i64 = 10;

/// Longest synthetic period (ten years of 10-minute rows).
pub const MAX_SAMPLE_DAYS: u32 = 3660;

#[derive(Debug, Clone)]
pub struct SampleSpec {
    /// First logger timestamp (naive UTC clock).
    pub start: NaiveDateTime,
    pub days: u32,
    pub seed: u64,
    /// Probability that a lidar row reports 0 m/s at the reference height.
    pub lidar_dropout: f64,
    /// Weibull scale (m/s) of the reference-height speed.
    pub weibull_scale: f64,
    /// Weibull shape of the reference-height speed.
    pub weibull_shape: f64,
}

impl SampleSpec {
    pub fn new(start: NaiveDateTime, days: u32, seed: u64) -> Self {
        Self {
            start,
            days,
            seed,
            lidar_dropout: 0.0,
            weibull_scale: 8.0,
            weibull_shape: 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SampleData {
    pub met: ObservationTable,
    pub lidar: ObservationTable,
    pub era5: ObservationTable,
}

/// One logger interval of "true" atmosphere shared by every station.
#[derive(Debug, Clone, Copy)]
struct WindState {
    ts: NaiveDateTime,
    reference_speed: f64,
    direction: f64,
    alpha: f64,
    pressure_hpa: f64,
}

impl WindState {
    fn speed_at(&self, height: f64) -> f64 {
        self.reference_speed * (height / REFERENCE_HEIGHT).powf(self.alpha)
    }
}

pub fn generate_sample(spec: &SampleSpec, config: &FormatterConfig) -> Result<SampleData> {
    if spec.days == 0 {
        return Err(FormatError::Config("Sample length must be at least one day.".to_string()));
    }
    if spec.days > MAX_SAMPLE_DAYS {
        return Err(FormatError::Config(format!(
            "Sample length must be at most {MAX_SAMPLE_DAYS} days (got {}).",
            spec.days
        )));
    }
    if spec.start.checked_add_signed(TimeDelta::days(i64::from(spec.days))).is_none() {
        return Err(FormatError::Config(format!(
            "Sample period starting {} runs past the supported calendar.",
            spec.start
        )));
    }
    if !(0.0..1.0).contains(&spec.lidar_dropout) {
        return Err(FormatError::Config("Lidar dropout probability must be in [0, 1).".to_string()));
    }
    let weibull = Weibull::new(spec.weibull_scale, spec.weibull_shape)
        .map_err(|e| FormatError::Config(format!("Invalid Weibull parameters: {e}")))?;
    let noise = Normal::new(0.0, 1.0).map_err(|e| FormatError::Config(format!("Noise distribution error: {e}")))?;

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let states = simulate_states(spec, &weibull, &noise, &mut rng);

    let met = met_table(&states, config, &noise, &mut rng)?;
    let lidar = lidar_table(&states, config, spec.lidar_dropout, &noise, &mut rng)?;
    let era5 = era5_table(&states, &noise, &mut rng)?;

    Ok(SampleData { met, lidar, era5 })
}

fn simulate_states(spec: &SampleSpec, weibull: &Weibull<f64>, noise: &Normal<f64>, rng: &mut StdRng) -> Vec<WindState> {
    let n = spec.days as usize * 24 * 60 / LOGGER_INTERVAL_MIN as usize;
    let mut out = Vec::with_capacity(n);

    let mut direction: f64 = rng.gen_range(0.0..360.0);
    let mut speed = weibull.sample(rng);
    let mut pressure = 850.0;

    for i in 0..n {
        // AR(1) toward a fresh Weibull draw keeps consecutive rows correlated.
        speed = 0.9 * speed + 0.1 * weibull.sample(rng);
        direction = (direction + 12.0 * noise.sample(rng)).rem_euclid(360.0);
        pressure += 0.3 * noise.sample(rng);
        out.push(WindState {
            ts: spec.start + TimeDelta::minutes(i as i64 * LOGGER_INTERVAL_MIN),
            reference_speed: speed.max(0.2),
            direction,
            alpha: (0.14 + 0.05 * noise.sample(rng)).clamp(-0.1, 0.5),
            pressure_hpa: pressure,
        });
    }
    out
}

fn timestamps(states: &[WindState]) -> Column {
    datetime_column(TIMESTAMP_COLUMN, states.iter().map(|s| s.ts))
}

fn met_table(
    states: &[WindState],
    config: &FormatterConfig,
    noise: &Normal<f64>,
    rng: &mut StdRng,
) -> Result<ObservationTable> {
    let direction: Vec<f64> = states.iter().map(|s| s.direction).collect();
    let mut columns = vec![
        timestamps(states),
        numeric_column(&config.met.direction_column(), &direction),
    ];

    for &height in config.heights.heights(StationKind::Met) {
        let mut east = Vec::with_capacity(states.len());
        let mut southwest = Vec::with_capacity(states.len());
        for s in states {
            let true_speed = s.speed_at(height);
            let (e_loss, sw_loss) = match config.met.classify(s.direction) {
                SensorChoice::East => (0.0, WAKE_DEFICIT),
                SensorChoice::Southwest => (WAKE_DEFICIT, 0.0),
                SensorChoice::Mean => (0.0, 0.0),
            };
            east.push(cup_reading(true_speed * (1.0 - e_loss), noise, rng));
            southwest.push(cup_reading(true_speed * (1.0 - sw_loss), noise, rng));
        }
        columns.push(numeric_column(&met_east_column(height), &east));
        columns.push(numeric_column(&met_southwest_column(height), &southwest));
    }

    let pressure: Vec<f64> = states.iter().map(|s| s.pressure_hpa).collect();
    columns.push(numeric_column(&config.met.pressure_column, &pressure));
    ObservationTable::new(columns)
}

fn lidar_table(
    states: &[WindState],
    config: &FormatterConfig,
    dropout: f64,
    noise: &Normal<f64>,
    rng: &mut StdRng,
) -> Result<ObservationTable> {
    let mut heights = vec![config.shear.upper, config.shear.reference];
    for &h in config.heights.heights(StationKind::Lidar) {
        if !heights.contains(&h) {
            heights.push(h);
        }
    }

    let mut columns = vec![timestamps(states)];
    for height in heights {
        let values = states
            .iter()
            .map(|s| {
                if height == config.shear.reference && rng.gen_bool(dropout) {
                    0.0
                } else {
                    cup_reading(s.speed_at(height), noise, rng)
                }
            })
            .collect::<Vec<_>>();
        columns.push(numeric_column(&lidar_speed_column(height), &values));
    }
    ObservationTable::new(columns)
}

/// Hourly reanalysis rows covering the logger period, timestamps as raw text.
fn era5_table(states: &[WindState], noise: &Normal<f64>, rng: &mut StdRng) -> Result<ObservationTable> {
    let per_hour = (60 / LOGGER_INTERVAL_MIN) as usize;
    let hourly: Vec<&WindState> = states.iter().step_by(per_hour).collect();

    let raw = hourly
        .iter()
        .map(|s| s.ts.format("%Y-%m-%dT%H:%M:%S").to_string())
        .collect::<Vec<_>>();
    let speed = hourly
        .iter()
        .map(|s| (s.speed_at(100.0) * (1.0 + 0.1 * noise.sample(rng))).max(0.0))
        .collect::<Vec<_>>();
    let direction = hourly.iter().map(|s| s.direction).collect::<Vec<_>>();

    ObservationTable::new(vec![
        text_column("Date/time [UTC]", &raw),
        numeric_column("Speed 100m [m/s]", &speed),
        numeric_column("Direction 100m [°]", &direction),
    ])
}

fn cup_reading(speed: f64, noise: &Normal<f64>, rng: &mut StdRng) -> f64 {
    (speed + 0.15 * noise.sample(rng)).max(0.0)
}
