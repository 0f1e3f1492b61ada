//! Formatter configuration.
//!
//! The only externally adjustable parameters are the height registry and the
//! label rescaling multipliers; the reanalysis target zone can also be
//! overridden for stations outside Mountain time.
//!
//! Environment variables (a `.env` file is honoured):
//!
//! - `WIND_SCALE_UP`  multiplier for labels above `mean + std`
//! - `WIND_SCALE_LOW` multiplier for labels below `mean - std`
//! - `WIND_ERA5_TZ`   IANA zone name for the reanalysis conversion

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::{Era5Options, HeightRegistry, LabelScaling, MetConvention, ShearHeights};
use crate::error::{FormatError, Result};

const ENV_SCALE_UP: &str = "WIND_SCALE_UP";
const ENV_SCALE_LOW: &str = "WIND_SCALE_LOW";
const ENV_ERA5_TZ: &str = "WIND_ERA5_TZ";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatterConfig {
    pub heights: HeightRegistry,
    pub met: MetConvention,
    pub shear: ShearHeights,
    pub scaling: LabelScaling,
    pub era5: Era5Options,
}

impl FormatterConfig {
    /// Defaults overridden by `WIND_*` environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = FormatterConfig::default();
        if let Some(raw) = lookup(ENV_SCALE_UP) {
            config.scaling.scale_up = parse_multiplier(ENV_SCALE_UP, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SCALE_LOW) {
            config.scaling.scale_low = parse_multiplier(ENV_SCALE_LOW, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ERA5_TZ) {
            config.era5.time_zone = parse_time_zone(&raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("scale_up", self.scaling.scale_up),
            ("scale_low", self.scaling.scale_low),
        ] {
            if !value.is_finite() {
                return Err(FormatError::Config(format!("`{name}` must be finite (got {value}).")));
            }
        }
        if !(self.met.pressure_divisor.is_finite() && self.met.pressure_divisor != 0.0) {
            return Err(FormatError::Config("Pressure divisor must be finite and non-zero.".to_string()));
        }
        let ShearHeights { upper, reference } = self.shear;
        if !(upper > 0.0 && reference > 0.0 && upper != reference) {
            return Err(FormatError::Config(format!(
                "Shear heights must be positive and distinct (upper={upper}, reference={reference})."
            )));
        }
        Ok(())
    }
}

fn parse_multiplier(key: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FormatError::Config(format!("`{key}` must be a finite number (got '{raw}').")))
}

pub fn parse_time_zone(raw: &str) -> Result<Tz> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|_| FormatError::Config(format!("Unknown time zone '{raw}'.")))
}
