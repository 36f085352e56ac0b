//! Subcommand implementations and the argument groups they share.

pub mod classify;
pub mod corpus;
pub mod doctor;
pub mod onboard;
pub mod providers;
pub mod select;

use chrono::{Local, NaiveTime};
use clap::Args;
use std::path::{Path, PathBuf};
use stoa_config::{AppConfig, ConfigError};
use stoa_core::context::{Context, RawSignals, classify};

/// Wearable readings and clock override, shared by `select` and `classify`.
#[derive(Debug, Clone, Default, Args)]
pub struct SignalArgs {
    /// Heart rate in beats per minute
    #[arg(long)]
    pub heart_rate: Option<f64>,

    /// Heart-rate variability in milliseconds
    #[arg(long)]
    pub hrv: Option<f64>,

    /// Active energy burned in kilocalories
    #[arg(long)]
    pub active_energy: Option<f64>,

    /// Step count
    #[arg(long)]
    pub steps: Option<u32>,

    /// Hour of day (0-23) instead of the local clock
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    pub hour: Option<u32>,
}

impl SignalArgs {
    pub fn raw_signals(&self) -> RawSignals {
        RawSignals {
            heart_rate: self.heart_rate,
            heart_rate_variability: self.hrv,
            active_energy: self.active_energy,
            step_count: self.steps,
        }
    }

    pub fn context(&self) -> Context {
        let now = Local::now().time();
        let time = match self.hour {
            Some(hour) => NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(now),
            None => now,
        };
        classify(&self.raw_signals(), &time)
    }
}

/// Load config from `path` (with env overrides) or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => {
            let mut config = AppConfig::load_from(path)?;
            config.apply_env(|name| std::env::var(name).ok())?;
            Ok(config)
        }
        None => AppConfig::load(),
    }
}

/// The file a command should read or write.
pub fn config_file(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stoa_core::context::{PrimaryTag, StressLevel, TimeOfDay};

    #[test]
    fn hour_override_drives_time_of_day() {
        let args = SignalArgs {
            heart_rate: Some(105.0),
            hour: Some(8),
            ..Default::default()
        };
        let context = args.context();
        assert_eq!(context.time_of_day, TimeOfDay::Morning);
        assert_eq!(context.stress_level, StressLevel::Elevated);
        assert_eq!(context.primary_tag, PrimaryTag::Stress);
    }

    #[test]
    fn flags_map_onto_raw_signals() {
        let args = SignalArgs {
            hrv: Some(42.0),
            active_energy: Some(300.0),
            steps: Some(9000),
            ..Default::default()
        };
        let raw = args.raw_signals();
        assert_eq!(raw.heart_rate, None);
        assert_eq!(raw.heart_rate_variability, Some(42.0));
        assert_eq!(raw.step_count, Some(9000));
    }

    #[test]
    fn explicit_config_path_wins() {
        let path = Path::new("/tmp/stoa-test/config.toml");
        assert_eq!(config_file(Some(path)), path.to_path_buf());
    }
}
