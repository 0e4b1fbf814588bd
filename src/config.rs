use std::{env, path::PathBuf, str::FromStr};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CHART_WIDTH: f64 = 720.0;
pub const MIN_CHART_WIDTH: f64 = 120.0;
pub const MAX_CHART_WIDTH: f64 = 4000.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub port: u16,
    pub chart_width: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            port: DEFAULT_PORT,
            chart_width: DEFAULT_CHART_WIDTH,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let chart_width = parsed_var("CHART_WIDTH").unwrap_or(defaults.chart_width);

        Self {
            data_dir: env::var("APP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            port: parsed_var("PORT").unwrap_or(defaults.port),
            chart_width: clamp_width(Some(chart_width), defaults.chart_width),
        }
    }
}

/// Canvas widths outside the supported range fall back to `default`.
pub fn clamp_width(width: Option<f64>, default: f64) -> f64 {
    match width {
        Some(width) if width.is_finite() && (MIN_CHART_WIDTH..=MAX_CHART_WIDTH).contains(&width) => width,
        _ => default,
    }
}

fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    let value = env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("ignoring invalid {name}={value}");
            None
        }
    }
}
