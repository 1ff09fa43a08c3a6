use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::error::{AppError, Result};

/// Job label used when `--job` is not given
pub const DEFAULT_JOB: &str = "oula_block_height";

/// Poll the maximum block height from PostgreSQL and push it to a Pushgateway
#[derive(Debug, Clone, Parser)]
#[command(name = "block-height-exporter")]
#[command(author, version, about, long_about = None)]
pub struct Settings {
    /// PostgreSQL DSN
    #[arg(long, default_value = "")]
    pub dsn: String,

    /// Pushgateway URL
    #[arg(long = "push-url", default_value = "")]
    pub push_url: String,

    /// Interval between queries (e.g. 30s, 1m, 1m30s)
    #[arg(long, default_value = "1m", value_parser = parse_duration)]
    pub interval: Duration,

    /// Job name for Pushgateway
    #[arg(long, default_value = DEFAULT_JOB)]
    pub job: String,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Settings {
    /// Parse and validate settings from an explicit argument list.
    pub fn try_load_from<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let settings =
            Self::try_parse_from(args).map_err(|e| AppError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Only a missing DSN is fatal. An empty job or push URL surfaces as a
    /// push error on every cycle instead.
    pub fn validate(&self) -> Result<()> {
        if self.dsn.trim().is_empty() {
            return Err(AppError::Config("DSN must be provided".to_string()));
        }
        Ok(())
    }
}

/// Parse a duration string such as `300ms`, `1.5h` or `2h45m`.
///
/// Accepted units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0`
/// is allowed; any other number needs a unit. Negative values are rejected.
pub fn parse_duration(input: &str) -> std::result::Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.starts_with('-') {
        return Err(format!("negative duration {:?}", input));
    }
    let mut rest = s.strip_prefix('+').unwrap_or(s);
    if rest.is_empty() {
        return Err(format!("invalid duration {:?}", input));
    }

    let mut total_nanos: f64 = 0.0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = &rest[..number_len];
        if number.is_empty() || number == "." {
            return Err(format!("invalid duration {:?}", input));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| format!("invalid duration {:?}", input))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        let scale = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(format!("missing unit in duration {:?}", input)),
            other => return Err(format!("unknown unit {:?} in duration {:?}", other, input)),
        };
        rest = &rest[unit_len..];
        total_nanos += value * scale;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(format!("duration {:?} out of range", input));
    }
    Ok(Duration::from_nanos(total_nanos.round() as u64))
}
