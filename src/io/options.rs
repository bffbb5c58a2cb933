use std::{env, iter::Peekable, path::Path, time::Duration};

use log::LevelFilter;

use crate::{Error, Result};

const DEFAULT_SAMPLE_SEED: u64 = 12_345;

/// Runtime options for the report binary. The library itself takes no
/// options; everything here belongs to the presentation layer.
#[derive(Clone, Debug)]
pub struct CliOptions {
    /// Input file path for points. Empty means stdin.
    pub input: String,
    /// Output file path for the report. Empty means stdout.
    pub output: String,
    /// Partition the scan across rayon workers.
    pub parallel: bool,
    /// Wall-clock budget for the scan in seconds. Zero disables it.
    pub timeout_secs: f64,
    /// Number of seeded random comparison tours to append to the report.
    pub samples: usize,
    /// Seed for the comparison-tour generator.
    pub sample_seed: u64,
    /// Structured logging level.
    pub log_level: LogLevel,
    /// Logging output format.
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Output file path for logs. Empty means stderr.
    pub log_output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "off" => Ok(Self::Off),
            _ => Err(Error::invalid_input(format!(
                "Invalid value for --log-level: {value}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::invalid_input(format!(
                "Invalid value for --log-format: {value}"
            ))),
        }
    }
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            parallel: false,
            timeout_secs: 0.0,
            samples: 0,
            sample_seed: DEFAULT_SAMPLE_SEED,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
        }
    }
}

impl CliOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };
            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = split_arg(raw_name, &mut args);
            match name.as_str() {
                "input" => options.input = require_value(&name, value)?,
                "output" => options.output = require_value(&name, value)?,
                "parallel" => {
                    options.parallel = match value {
                        Some(v) => parse_bool(&name, &v)?,
                        None => true,
                    };
                }
                "timeout-secs" => {
                    let raw = require_value(&name, value)?;
                    let secs: f64 = raw.parse().map_err(|_| {
                        Error::invalid_input(format!("Invalid value for --{name}: {raw}"))
                    })?;
                    if !secs.is_finite() || secs < 0.0 {
                        return Err(Error::invalid_input(format!(
                            "--{name} must be a non-negative number of seconds"
                        )));
                    }
                    options.timeout_secs = secs;
                }
                "samples" => {
                    let raw = require_value(&name, value)?;
                    options.samples = raw.parse().map_err(|_| {
                        Error::invalid_input(format!("Invalid value for --{name}: {raw}"))
                    })?;
                }
                "sample-seed" => {
                    let raw = require_value(&name, value)?;
                    options.sample_seed = raw.parse().map_err(|_| {
                        Error::invalid_input(format!("Invalid value for --{name}: {raw}"))
                    })?;
                }
                "log-level" => options.log_level = LogLevel::parse(&require_value(&name, value)?)?,
                "log-format" => {
                    options.log_format = LogFormat::parse(&require_value(&name, value)?)?
                }
                "log-timestamp" => {
                    options.log_timestamp = match value {
                        Some(v) => parse_bool(&name, &v)?,
                        None => true,
                    };
                }
                "no-log-timestamp" => {
                    if value.is_some() {
                        return Err(Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    options.log_timestamp = false;
                }
                "log-output" => options.log_output = require_value(&name, value)?,
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        Ok(options)
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-exact [options] --input points.csv\n",
            "  tsp-exact [options] < points.csv\n\n",
            "Points are one per line: name,lat,lng (degrees). Lines starting\n",
            "with '#' are comments.\n\n",
            "Options:\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --parallel[=<bool>]\n",
            "  --timeout-secs <f64>   (sequential scan with a wall-clock budget; overrides --parallel)\n",
            "  --samples <usize>\n",
            "  --sample-seed <u64>\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  tsp-exact --input demos/ecuador.csv\n",
            "  tsp-exact --input demos/ecuador.csv --samples 10 --sample-seed 7\n",
            "  tsp-exact --parallel --log-level=info < points.csv\n",
            "  tsp-exact --timeout-secs 5 --output report.txt < points.csv\n",
        )
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_empty_path(&self.input)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_empty_path(&self.output)
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_empty_path(&self.log_output)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0.0).then(|| Duration::from_secs_f64(self.timeout_secs))
    }
}

fn non_empty_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}

fn split_arg<I>(raw_name: &str, args: &mut Peekable<I>) -> (String, Option<String>)
where
    I: Iterator<Item = String>,
{
    if let Some((name, value)) = raw_name.split_once('=') {
        return (name.to_owned(), Some(value.to_owned()));
    }
    let value = match args.peek() {
        Some(next) if !next.starts_with("--") => args.next(),
        _ => None,
    };
    (raw_name.to_owned(), value)
}

fn require_value(name: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| Error::invalid_input(format!("Missing value for --{name}")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}
