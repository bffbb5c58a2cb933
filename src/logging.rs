use std::{fs::File, io::Write};

use env_logger::{Builder, Target, WriteStyle};

use crate::io::options::{CliOptions, LogFormat};
use crate::{Error, Result};

/// Configures the process-wide logger from the CLI options. Lines go to
/// stderr unless `--log-output` names a file. Fails if a logger is
/// already installed.
pub fn init_logger(options: &CliOptions) -> Result<()> {
    let format = options.log_format;
    let timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .format(move |buf, record| {
            if timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            let level = record.level().as_str();
            match format {
                LogFormat::Compact => writeln!(buf, "{level} {}", record.args()),
                LogFormat::Pretty => {
                    writeln!(buf, "{level} [{}] {}", record.target(), record.args())
                }
            }
        })
        .target(log_target(options)?);

    builder
        .try_init()
        .map_err(|e| Error::invalid_input(format!("logger already initialized: {e}")))
}

fn log_target(options: &CliOptions) -> Result<Target> {
    let Some(path) = options.log_output_path() else {
        return Ok(Target::Stderr);
    };
    let file = File::create(path).map_err(|e| {
        Error::invalid_input(format!("cannot create log file {}: {e}", path.display()))
    })?;
    Ok(Target::Pipe(Box::new(file)))
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use crate::io::options::CliOptions;

    use super::init_logger;

    #[test]
    fn init_logger_writes_to_a_file_and_rejects_reinit() {
        let dir = env::temp_dir().join(format!("tsp-exact-log-test-{}", process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        let log_path = dir.join("run.log");

        let options = CliOptions {
            log_output: log_path.display().to_string(),
            ..CliOptions::default()
        };
        init_logger(&options).expect("first init should install the logger");
        assert!(log_path.exists());

        // The global logger can only be set once per process.
        let err = init_logger(&options).expect_err("second init should fail");
        assert!(err.to_string().contains("logger already initialized"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unwritable_log_file_is_reported() {
        let options = CliOptions {
            log_output: "/nonexistent-dir/run.log".to_string(),
            ..CliOptions::default()
        };
        let err = init_logger(&options).expect_err("missing directory should fail");
        assert!(err.to_string().contains("cannot create log file"));
    }
}
