//! Logging setup
//!
//! Level comes from INNKEEP_LOG when set, otherwise `debug` with --verbose
//! and `warn` without. Logs go to `config.log_file` when configured,
//! else to stderr.

use std::fs::OpenOptions;

use tracing_subscriber::EnvFilter;

use innkeep_core::Config;

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "INNKEEP_LOG";

/// Initialize the global tracing subscriber
pub fn init(config: &Config, verbose: bool) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(filter_directive(level))
    });

    let Some(ref log_path) = config.log_file else {
        // Ignore error if already initialized
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    };

    let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();
}

fn filter_directive(level: &str) -> String {
    format!("innkeep_core={},innkeep_cli={}", level, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(
            filter_directive("debug"),
            "innkeep_core=debug,innkeep_cli=debug"
        );
    }
}
