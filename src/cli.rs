//! Command-line interface.
//!
//! Flags and environment variables override the optional TOML file, which
//! overrides the built-in defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{
    duration::parse_duration, loader::read_config, validate_config, LoadError, LogFormat,
    SinkConfig,
};

#[derive(Debug, Parser)]
#[command(name = "devnull")]
#[command(version, about = "HTTP sink: answers, delays or relays every request", long_about = None)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "DEVNULL_PORT")]
    pub port: Option<u16>,

    /// URL to forward requests to
    #[arg(short, long, env = "DEVNULL_TARGET")]
    pub target: Option<String>,

    /// Log request headers and bodies (`--verbose=false` turns it off)
    #[arg(
        short,
        long,
        env = "DEVNULL_VERBOSE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub verbose: Option<bool>,

    /// Also write logs to this file
    #[arg(short, long, env = "DEVNULL_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Status code returned when no target is set (0 = 200)
    #[arg(short, long, env = "DEVNULL_STATUS_CODE")]
    pub status_code: Option<u16>,

    /// Delay before every response, e.g. 250ms or 1s
    #[arg(short, long, env = "DEVNULL_WAIT", value_parser = parse_duration)]
    pub wait: Option<Duration>,

    /// Timeout for upstream calls (0 = none)
    #[arg(long, env = "DEVNULL_TIMEOUT", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// TOML configuration file
    #[arg(short, long, env = "DEVNULL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Serve Prometheus metrics on this address
    #[arg(long, env = "DEVNULL_METRICS_ADDRESS")]
    pub metrics_address: Option<String>,

    /// Log output format
    #[arg(long, env = "DEVNULL_LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Args {
    /// Build the validated configuration.
    pub fn into_config(self) -> Result<SinkConfig, LoadError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => SinkConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(LoadError::Validation)?;
        Ok(config)
    }

    fn apply(self, config: &mut SinkConfig) {
        if let Some(port) = self.port {
            config.listener.bind_address = with_port(&config.listener.bind_address, port);
        }
        if let Some(target) = self.target {
            config.relay.target = target;
        }
        if let Some(verbose) = self.verbose {
            config.relay.verbose = verbose;
        }
        if let Some(status_code) = self.status_code {
            config.relay.status_code = status_code;
        }
        if let Some(wait) = self.wait {
            config.relay.wait = wait;
        }
        if let Some(timeout) = self.timeout {
            config.client.timeout = timeout;
        }
        if let Some(output) = self.output {
            config.observability.log_file = Some(output);
        }
        if let Some(address) = self.metrics_address {
            config.observability.metrics_enabled = true;
            config.observability.metrics_address = address;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
    }
}

/// Replace the port of `bind_address`, keeping its host.
fn with_port(bind_address: &str, port: u16) -> String {
    match bind_address.parse::<SocketAddr>() {
        Ok(mut addr) => {
            addr.set_port(port);
            addr.to_string()
        }
        Err(_) => format!("0.0.0.0:{}", port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("devnull").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_flags() {
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.relay.target.is_empty());
        assert!(!config.relay.verbose);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "-p", "9000", "-t", "http://localhost:3000", "-v", "-s", "406", "-w", "1s",
            "--timeout", "30s", "-o", "logs/out.log", "--metrics-address", "127.0.0.1:9100",
            "--log-format", "json",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");
        assert_eq!(config.relay.target, "http://localhost:3000");
        assert!(config.relay.verbose);
        assert_eq!(config.relay.status_code, 406);
        assert_eq!(config.relay.wait, Duration::from_secs(1));
        assert_eq!(config.client.timeout, Duration::from_secs(30));
        assert_eq!(config.observability.log_file, Some(PathBuf::from("logs/out.log")));
        assert!(config.observability.metrics_enabled);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_status_code_fails_validation() {
        let err = parse(&["-s", "1000"]).into_config().unwrap_err();
        assert!(matches!(err, LoadError::Validation(_)));
    }

    #[test]
    fn malformed_wait_is_rejected_by_parser() {
        assert!(Args::try_parse_from(["devnull", "--wait", "-5s"]).is_err());
        assert!(Args::try_parse_from(["devnull", "--wait", "forever"]).is_err());
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[listener]\nbind_address = \"127.0.0.1:7000\"\n[relay]\nstatus_code = 503\nwait = \"2s\"\n")
            .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = parse(&["-c", &path, "-s", "418"]).into_config().unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:7000");
        assert_eq!(config.relay.status_code, 418);
        assert_eq!(config.relay.wait, Duration::from_secs(2));

        let config = parse(&["-c", &path, "-p", "7001"]).into_config().unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:7001");
    }

    #[test]
    fn verbose_flag_overrides_file_both_ways() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[relay]\nverbose = true\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        assert!(parse(&["-c", &path]).into_config().unwrap().relay.verbose);
        assert!(!parse(&["-c", &path, "--verbose=false"]).into_config().unwrap().relay.verbose);
        assert!(!parse(&["-c", &path, "-v=no"]).into_config().unwrap().relay.verbose);
        assert!(parse(&["--verbose"]).into_config().unwrap().relay.verbose);
    }

    #[test]
    fn port_keeps_host() {
        assert_eq!(with_port("127.0.0.1:8080", 1234), "127.0.0.1:1234");
        assert_eq!(with_port("[::1]:8080", 1234), "[::1]:1234");
        assert_eq!(with_port("garbage", 1234), "0.0.0.0:1234");
    }
}
