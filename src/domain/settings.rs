//! Validated application settings.
//!
//! Built once from a [`ConfigPort`] before any command runs, so bad values
//! fail fast with the section and key that caused them.

use crate::domain::error::TickcalcError;
use crate::domain::range::RangeSpec;
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;

pub const DEFAULT_SYMBOL: &str = "SPY";
pub const DEFAULT_RANGE: &str = "1y";
pub const DEFAULT_INTERVAL: &str = "1d";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub default_symbol: String,
    pub default_range: RangeSpec,
    pub default_interval: String,
    pub host: String,
    pub port: u16,
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TickcalcError> {
        Ok(Self {
            data_dir: validate_data_dir(config)?,
            default_symbol: validate_default_symbol(config)?,
            default_range: validate_default_range(config)?,
            default_interval: config.get_string_or(
                "calculator",
                "default_interval",
                DEFAULT_INTERVAL,
            ),
            host: config.get_string_or("server", "host", DEFAULT_HOST),
            port: validate_port(config)?,
        })
    }

    /// `host:port` for the HTTP listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<PathBuf, TickcalcError> {
    match config.get_string("data", "dir") {
        Some(s) if !s.trim().is_empty() => Ok(PathBuf::from(s.trim())),
        _ => Err(TickcalcError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        }),
    }
}

fn validate_default_symbol(config: &dyn ConfigPort) -> Result<String, TickcalcError> {
    let symbol = config.get_string_or("calculator", "default_symbol", DEFAULT_SYMBOL);
    if symbol.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
        return Err(TickcalcError::ConfigInvalid {
            section: "calculator".to_string(),
            key: "default_symbol".to_string(),
            reason: format!("'{}' is not a symbol", symbol),
        });
    }
    Ok(symbol)
}

fn validate_default_range(config: &dyn ConfigPort) -> Result<RangeSpec, TickcalcError> {
    let raw = config.get_string_or("calculator", "default_range", DEFAULT_RANGE);
    raw.parse().map_err(|e: TickcalcError| TickcalcError::ConfigInvalid {
        section: "calculator".to_string(),
        key: "default_range".to_string(),
        reason: e.to_string(),
    })
}

fn validate_port(config: &dyn ConfigPort) -> Result<u16, TickcalcError> {
    let Some(raw) = config.get_string("server", "port") else {
        return Ok(DEFAULT_PORT);
    };
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(TickcalcError::ConfigInvalid {
            section: "server".to_string(),
            key: "port".to_string(),
            reason: "port must be between 1 and 65535".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn settings(content: &str) -> Result<Settings, TickcalcError> {
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        Settings::from_config(&adapter)
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let s = settings("[data]\ndir = /var/prices\n").unwrap();
        assert_eq!(s.data_dir, PathBuf::from("/var/prices"));
        assert_eq!(s.default_symbol, "SPY");
        assert_eq!(s.default_range, RangeSpec::Years(1));
        assert_eq!(s.default_interval, "1d");
        assert_eq!(s.listen_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn reads_all_sections() {
        let s = settings(
            "[data]\ndir = data\n\n\
             [calculator]\ndefault_symbol = QQQ\ndefault_range = 6mo\ndefault_interval = 1h\n\n\
             [server]\nhost = 127.0.0.1\nport = 9090\n",
        )
        .unwrap();
        assert_eq!(s.default_symbol, "QQQ");
        assert_eq!(s.default_range, RangeSpec::Months(6));
        assert_eq!(s.default_interval, "1h");
        assert_eq!(s.listen_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn missing_data_dir() {
        let err = settings("[calculator]\ndefault_symbol = SPY\n").unwrap_err();
        assert!(matches!(
            err,
            TickcalcError::ConfigMissing { ref section, ref key } if section == "data" && key == "dir"
        ));
    }

    #[test]
    fn blank_data_dir_is_missing() {
        let err = settings("[data]\ndir =   \n").unwrap_err();
        assert!(matches!(err, TickcalcError::ConfigMissing { .. }));
    }

    #[test]
    fn invalid_default_range() {
        let err = settings("[data]\ndir = d\n[calculator]\ndefault_range = forever\n").unwrap_err();
        assert!(matches!(
            err,
            TickcalcError::ConfigInvalid { ref key, .. } if key == "default_range"
        ));
    }

    #[test]
    fn invalid_default_symbol() {
        let err = settings("[data]\ndir = d\n[calculator]\ndefault_symbol = ../x\n").unwrap_err();
        assert!(matches!(err, TickcalcError::ConfigInvalid { .. }));
    }

    #[test]
    fn port_out_of_range() {
        for port in ["0", "70000", "http"] {
            let err = settings(&format!("[data]\ndir = d\n[server]\nport = {port}\n")).unwrap_err();
            assert!(
                matches!(err, TickcalcError::ConfigInvalid { ref key, .. } if key == "port"),
                "{port}"
            );
        }
    }
}
