use serde::Deserialize;

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_TIME_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_SNTP_VERSION: u8 = 3;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlConfig {
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub command_path: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeConfig {
    pub server: Option<String>,
    pub version: Option<u8>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub dir: Option<String>,
}

impl MonitorConfig {
    pub fn command_path(&self) -> &str {
        self.command_path
            .as_deref()
            .unwrap_or(crate::DEFAULT_COMMAND_PATH)
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS)
    }
}

impl TimeConfig {
    pub fn version(&self) -> u8 {
        self.version.unwrap_or(DEFAULT_SNTP_VERSION)
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_TIME_TIMEOUT_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let input = r#"
[monitor]
host = "nagios.example.com"
username = "nagiosadmin"
password = "secret"
"#;
        let parsed: ControlConfig = toml::from_str(input).unwrap();
        assert_eq!(parsed.monitor.command_path(), "/nagios/cgi-bin/cmd.cgi");
        assert_eq!(parsed.monitor.timeout_ms(), DEFAULT_HTTP_TIMEOUT_MS);
        assert!(parsed.time.server.is_none());
        assert_eq!(parsed.time.version(), 3);
        assert!(parsed.logging.dir.is_none());
    }

    #[test]
    fn missing_password_fails() {
        let input = r#"
[monitor]
host = "nagios.example.com"
username = "nagiosadmin"
"#;
        let parsed: Result<ControlConfig, _> = toml::from_str(input);
        assert!(parsed.is_err());
    }

    #[test]
    fn time_section_is_read() {
        let input = r#"
[monitor]
host = "nagios"
username = "u"
password = "p"

[time]
server = "pool.ntp.org"
version = 4
timeout_ms = 1500
"#;
        let parsed: ControlConfig = toml::from_str(input).unwrap();
        assert_eq!(parsed.time.server.as_deref(), Some("pool.ntp.org"));
        assert_eq!(parsed.time.version(), 4);
        assert_eq!(parsed.time.timeout_ms(), 1500);
    }
}
