use anyhow::Context;
pub(crate) use protocol::config::ControlConfig;
use std::path::Path;

fn validate_control_config(config: &ControlConfig) -> anyhow::Result<()> {
    let monitor = &config.monitor;
    if monitor.host.trim().is_empty() {
        anyhow::bail!("monitor.host must not be empty");
    }
    if monitor.host.contains('/') || monitor.host.contains('@') {
        anyhow::bail!("monitor.host must be a bare host[:port], got {}", monitor.host);
    }
    if monitor.username.trim().is_empty() {
        anyhow::bail!("monitor.username must not be empty");
    }
    if !monitor.command_path().starts_with('/') {
        anyhow::bail!("monitor.command_path must start with '/'");
    }
    if monitor.timeout_ms() == 0 {
        anyhow::bail!("monitor.timeout_ms must be positive");
    }
    let time = &config.time;
    if let Some(server) = &time.server {
        if server.trim().is_empty() {
            anyhow::bail!("time.server must not be empty when set");
        }
    }
    if !(1..=4).contains(&time.version()) {
        anyhow::bail!("time.version must be between 1 and 4, got {}", time.version());
    }
    if time.timeout_ms() == 0 {
        anyhow::bail!("time.timeout_ms must be positive");
    }
    Ok(())
}

pub(crate) fn load_control_config(path: &Path) -> anyhow::Result<ControlConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ControlConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    validate_control_config(&config)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(input: &str) -> ControlConfig {
        toml::from_str(input).unwrap()
    }

    #[test]
    fn config_accepts_minimal_monitor() {
        let config = parse(
            r#"
[monitor]
host = "nagios.example.com"
username = "nagiosadmin"
password = "secret"
"#,
        );
        assert!(validate_control_config(&config).is_ok());
    }

    #[test]
    fn config_requires_host() {
        let config = parse(
            r#"
[monitor]
host = "  "
username = "nagiosadmin"
password = "secret"
"#,
        );
        assert!(validate_control_config(&config).is_err());
    }

    #[test]
    fn config_rejects_url_as_host() {
        let config = parse(
            r#"
[monitor]
host = "http://nagios.example.com/"
username = "nagiosadmin"
password = "secret"
"#,
        );
        assert!(validate_control_config(&config).is_err());
    }

    #[test]
    fn config_rejects_unknown_sntp_version() {
        let config = parse(
            r#"
[monitor]
host = "nagios"
username = "u"
password = "p"

[time]
server = "pool.ntp.org"
version = 7
"#,
        );
        assert!(validate_control_config(&config).is_err());
    }

    #[test]
    fn shipped_example_is_valid() {
        let config = parse(include_str!(
            "../../../config/monitoring-control.example.toml"
        ));
        assert!(validate_control_config(&config).is_ok());
        assert_eq!(config.time.server.as_deref(), Some("pool.ntp.org"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[monitor]\nhost = \"nagios:8080\"\nusername = \"u\"\npassword = \"p\"\n"
        )
        .unwrap();
        let config = load_control_config(file.path()).unwrap();
        assert_eq!(config.monitor.host, "nagios:8080");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_control_config(Path::new("/nonexistent/monitoring-control.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
