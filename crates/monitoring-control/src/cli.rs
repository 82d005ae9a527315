use clap::Parser;
use std::path::PathBuf;

pub(crate) const DEFAULT_CONFIG_PATH: &str = "/etc/monitoring-control/config.toml";

#[derive(Parser, Debug)]
#[command(
    name = "monitoring-control",
    version,
    about = "Enable or disable notifications and schedule downtime for a host on the monitoring server"
)]
pub(crate) struct Args {
    /// Host to act on; defaults to this machine's FQDN.
    #[arg(long)]
    pub(crate) target: Option<String>,
    /// One of enable, disable, downtime.
    #[arg(long)]
    pub(crate) operation: String,
    /// Downtime window length in minutes.
    #[arg(
        long,
        default_value_t = protocol::DEFAULT_DURATION_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub(crate) duration: u32,
    /// One of services, host. Only read for downtime.
    #[arg(long = "downtime_type", default_value = "services")]
    pub(crate) downtime_type: String,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub(crate) config: PathBuf,
    #[arg(long = "log_to_stderr", default_value_t = false)]
    pub(crate) log_to_stderr: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let args = Args::try_parse_from(["monitoring-control", "--operation", "downtime"]).unwrap();
        assert_eq!(args.duration, 10);
        assert_eq!(args.downtime_type, "services");
        assert!(args.target.is_none());
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn config_path_is_overridable() {
        let args = Args::try_parse_from([
            "monitoring-control",
            "--operation",
            "enable",
            "--config",
            "~/monitoring-control.toml",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("~/monitoring-control.toml"));
    }

    #[test]
    fn underscore_flag_is_accepted() {
        let args = Args::try_parse_from([
            "monitoring-control",
            "--operation",
            "downtime",
            "--downtime_type",
            "host",
            "--duration",
            "30",
            "--target",
            "host1",
        ])
        .unwrap();
        assert_eq!(args.downtime_type, "host");
        assert_eq!(args.duration, 30);
        assert_eq!(args.target.as_deref(), Some("host1"));
    }

    #[test]
    fn operation_is_required() {
        assert!(Args::try_parse_from(["monitoring-control"]).is_err());
    }

    #[test]
    fn duration_must_be_positive() {
        assert!(Args::try_parse_from([
            "monitoring-control",
            "--operation",
            "downtime",
            "--duration",
            "0"
        ])
        .is_err());
        assert!(Args::try_parse_from([
            "monitoring-control",
            "--operation",
            "downtime",
            "--duration",
            "ten"
        ])
        .is_err());
    }
}
