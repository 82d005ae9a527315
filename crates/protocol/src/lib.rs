use std::fmt;
use std::str::FromStr;

pub mod config;
pub mod query;
pub mod response;
pub mod window;

pub use response::{classify_response, CommandOutcome, ResponseClassifier, SUCCESS_MARKER};
pub use window::{DowntimeWindow, DEFAULT_DURATION_MINUTES};

pub const DEFAULT_COMMAND_PATH: &str = "/nagios/cgi-bin/cmd.cgi";
pub const COMMAND_AUTHOR: &str = "monitoring_control";
pub const COMMAND_COMMENT: &str = "set_by_monitoring_control";

/// Operation verb as typed on the command line, before downtime is split by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedOperation {
    Enable,
    Disable,
    Downtime,
}

impl FromStr for RequestedOperation {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "enable" => Ok(Self::Enable),
            "disable" => Ok(Self::Disable),
            "downtime" => Ok(Self::Downtime),
            other => Err(format!(
                "--operation {other} is not one of 'enable', 'disable', 'downtime'"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DowntimeKind {
    #[default]
    Services,
    Host,
}

impl FromStr for DowntimeKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "services" => Ok(Self::Services),
            "host" => Ok(Self::Host),
            other => Err(format!(
                "--downtime_type {other} is not one of 'services' or 'host'"
            )),
        }
    }
}

/// A command the monitoring server understands, one per `cmd_typ` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Enable,
    Disable,
    DowntimeServices,
    DowntimeHost,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Enable,
        Operation::Disable,
        Operation::DowntimeServices,
        Operation::DowntimeHost,
    ];

    pub fn resolve(requested: RequestedOperation, kind: DowntimeKind) -> Self {
        match (requested, kind) {
            (RequestedOperation::Enable, _) => Self::Enable,
            (RequestedOperation::Disable, _) => Self::Disable,
            (RequestedOperation::Downtime, DowntimeKind::Services) => Self::DowntimeServices,
            (RequestedOperation::Downtime, DowntimeKind::Host) => Self::DowntimeHost,
        }
    }

    /// Parses the raw `--operation` and `--downtime_type` values. The kind is
    /// only checked when the operation is `downtime`.
    pub fn parse(operation: &str, downtime_kind: &str) -> Result<Self, String> {
        let requested: RequestedOperation = operation.parse()?;
        let kind = match requested {
            RequestedOperation::Downtime => downtime_kind.parse()?,
            RequestedOperation::Enable | RequestedOperation::Disable => DowntimeKind::default(),
        };
        Ok(Self::resolve(requested, kind))
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::DowntimeServices => "downtime_services",
            Self::DowntimeHost => "downtime_host",
        }
    }

    pub fn code(self) -> u16 {
        match self {
            Self::Enable => 28,
            Self::Disable => 29,
            Self::DowntimeServices => 86,
            Self::DowntimeHost => 55,
        }
    }

    pub fn is_downtime(self) -> bool {
        matches!(self, Self::DowntimeServices | Self::DowntimeHost)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    target: String,
    operation: Operation,
    window: Option<DowntimeWindow>,
}

impl CommandRequest {
    pub fn notification(target: impl Into<String>, operation: Operation) -> Result<Self, String> {
        if operation.is_downtime() {
            return Err(format!("{operation} requires a downtime window"));
        }
        Self::build(target.into(), operation, None)
    }

    pub fn downtime(
        target: impl Into<String>,
        operation: Operation,
        window: DowntimeWindow,
    ) -> Result<Self, String> {
        if !operation.is_downtime() {
            return Err(format!("{operation} does not take a downtime window"));
        }
        Self::build(target.into(), operation, Some(window))
    }

    fn build(
        target: String,
        operation: Operation,
        window: Option<DowntimeWindow>,
    ) -> Result<Self, String> {
        let target = target.trim().to_string();
        if target.is_empty() {
            return Err("target host is empty".to_string());
        }
        Ok(Self {
            target,
            operation,
            window,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn window(&self) -> Option<&DowntimeWindow> {
        self.window.as_ref()
    }

    /// Form fields in the order `cmd.cgi` receives them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("cmd_typ", self.operation.code().to_string()),
            ("cmd_mod", "2".to_string()),
            ("ahas", "on".to_string()),
            ("host", self.target.clone()),
        ];
        if let Some(window) = &self.window {
            params.extend([
                ("com_data", COMMAND_COMMENT.to_string()),
                ("trigger", "0".to_string()),
                ("start_time", window.start_field()),
                ("end_time", window.end_field()),
                ("fixed", (if window.fixed() { "1" } else { "0" }).to_string()),
                // Flexible-duration fields; cmd.cgi ignores them when fixed=1.
                ("hours", "2".to_string()),
                ("minutes", "0".to_string()),
                ("com_author", COMMAND_AUTHOR.to_string()),
                ("btnSubmit", "Commit".to_string()),
            ]);
        }
        params
    }

    pub fn query_string(&self) -> String {
        query::encode(&self.params())
    }
}
