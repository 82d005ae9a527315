use std::fmt;

/// Phrase `cmd.cgi` prints when it accepted a command.
pub const SUCCESS_MARKER: &str = "successfully submitted";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Accepted,
    HttpError { status: u16, body: String },
    Rejected { body: String },
}

impl CommandOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("command accepted"),
            Self::HttpError { status, body } => {
                write!(f, "monitoring server returned HTTP {status}\n{body}")
            }
            Self::Rejected { body } => {
                write!(f, "monitoring server did not accept the command\n{body}")
            }
        }
    }
}

/// Maps an HTTP status and body to an outcome. Swap it out if the server's
/// wording changes.
pub type ResponseClassifier = fn(u16, &str) -> CommandOutcome;

pub fn classify_response(status: u16, body: &str) -> CommandOutcome {
    if (400..600).contains(&status) {
        return CommandOutcome::HttpError {
            status,
            body: body.to_string(),
        };
    }
    if body.contains(SUCCESS_MARKER) {
        CommandOutcome::Accepted
    } else {
        CommandOutcome::Rejected {
            body: body.to_string(),
        }
    }
}
