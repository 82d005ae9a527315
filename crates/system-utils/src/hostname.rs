use anyhow::Context;
use tokio::process::Command;
use tokio::time::Duration;

use crate::process::run_checked;

const HOSTNAME_TIMEOUT: Duration = Duration::from_secs(3);

/// Fully qualified name of this machine, lower-cased.
///
/// The kernel hostname is used as-is when it already carries a domain.
/// Otherwise `hostname -f` is asked for the canonical name; if that tool is
/// missing or only knows the short name, the short name is returned.
pub async fn local_fqdn() -> anyhow::Result<String> {
    let raw = hostname::get().context("failed to read local hostname")?;
    let short = normalize_hostname(raw.to_string_lossy().as_bytes())
        .context("local hostname is empty")?;
    if is_qualified(&short) {
        return Ok(short);
    }
    let canonical = match canonical_hostname().await {
        Ok(name) => Some(name),
        Err(err) => {
            tracing::debug!(error = %err, host = %short, "no canonical name, using short hostname");
            None
        }
    };
    Ok(pick_fqdn(short, canonical))
}

async fn canonical_hostname() -> anyhow::Result<String> {
    let mut cmd = Command::new("hostname");
    cmd.arg("-f");
    let output = run_checked(&mut cmd, HOSTNAME_TIMEOUT, "hostname -f").await?;
    normalize_hostname(&output.stdout).context("hostname -f printed nothing")
}

fn is_qualified(name: &str) -> bool {
    name.contains('.')
}

fn pick_fqdn(short: String, canonical: Option<String>) -> String {
    match canonical {
        Some(name) if is_qualified(&name) => name,
        _ => short,
    }
}

pub fn normalize_hostname(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let name = text.lines().next()?.trim().trim_end_matches('.');
    if name.is_empty() {
        return None;
    }
    Some(name.to_lowercase())
}
