use std::process::{Output, Stdio};

use anyhow::Context;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

/// Runs `cmd` to completion, killing it if it outlives `command_timeout`.
pub async fn run_command_with_timeout(
    cmd: &mut Command,
    command_timeout: Duration,
    label: &str,
) -> anyhow::Result<Output> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    let child = cmd
        .spawn()
        .with_context(|| format!("failed to spawn {label}"))?;
    match timeout(command_timeout, child.wait_with_output()).await {
        Ok(result) => result.with_context(|| format!("{label} failed")),
        Err(_) => anyhow::bail!(
            "{label} timed out after {}ms",
            command_timeout.as_millis()
        ),
    }
}

/// Like [`run_command_with_timeout`], but a non-zero exit is an error carrying stderr.
pub async fn run_checked(
    cmd: &mut Command,
    command_timeout: Duration,
    label: &str,
) -> anyhow::Result<Output> {
    let output = run_command_with_timeout(cmd, command_timeout, label).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("{label} exited with {}: {}", output.status, stderr.trim());
    }
    Ok(output)
}
