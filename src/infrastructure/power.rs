//! Adapter power control through configurable shell commands.
//!
//! The commands come from settings and default to `bluetoothctl power
//! on/off`. A failed launch is only logged; the executor verifies the
//! outcome by polling adapter presence.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::domain::gateway::AdapterPower;

pub struct ShellPower {
    command_on: String,
    command_off: String,
}

impl ShellPower {
    pub fn new(command_on: &str, command_off: &str) -> Self {
        Self {
            command_on: command_on.to_string(),
            command_off: command_off.to_string(),
        }
    }

    async fn run(command: &str) {
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            warn!("empty power command");
            return;
        };
        info!(command, "running power command");
        let status = Command::new(program)
            .args(parts)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        match status {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(command, %status, "power command failed"),
            Err(err) => warn!(command, %err, "failed to launch power command"),
        }
    }
}

#[async_trait]
impl AdapterPower for ShellPower {
    async fn power_on(&self) {
        Self::run(&self.command_on).await;
    }

    async fn power_off(&self) {
        Self::run(&self.command_off).await;
    }
}
