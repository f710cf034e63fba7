mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use tracing::info;

use crate::domain::settings::SettingsService;
use crate::infrastructure::bluez::BluezGateway;
use crate::infrastructure::logging;
use crate::infrastructure::power::ShellPower;
use crate::presentation::shell::Shell;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings_service = SettingsService::new().context("failed to load settings")?;
    let settings = settings_service.get().clone();

    let _logging_guard = logging::init_logger(&settings.log_settings)?;
    info!(keyword = %settings.keyword, "starting bluetooth menu");

    let gateway = BluezGateway::new(&settings.adapter_name)
        .await
        .context("failed to connect to BlueZ")?;
    let power = ShellPower::new(&settings.command_on, &settings.command_off);

    let mut shell = Shell::new(&gateway, &power, &settings.keyword, settings.timing());
    shell.run().await
}
