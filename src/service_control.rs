//! Service control
//!
//! Restart an installed service after its files were rewritten, or run
//! it in the foreground with the resolved configuration as arguments.

use tokio::process::Command;
use tracing::{error, info};

use crate::config::DnsConfigSettings;
use crate::error::{DnsConfigError, Result};
use crate::sink::args::service_args;
use crate::types::{ResolvedConfig, Service};

/// Restart `service` through the init system
pub async fn restart(service: Service) -> Result<()> {
    let command = format!("service {} restart", service);
    info!("🔄 {}", command);

    let output = Command::new("service")
        .arg(service.name())
        .arg("restart")
        .output()
        .await
        .map_err(|source| DnsConfigError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        error!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        return Err(DnsConfigError::CommandFailed {
            command,
            status: output.status,
        });
    }

    Ok(())
}

/// Program and arguments that run `service` in the foreground
pub fn foreground_command(
    service: Service,
    settings: &DnsConfigSettings,
    config: &ResolvedConfig,
) -> (String, Vec<String>) {
    match service {
        Service::MesosMaster | Service::MesosSlave | Service::Marathon => {
            (service.name().to_string(), service_args(config))
        }
        // zookeeper reads zoo.cfg, it takes no per-option arguments
        Service::Zookeeper => (
            settings.zookeeper_server_script.clone(),
            vec!["start-foreground".to_string()],
        ),
    }
}

/// Run `service` in the foreground until it exits
pub async fn run_in_foreground(
    service: Service,
    settings: &DnsConfigSettings,
    config: &ResolvedConfig,
) -> Result<()> {
    let (program, args) = foreground_command(service, settings, config);
    let command = format!("{} {}", program, args.join(" "));
    info!("running: {}", command);

    let status = Command::new(&program)
        .args(&args)
        .status()
        .await
        .map_err(|source| DnsConfigError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !status.success() {
        return Err(DnsConfigError::CommandFailed { command, status });
    }

    Ok(())
}
