//! Output Sinks
//!
//! Turn a [`ResolvedConfig`] into something a service consumes:
//! - `flat`: one file per option plus `?flag` markers (Mesos, Marathon)
//! - `properties`: `zoo.cfg` plus a separate `myid` file (ZooKeeper)
//! - `args`: `--key=value` command line arguments
//!
//! Files are replaced atomically: written to a temporary file in the
//! target directory, made world-readable, then renamed into place.

pub mod args;
pub mod flat;
pub mod properties;

use std::path::Path;
use tracing::debug;

use crate::config::DnsConfigSettings;
use crate::error::{DnsConfigError, Result};
use crate::types::{ResolvedConfig, Service};

/// Prefix of temporary files left behind by an interrupted write
const TEMP_PREFIX: &str = ".mesospherednsconfig";

/// Write the configuration of `service` to its usual location
pub async fn commit(
    service: Service,
    settings: &DnsConfigSettings,
    config: &ResolvedConfig,
) -> Result<()> {
    match service {
        Service::MesosMaster => {
            flat::write(&settings.output_dir(&settings.mesos_master_dir), config).await
        }
        Service::MesosSlave => {
            flat::write(&settings.output_dir(&settings.mesos_slave_dir), config).await
        }
        Service::Marathon => {
            flat::write(&settings.output_dir(&settings.marathon_dir), config).await
        }
        Service::Zookeeper => {
            properties::write(
                &settings.output_dir(&settings.zookeeper_myid_dir),
                &settings.output_dir(&settings.zookeeper_conf_dir),
                config,
            )
            .await
        }
    }
}

/// Create `dir` and its parents (mode 0755 on unix)
pub(crate) async fn create_dir(dir: &Path) -> Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);

    builder
        .create(dir)
        .await
        .map_err(|source| DnsConfigError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
}

/// Replace `dir/name` with `data` (mode 0644 on unix)
pub(crate) async fn write_file(dir: &Path, name: &str, data: &[u8]) -> Result<()> {
    let target = dir.join(name);
    let temp = dir.join(format!("{}.{}.tmp", TEMP_PREFIX, name));

    debug!("writing {:?}", target);

    let wrap = |source| DnsConfigError::Write {
        path: target.clone(),
        source,
    };

    tokio::fs::write(&temp, data).await.map_err(wrap)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o644);
        tokio::fs::set_permissions(&temp, perms).await.map_err(wrap)?;
    }

    tokio::fs::rename(&temp, &target).await.map_err(wrap)?;

    Ok(())
}
