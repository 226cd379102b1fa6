//! Settings
//!
//! Query layout, lookup timing and output locations. Defaults match the
//! stock Mesosphere package layout, so most hosts run without a settings
//! file at all.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::QueryLayout;

/// Main settings for a resolution run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsConfigSettings {
    // === Query names ===

    /// First label(s) of every query name
    pub record_prefix: String,

    /// Label(s) placed between the namespace and the domain suffix
    pub record_separator: String,

    // === Timing ===

    /// Upper bound for a single TXT lookup (seconds)
    /// A lookup that runs over is handled like a failed one
    pub lookup_timeout_secs: u64,

    // === Output ===

    /// Prefix prepended verbatim to every output directory
    pub fs_prefix: String,

    /// Key-file directory for mesos-master
    pub mesos_master_dir: String,

    /// Key-file directory for mesos-slave
    pub mesos_slave_dir: String,

    /// Key-file directory for marathon
    pub marathon_dir: String,

    /// Directory receiving the zookeeper `myid` file
    pub zookeeper_myid_dir: String,

    /// Directory receiving `zoo.cfg`
    pub zookeeper_conf_dir: String,

    // === Process control ===

    /// Script used to run zookeeper in the foreground
    pub zookeeper_server_script: String,
}

impl Default for DnsConfigSettings {
    fn default() -> Self {
        Self {
            record_prefix: "config".to_string(),
            record_separator: "_mesosphere.".to_string(),

            lookup_timeout_secs: 10,

            fs_prefix: String::new(),
            mesos_master_dir: "/etc/mesos-master/".to_string(),
            mesos_slave_dir: "/etc/mesos-slave/".to_string(),
            marathon_dir: "/etc/marathon/conf/".to_string(),
            zookeeper_myid_dir: "/var/lib/zookeeper/".to_string(),
            zookeeper_conf_dir: "/etc/zookeeper/conf/".to_string(),

            zookeeper_server_script: "/usr/share/zookeeper/bin/zkServer.sh".to_string(),
        }
    }
}

impl DnsConfigSettings {
    /// Load settings from TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to TOML file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    // Builder-style methods for CLI overrides

    pub fn with_fs_prefix(mut self, prefix: Option<String>) -> Self {
        if let Some(prefix) = prefix {
            self.fs_prefix = prefix;
        }
        self
    }

    pub fn with_lookup_timeout(mut self, secs: Option<u64>) -> Self {
        if let Some(secs) = secs {
            self.lookup_timeout_secs = secs;
        }
        self
    }

    /// Query name layout derived from the prefix and separator
    pub fn layout(&self) -> QueryLayout {
        QueryLayout {
            prefix: self.record_prefix.clone(),
            separator: self.record_separator.clone(),
        }
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    /// Output directory with the filesystem prefix applied
    pub fn output_dir(&self, dir: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.fs_prefix, dir))
    }

    /// Validate settings values
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.record_prefix.is_empty() {
            anyhow::bail!("record_prefix must not be empty");
        }

        if self.record_separator.is_empty() {
            anyhow::bail!("record_separator must not be empty");
        }

        if self.lookup_timeout_secs == 0 {
            anyhow::bail!("lookup_timeout_secs must be greater than 0");
        }

        Ok(())
    }
}
