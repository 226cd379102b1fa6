//! ZooKeeper layout
//!
//! Every option except `myid` becomes a `key=value` line of `zoo.cfg`,
//! sorted by key. `myid` lives in its own file in the data directory.
//! Flags have no ZooKeeper equivalent and are ignored.

use std::path::Path;
use tracing::{info, warn};

use super::{create_dir, write_file};
use crate::error::Result;
use crate::types::ResolvedConfig;

/// Option written to the identity file instead of `zoo.cfg`
pub const MYID_KEY: &str = "myid";

/// Name of the properties file
pub const ZOO_CFG: &str = "zoo.cfg";

/// Rendered ZooKeeper files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Contents of the `myid` file, if the option was resolved
    pub myid: Option<String>,

    /// Contents of `zoo.cfg`, empty when there is nothing to write
    pub zoo_cfg: String,
}

/// Render the files without touching the filesystem
pub fn render(config: &ResolvedConfig) -> Rendered {
    let mut myid = None;
    let mut zoo_cfg = String::new();

    // BTreeMap iteration is already sorted by key
    for (option, value) in &config.options {
        if option == MYID_KEY {
            myid = Some(format!("{}\n", value));
        } else {
            zoo_cfg.push_str(&format!("{}={}\n", option, value));
        }
    }

    Rendered { myid, zoo_cfg }
}

/// Write `myid` into `myid_dir` and `zoo.cfg` into `conf_dir`
pub async fn write(myid_dir: &Path, conf_dir: &Path, config: &ResolvedConfig) -> Result<()> {
    create_dir(myid_dir).await?;
    create_dir(conf_dir).await?;

    for (option, value) in &config.options {
        info!("option: {}={}", option, value);
    }
    if !config.flags.is_empty() {
        warn!("ignoring {} flags, zookeeper has no flag files", config.flags.len());
    }

    let rendered = render(config);

    if let Some(myid) = &rendered.myid {
        write_file(myid_dir, MYID_KEY, myid.as_bytes()).await?;
    }

    if !rendered.zoo_cfg.is_empty() {
        write_file(conf_dir, ZOO_CFG, rendered.zoo_cfg.as_bytes()).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(options: &[(&str, &str)]) -> ResolvedConfig {
        let mut config = ResolvedConfig::default();
        for (k, v) in options {
            config.options.insert(k.to_string(), v.to_string());
        }
        config
    }

    #[test]
    fn test_render_sorted_with_separate_myid() {
        let rendered = render(&config(&[
            ("myid", "3"),
            ("tickTime", "2000"),
            ("dataDir", "/var/lib/zk"),
        ]));

        assert_eq!(rendered.myid.as_deref(), Some("3\n"));
        assert_eq!(rendered.zoo_cfg, "dataDir=/var/lib/zk\ntickTime=2000\n");
    }

    #[test]
    fn test_render_without_myid() {
        let rendered = render(&config(&[("clientPort", "2181")]));
        assert_eq!(rendered.myid, None);
        assert_eq!(rendered.zoo_cfg, "clientPort=2181\n");
    }

    #[tokio::test]
    async fn test_write_splits_files() {
        let dir = tempdir().unwrap();
        let myid_dir = dir.path().join("var/lib/zookeeper");
        let conf_dir = dir.path().join("etc/zookeeper/conf");

        let cfg = config(&[("myid", "3"), ("tickTime", "2000"), ("dataDir", "/var/lib/zk")]);
        write(&myid_dir, &conf_dir, &cfg).await.unwrap();

        assert_eq!(std::fs::read_to_string(myid_dir.join("myid")).unwrap(), "3\n");
        assert_eq!(
            std::fs::read_to_string(conf_dir.join("zoo.cfg")).unwrap(),
            "dataDir=/var/lib/zk\ntickTime=2000\n"
        );
        assert!(!conf_dir.join("myid").exists());
    }

    #[tokio::test]
    async fn test_only_myid_skips_zoo_cfg() {
        let dir = tempdir().unwrap();
        let myid_dir = dir.path().join("data");
        let conf_dir = dir.path().join("conf");

        write(&myid_dir, &conf_dir, &config(&[("myid", "1")])).await.unwrap();

        assert!(myid_dir.join("myid").exists());
        assert!(!conf_dir.join("zoo.cfg").exists());
    }
}
