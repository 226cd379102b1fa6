//! Key-file directory layout used by the Mesosphere packages
//!
//! `/etc/mesos-master/quorum` holds `2\n`, `/etc/mesos-master/?quiet` is an
//! empty marker enabling the `--quiet` flag.

use std::path::Path;
use tracing::info;

use super::{create_dir, write_file};
use crate::error::Result;
use crate::types::ResolvedConfig;

/// Marker prefix for flag files
pub const FLAG_PREFIX: char = '?';

/// Write one file per option and one marker per flag into `dir`
pub async fn write(dir: &Path, config: &ResolvedConfig) -> Result<()> {
    create_dir(dir).await?;

    for (option, value) in &config.options {
        info!("option: {}={}", option, value);
        write_file(dir, option, format!("{}\n", value).as_bytes()).await?;
    }

    for flag in &config.flags {
        info!("flag: {}", flag);
        write_file(dir, &format!("{}{}", FLAG_PREFIX, flag), b"").await?;
    }

    Ok(())
}
