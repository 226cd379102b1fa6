//! Mesos DNS Config
//!
//! Configures Mesos masters and slaves, Marathon and ZooKeeper from DNS TXT
//! records, so a whole cluster can be described in its zone files.
//!
//! ## Lookup scheme
//!
//! For `--service marathon --hostname host1.dc1.example.com` the records
//! below are fetched, and the first value found for a key wins in this
//! order:
//!
//! ```text
//! config.marathon._mesosphere.host1.dc1.example.com
//! config.mesos._mesosphere.host1.dc1.example.com
//! config.marathon._mesosphere.dc1.example.com
//! config.mesos._mesosphere.dc1.example.com
//! config.marathon._mesosphere.example.com
//! config.mesos._mesosphere.example.com
//! config.marathon._mesosphere.com
//! config.mesos._mesosphere.com
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    MESOS DNS CONFIG                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Resolver  ←── concurrent TXT lookups per suffix/namespace   │
//! │  Merger    ←── first value wins, marathon zk derivation      │
//! │  Sinks     ←── key files, zoo.cfg + myid, --key=value args   │
//! │  Control   ←── service restart or foreground exec            │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

mod config;
mod dns;
mod error;
mod merge;
mod service_control;
mod sink;
mod types;

use config::DnsConfigSettings;
use dns::{HickoryTxtLookup, Resolver, TxtLookup};
use error::DnsConfigError;
use types::{Hostname, NamespaceTable, ResolvedConfig, Service};

/// Mesos DNS Config - service configuration from DNS TXT records
#[derive(Parser, Debug)]
#[command(name = "mesos-dnsconfig")]
#[command(version)]
#[command(about = "Configure Mesos, Marathon and ZooKeeper from DNS TXT records", long_about = None)]
struct Args {
    /// Service to configure: mesos-master, mesos-slave, marathon or zookeeper
    #[arg(short, long)]
    service: Service,

    /// Hostname to use, the OS hostname is used by default
    #[arg(long)]
    hostname: Option<String>,

    /// Write configs to files
    #[arg(long)]
    write: bool,

    /// Start the service (restart it when combined with --write)
    #[arg(long)]
    exec: bool,

    /// Path to settings file
    #[arg(short, long, default_value = "dnsconfig.toml")]
    config: PathBuf,

    /// Prefix prepended to every output directory
    #[arg(long)]
    fs_prefix: Option<String>,

    /// Per-lookup timeout in seconds
    #[arg(long)]
    lookup_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write the effective settings to this TOML file and exit
    #[arg(long)]
    write_settings: Option<PathBuf>,
}

/// Dry-run output
#[derive(Serialize)]
struct Report<'a> {
    service: Service,
    hostname: String,
    #[serde(flatten)]
    config: &'a ResolvedConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load settings
    let settings = if args.config.exists() {
        DnsConfigSettings::load(&args.config)?
    } else {
        DnsConfigSettings::default()
    };

    // Override settings with CLI args
    let settings = settings
        .with_fs_prefix(args.fs_prefix.clone())
        .with_lookup_timeout(args.lookup_timeout);

    settings.validate()?;

    if let Some(path) = &args.write_settings {
        settings.save(path)?;
        info!("📝 Settings written to {:?}", path);
        return Ok(());
    }

    let hostname = match &args.hostname {
        Some(name) => Hostname::parse(name)?,
        None => Hostname::parse(&local_hostname()?)?,
    };
    info!("using hostname {}", hostname);

    let table = NamespaceTable::default();
    let lookup: Arc<dyn TxtLookup> = Arc::new(HickoryTxtLookup::from_system_conf()?);

    let config = find_config(args.service, &hostname, &table, &settings, lookup).await;

    if config.is_empty() {
        warn!("no configuration found for {} on {}", args.service, hostname);
    }

    match (args.write, args.exec) {
        (true, true) => {
            sink::commit(args.service, &settings, &config).await?;
            service_control::restart(args.service).await?;
        }
        (true, false) => {
            sink::commit(args.service, &settings, &config).await?;
        }
        (false, true) => {
            service_control::run_in_foreground(args.service, &settings, &config).await?;
        }
        (false, false) => {
            let report = Report {
                service: args.service,
                hostname: hostname.to_string(),
                config: &config,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Fetch and merge the configuration of `service` for `hostname`
async fn find_config(
    service: Service,
    hostname: &Hostname,
    table: &NamespaceTable,
    settings: &DnsConfigSettings,
    lookup: Arc<dyn TxtLookup>,
) -> ResolvedConfig {
    let namespaces = table.priorities(service);
    let layout = settings.layout();

    let resolver = Resolver::new(lookup, layout.clone(), settings.lookup_timeout());
    let records = resolver.resolve(namespaces, hostname).await;

    merge::merge(service, namespaces, &layout, hostname, &records)
}

/// Hostname reported by the operating system
fn local_hostname() -> error::Result<String> {
    let name = hostname::get().map_err(DnsConfigError::Hostname)?;
    name.into_string()
        .map_err(|raw| DnsConfigError::InvalidHostname(raw.to_string_lossy().into_owned()))
}
