//! Core types for DNS-driven service configuration
//!
//! These types describe what is looked up (services, namespaces, query
//! names) and what comes out of a resolution pass (options and flags).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::DnsConfigError;

// =============================================================================
// SERVICES
// =============================================================================

/// Services that can be configured from DNS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    /// Mesos master (scheduler master)
    MesosMaster,

    /// Mesos slave (scheduler worker)
    MesosSlave,

    /// Marathon (application orchestrator on top of Mesos)
    Marathon,

    /// ZooKeeper (coordination service)
    Zookeeper,
}

impl Service {
    /// All known services, in declaration order
    pub const ALL: [Service; 4] = [
        Service::MesosMaster,
        Service::MesosSlave,
        Service::Marathon,
        Service::Zookeeper,
    ];

    /// Name used on the command line, for init scripts and binaries
    pub fn name(&self) -> &'static str {
        match self {
            Service::MesosMaster => "mesos-master",
            Service::MesosSlave => "mesos-slave",
            Service::Marathon => "marathon",
            Service::Zookeeper => "zookeeper",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Service {
    type Err = DnsConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|service| service.name() == s)
            .ok_or_else(|| DnsConfigError::UnknownService(s.to_string()))
    }
}

// =============================================================================
// NAMESPACES
// =============================================================================

/// What scope a namespace label stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceRole {
    /// Scope owned by a single service (e.g. `.marathon.`)
    Service,

    /// Scope shared by the whole Mesos family (`.mesos.`)
    Family,
}

/// A namespace label plus the role it plays in derivation rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Label spliced into the query name, dots included
    pub label: String,

    /// Scope of the label
    pub role: NamespaceRole,
}

impl Namespace {
    pub fn new(label: impl Into<String>, role: NamespaceRole) -> Self {
        Self {
            label: label.into(),
            role,
        }
    }
}

/// Namespace priority lists per service
///
/// Built once at startup and only read afterwards. Earlier entries in a
/// list take precedence over later ones.
#[derive(Debug, Clone)]
pub struct NamespaceTable {
    entries: HashMap<Service, Vec<Namespace>>,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        let family = || Namespace::new(".mesos.", NamespaceRole::Family);
        let own = |label: &str| Namespace::new(label, NamespaceRole::Service);

        let mut entries = HashMap::new();
        entries.insert(Service::MesosMaster, vec![own(".mesos-master."), family()]);
        entries.insert(Service::MesosSlave, vec![own(".mesos-slave."), family()]);
        entries.insert(Service::Marathon, vec![own(".marathon."), family()]);
        entries.insert(Service::Zookeeper, vec![own(".zookeeper.")]);

        Self { entries }
    }
}

impl NamespaceTable {
    /// Priority list for a service, highest priority first
    pub fn priorities(&self, service: Service) -> &[Namespace] {
        self.entries
            .get(&service)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

// =============================================================================
// HOSTNAMES AND QUERY NAMES
// =============================================================================

/// A dot-separated hostname
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hostname {
    labels: Vec<String>,
}

impl Hostname {
    /// Parse a hostname, dropping a single trailing root dot
    pub fn parse(name: &str) -> Result<Self, DnsConfigError> {
        let trimmed = name.strip_suffix('.').unwrap_or(name);
        if trimmed.is_empty() {
            return Err(DnsConfigError::InvalidHostname(name.to_string()));
        }

        Ok(Self {
            labels: trimmed.split('.').map(str::to_string).collect(),
        })
    }

    /// Number of labels
    pub fn depth(&self) -> usize {
        self.labels.len()
    }

    /// Domain suffixes from the full hostname down to the top-level label
    pub fn suffixes(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.labels.len()).map(move |i| self.labels[i..].join("."))
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels.join("."))
    }
}

/// Fixed parts of every configuration query name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryLayout {
    /// Leading label(s), e.g. `config`
    pub prefix: String,

    /// Label(s) between namespace and domain, e.g. `_mesosphere.`
    pub separator: String,
}

impl Default for QueryLayout {
    fn default() -> Self {
        Self {
            prefix: "config".to_string(),
            separator: "_mesosphere.".to_string(),
        }
    }
}

impl QueryLayout {
    /// Build the query name for one (namespace, domain suffix) pair
    pub fn key(&self, namespace: &Namespace, domain: &str) -> QueryKey {
        QueryKey(format!(
            "{}{}{}{}",
            self.prefix, namespace.label, self.separator, domain
        ))
    }
}

/// Fully qualified TXT query name, also used as the aggregation key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// TXT lines per query name; failed lookups have no entry
pub type RecordSets = HashMap<QueryKey, Vec<String>>;

// =============================================================================
// RESOLVED CONFIGURATION
// =============================================================================

/// Outcome of one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    /// Options (`key=value` lines), first assignment wins
    pub options: BTreeMap<String, String>,

    /// Flags (bare `key` lines)
    pub flags: BTreeSet<String>,
}

impl ResolvedConfig {
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.flags.is_empty()
    }
}
