//! Derivation rules
//!
//! Some options are not copied verbatim but rewritten depending on which
//! service is being configured and which namespace scope the value came
//! from. Today there is one such rule: Marathon reads the Mesos family `zk`
//! setting and derives both its `master` and its own `zk` path from it.

use crate::types::{NamespaceRole, Service};

/// Key whose family-wide value Marathon rewrites
pub const ZK_KEY: &str = "zk";

/// Key Marathon uses to find the Mesos masters
pub const MASTER_KEY: &str = "master";

/// Path component replacing the Mesos chroot in Marathon's zk string
const MARATHON_ZK_NODE: &str = "marathon";

/// What to store for a newly seen option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    /// Store the value under its own key
    Verbatim(String),

    /// Store `zk` under `zk`, and `master` under `master` unless already set
    MarathonZk { master: String, zk: String },
}

/// Pick the rule for an option found under a namespace of the given role
pub fn derive(service: Service, role: NamespaceRole, key: &str, value: &str) -> Derivation {
    match (service, role, key) {
        (Service::Marathon, NamespaceRole::Family, ZK_KEY) => Derivation::MarathonZk {
            master: value.to_string(),
            zk: marathon_zk(value),
        },
        _ => Derivation::Verbatim(value.to_string()),
    }
}

/// Keep the first three `/` segments (scheme and host list) and point the
/// path at Marathon's node
///
/// `zk://10.0.0.1:2181,10.0.0.2:2181/mesos` becomes
/// `zk://10.0.0.1:2181,10.0.0.2:2181/marathon`.
pub fn marathon_zk(value: &str) -> String {
    let head: Vec<&str> = value.split('/').take(3).collect();
    format!("{}/{}", head.join("/"), MARATHON_ZK_NODE)
}
