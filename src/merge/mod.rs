//! Merge Module
//!
//! Folds the fetched record sets into one configuration.
//!
//! Record sets are visited most-specific domain first and, within a domain,
//! highest-priority namespace first. The first value seen for a key is
//! kept, so a host-level record beats a domain-wide one and a service
//! namespace beats the family namespace. The order is rebuilt from the
//! hostname and namespace list, never from lookup completion order.

pub mod derive;

use tracing::debug;

use crate::types::{Hostname, Namespace, QueryLayout, RecordSets, ResolvedConfig, Service};
use derive::{derive, Derivation, MASTER_KEY, ZK_KEY};

/// One classified TXT line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordLine<'a> {
    /// Bare name
    Flag(&'a str),

    /// `key=value`, split on the first `=`
    Option { key: &'a str, value: &'a str },

    /// Empty line or empty key
    Malformed,
}

fn classify(line: &str) -> RecordLine<'_> {
    match line.split_once('=') {
        None if line.is_empty() => RecordLine::Malformed,
        None => RecordLine::Flag(line),
        Some(("", _)) => RecordLine::Malformed,
        Some((key, value)) => RecordLine::Option { key, value },
    }
}

/// Merge record sets for `service` into options and flags
pub fn merge(
    service: Service,
    namespaces: &[Namespace],
    layout: &QueryLayout,
    hostname: &Hostname,
    records: &RecordSets,
) -> ResolvedConfig {
    let mut config = ResolvedConfig::default();

    for domain in hostname.suffixes() {
        for namespace in namespaces {
            let key = layout.key(namespace, &domain);
            let Some(lines) = records.get(&key) else {
                continue;
            };

            for line in lines {
                match classify(line) {
                    RecordLine::Flag(flag) => {
                        debug!("{}: enabling {}", key, flag);
                        config.flags.insert(flag.to_string());
                    }
                    RecordLine::Option { key: name, value } => {
                        if let Some(current) = config.options.get(name) {
                            debug!(
                                "option {} is already defined as {}, not overwriting with {}",
                                name, current, value
                            );
                            continue;
                        }

                        match derive(service, namespace.role, name, value) {
                            Derivation::Verbatim(value) => {
                                debug!("{}: found {} => {}", key, name, value);
                                config.options.insert(name.to_string(), value);
                            }
                            Derivation::MarathonZk { master, zk } => {
                                if !config.options.contains_key(MASTER_KEY) {
                                    debug!("{}: setting {} => {}", key, MASTER_KEY, master);
                                    config.options.insert(MASTER_KEY.to_string(), master);
                                }
                                debug!("{}: deriving {} => {} from {}", key, ZK_KEY, zk, value);
                                config.options.insert(ZK_KEY.to_string(), zk);
                            }
                        }
                    }
                    RecordLine::Malformed => {
                        debug!("{}: unknown contents {:?}", key, line);
                    }
                }
            }
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NamespaceRole, NamespaceTable, QueryKey};

    /// Turn wire names like `config.mesos._mesosphere.example.com` back
    /// into keys built by the real layout
    fn key_for(name: &str) -> QueryKey {
        let layout = QueryLayout::default();
        let rest = name.strip_prefix(layout.prefix.as_str()).unwrap();
        let (label, domain) = rest.split_once(layout.separator.as_str()).unwrap();
        layout.key(&Namespace::new(label, NamespaceRole::Service), domain)
    }

    fn records(entries: &[(&str, &[&str])]) -> RecordSets {
        entries
            .iter()
            .map(|(name, lines)| (key_for(name), lines.iter().map(|l| l.to_string()).collect()))
            .collect()
    }

    fn merge_for(service: Service, host: &str, records: &RecordSets) -> ResolvedConfig {
        let table = NamespaceTable::default();
        merge(
            service,
            table.priorities(service),
            &QueryLayout::default(),
            &Hostname::parse(host).unwrap(),
            records,
        )
    }

    #[test]
    fn test_classify_lines() {
        assert_eq!(classify("quiet"), RecordLine::Flag("quiet"));
        assert_eq!(
            classify("quorum=2"),
            RecordLine::Option { key: "quorum", value: "2" }
        );
        assert_eq!(
            classify("attributes=rack=a"),
            RecordLine::Option { key: "attributes", value: "rack=a" }
        );
        assert_eq!(classify("empty="), RecordLine::Option { key: "empty", value: "" });
        assert_eq!(classify(""), RecordLine::Malformed);
        assert_eq!(classify("==bad==value"), RecordLine::Malformed);
    }

    #[test]
    fn test_most_specific_domain_wins() {
        let records = records(&[
            ("config.mesos-master._mesosphere.example.com", &["quorum=1"]),
            ("config.mesos-master._mesosphere.m1.example.com", &["quorum=3"]),
        ]);

        let config = merge_for(Service::MesosMaster, "m1.example.com", &records);
        assert_eq!(config.options["quorum"], "3");
    }

    #[test]
    fn test_service_namespace_beats_family_at_same_domain() {
        let records = records(&[
            ("config.mesos._mesosphere.example.com", &["work_dir=/var/lib/mesos"]),
            ("config.mesos-slave._mesosphere.example.com", &["work_dir=/srv/mesos"]),
        ]);

        let config = merge_for(Service::MesosSlave, "s1.example.com", &records);
        assert_eq!(config.options["work_dir"], "/srv/mesos");
    }

    #[test]
    fn test_domain_specificity_outranks_namespace_priority() {
        // family namespace on the host beats the service namespace on the domain
        let records = records(&[
            ("config.mesos-slave._mesosphere.example.com", &["port=5051"]),
            ("config.mesos._mesosphere.s1.example.com", &["port=5052"]),
        ]);

        let config = merge_for(Service::MesosSlave, "s1.example.com", &records);
        assert_eq!(config.options["port"], "5052");
    }

    #[test]
    fn test_reversed_priority_list_changes_outcome() {
        let records = records(&[
            ("config.mesos._mesosphere.example.com", &["log_dir=/var/log/mesos"]),
            ("config.mesos-master._mesosphere.example.com", &["log_dir=/srv/log"]),
        ]);
        let host = Hostname::parse("m1.example.com").unwrap();
        let layout = QueryLayout::default();
        let table = NamespaceTable::default();

        let forward = table.priorities(Service::MesosMaster).to_vec();
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = merge(Service::MesosMaster, &forward, &layout, &host, &records);
        let b = merge(Service::MesosMaster, &reversed, &layout, &host, &records);

        assert_eq!(a.options["log_dir"], "/srv/log");
        assert_eq!(b.options["log_dir"], "/var/log/mesos");
    }

    #[test]
    fn test_first_line_in_a_record_set_wins() {
        let records = records(&[(
            "config.zookeeper._mesosphere.example.com",
            &["tickTime=2000", "tickTime=3000"],
        )]);

        let config = merge_for(Service::Zookeeper, "zk1.example.com", &records);
        assert_eq!(config.options["tickTime"], "2000");
    }

    #[test]
    fn test_flags_and_options_are_disjoint() {
        let records = records(&[(
            "config.mesos-master._mesosphere.example.com",
            &["quiet", "quorum=2", "quiet", "log_auto_initialize"],
        )]);

        let config = merge_for(Service::MesosMaster, "m1.example.com", &records);

        assert_eq!(config.options.len(), 1);
        assert_eq!(config.options["quorum"], "2");
        assert_eq!(config.flags.len(), 2);
        assert!(config.flags.contains("quiet"));
        assert!(config.flags.contains("log_auto_initialize"));
        assert!(!config.flags.contains("quorum"));
        assert!(!config.options.contains_key("quiet"));
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let records = records(&[(
            "config.mesos-master._mesosphere.example.com",
            &["==bad==value", "", "quorum=2"],
        )]);

        let config = merge_for(Service::MesosMaster, "m1.example.com", &records);

        assert_eq!(config.options.len(), 1);
        assert_eq!(config.options["quorum"], "2");
        assert!(config.flags.is_empty());
    }

    #[test]
    fn test_empty_records_give_empty_config() {
        let config = merge_for(Service::Marathon, "host1.dc1.example.com", &RecordSets::new());
        assert!(config.is_empty());
    }

    #[test]
    fn test_marathon_derives_master_and_zk() {
        let records = records(&[(
            "config.mesos._mesosphere.example.com",
            &["zk=zk://10.0.0.1:2181/mesos"],
        )]);

        let config = merge_for(Service::Marathon, "host1.dc1.example.com", &records);

        assert_eq!(config.options["master"], "zk://10.0.0.1:2181/mesos");
        assert_eq!(config.options["zk"], "zk://10.0.0.1:2181/marathon");
        assert_eq!(config.options.len(), 2);
    }

    #[test]
    fn test_marathon_keeps_explicit_master() {
        let records = records(&[
            ("config.marathon._mesosphere.example.com", &["master=zk://other:2181/mesos"]),
            ("config.mesos._mesosphere.example.com", &["zk=zk://10.0.0.1:2181/mesos"]),
        ]);

        let config = merge_for(Service::Marathon, "host1.example.com", &records);

        assert_eq!(config.options["master"], "zk://other:2181/mesos");
        assert_eq!(config.options["zk"], "zk://10.0.0.1:2181/marathon");
    }

    #[test]
    fn test_marathon_own_zk_is_not_rewritten() {
        let records = records(&[
            ("config.marathon._mesosphere.example.com", &["zk=zk://10.0.0.9:2181/apps"]),
            ("config.mesos._mesosphere.example.com", &["zk=zk://10.0.0.1:2181/mesos"]),
        ]);

        let config = merge_for(Service::Marathon, "host1.example.com", &records);

        assert_eq!(config.options["zk"], "zk://10.0.0.9:2181/apps");
        assert!(!config.options.contains_key("master"));
    }

    #[test]
    fn test_mesos_services_take_family_zk_verbatim() {
        let records = records(&[(
            "config.mesos._mesosphere.example.com",
            &["zk=zk://10.0.0.1:2181/mesos"],
        )]);

        for service in [Service::MesosMaster, Service::MesosSlave] {
            let config = merge_for(service, "host1.example.com", &records);
            assert_eq!(config.options["zk"], "zk://10.0.0.1:2181/mesos");
            assert!(!config.options.contains_key("master"));
        }
    }

    #[test]
    fn test_merge_is_idempotent() {
        let records = records(&[
            ("config.mesos._mesosphere.example.com", &["zk=zk://10.0.0.1:2181/mesos", "quiet"]),
            ("config.marathon._mesosphere.dc1.example.com", &["http_port=8080", "checkpoint"]),
        ]);

        let first = merge_for(Service::Marathon, "host1.dc1.example.com", &records);
        let second = merge_for(Service::Marathon, "host1.dc1.example.com", &records);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
