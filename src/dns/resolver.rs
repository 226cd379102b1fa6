//! Hierarchical TXT Resolver
//!
//! Walks every domain suffix of a hostname and every namespace of a
//! service, and fetches all resulting query names at once. Lookups that
//! fail simply leave no entry behind; ordering is restored later by the
//! merger, so completion order does not matter here.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::dns::TxtLookup;
use crate::types::{Hostname, Namespace, QueryLayout, RecordSets};

/// Concurrent TXT fetcher for one resolution pass
pub struct Resolver {
    /// Network primitive
    lookup: Arc<dyn TxtLookup>,

    /// Query name layout
    layout: QueryLayout,

    /// Per-lookup timeout
    timeout: Duration,
}

impl Resolver {
    /// Create a new resolver
    pub fn new(lookup: Arc<dyn TxtLookup>, layout: QueryLayout, timeout: Duration) -> Self {
        Self {
            lookup,
            layout,
            timeout,
        }
    }

    /// Fetch the TXT records of every (domain suffix, namespace) pair
    ///
    /// Returns once every lookup has finished, failed or timed out.
    pub async fn resolve(&self, namespaces: &[Namespace], hostname: &Hostname) -> RecordSets {
        let records = Arc::new(Mutex::new(RecordSets::new()));
        let mut tasks = JoinSet::new();

        for domain in hostname.suffixes() {
            for namespace in namespaces {
                let key = self.layout.key(namespace, &domain);
                let lookup = self.lookup.clone();
                let records = records.clone();
                let timeout = self.timeout;

                tasks.spawn(async move {
                    match tokio::time::timeout(timeout, lookup.lookup_txt(key.as_str())).await {
                        Ok(Ok(txt)) if txt.is_empty() => {
                            debug!("lookup {}: no records", key);
                        }
                        Ok(Ok(txt)) => {
                            debug!("lookup {}: found", key);
                            records.lock().await.insert(key, txt);
                        }
                        Ok(Err(e)) => {
                            debug!("lookup {}: {}", key, e);
                        }
                        Err(_) => {
                            debug!("lookup {}: timed out after {:?}", key, timeout);
                        }
                    }
                });
            }
        }

        debug!(
            "waiting for {} lookups ({} suffixes x {} namespaces)",
            tasks.len(),
            hostname.depth(),
            namespaces.len()
        );

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                warn!("lookup task failed: {}", e);
            }
        }

        // Every task has been joined, so ours is the last handle
        match Arc::try_unwrap(records) {
            Ok(records) => records.into_inner(),
            Err(shared) => shared.lock().await.clone(),
        }
    }
}
