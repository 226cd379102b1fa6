//! TXT Lookup
//!
//! The single network primitive the resolver needs. Production code goes
//! through hickory with the system resolver configuration; tests plug in
//! an in-memory table.

use async_trait::async_trait;
use hickory_resolver::TokioResolver;

use crate::error::Result;

/// Something that can answer TXT queries
#[async_trait]
pub trait TxtLookup: Send + Sync {
    /// Look up TXT records for `name`, one string per record
    ///
    /// An error covers every kind of failure (NXDOMAIN, no records,
    /// timeouts inside the resolver, transport errors).
    async fn lookup_txt(&self, name: &str) -> anyhow::Result<Vec<String>>;
}

/// TXT lookups through hickory-resolver
pub struct HickoryTxtLookup {
    resolver: TokioResolver,
}

impl HickoryTxtLookup {
    /// Create a resolver from `/etc/resolv.conf` (or the platform equivalent)
    pub fn from_system_conf() -> Result<Self> {
        let resolver = TokioResolver::builder_tokio()?.build();
        Ok(Self { resolver })
    }
}

#[async_trait]
impl TxtLookup for HickoryTxtLookup {
    async fn lookup_txt(&self, name: &str) -> anyhow::Result<Vec<String>> {
        let lookup = self.resolver.txt_lookup(name).await?;

        // A record split into several character-strings is read as one line
        Ok(lookup.iter().map(|txt| txt.to_string()).collect())
    }
}
