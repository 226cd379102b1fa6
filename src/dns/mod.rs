//! DNS Module
//!
//! Fetches configuration TXT records along a hostname's domain hierarchy.
//!
//! ## Query names
//!
//! `<prefix><namespace><separator><domain suffix>`, for example
//! `config.mesos._mesosphere.example.com`.
//!
//! ## TXT lines
//!
//! - `key=value`: option
//! - `key`: flag

mod lookup;
mod resolver;

pub use lookup::{HickoryTxtLookup, TxtLookup};
pub use resolver::Resolver;

#[cfg(test)]
pub(crate) use lookup::testing;
