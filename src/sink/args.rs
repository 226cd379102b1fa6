//! Command line arguments for running a Mesos service directly

use crate::types::ResolvedConfig;

/// `--key=value` for every option, then `--flag` for every flag
pub fn service_args(config: &ResolvedConfig) -> Vec<String> {
    let options = config
        .options
        .iter()
        .map(|(key, value)| format!("--{}={}", key, value));
    let flags = config.flags.iter().map(|flag| format!("--{}", flag));

    options.chain(flags).collect()
}
