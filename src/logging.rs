/*
 * Logging Module
 *
 * Installs the env_logger backend behind the `log` facade used across the
 * crate. RUST_LOG overrides the default level.
 */

use env_logger::{Builder, Env};
use log::LevelFilter;

// Initialise the global logger; `verbose` lowers the default level to debug
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);

    // A second call keeps the logger installed first
    let _ = builder.try_init();
}
