use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs the global logger once. `RUST_LOG` overrides the filters set here.
pub fn initialize_logger(verbose: bool) {
    INIT.call_once_force(|_| {
        let crate_level: LevelFilter = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        let mut builder: Builder = Builder::new();

        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("twin_buckets", crate_level)
            .format_timestamp_millis()
            .parse_default_env();

        let _ = builder.try_init();
    });
}

#[cfg(test)]
mod tests {
    use log::{debug, info};

    use super::*;

    #[test]
    fn repeated_initialization_is_harmless() {
        initialize_logger(false);
        initialize_logger(true);
        debug!("debug message in test");
        info!("info message in test");
    }
}
