use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Level implied by `-q` / `-v` flags
pub fn level_for(quiet: bool, verbose: u8) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over the flags;
/// stdout stays clean for `--stdout` output.
pub fn init(quiet: bool, verbose: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for(quiet, verbose).into())
        .from_env_lossy();

    // A second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_map_to_levels() {
        assert_eq!(level_for(true, 3), LevelFilter::ERROR);
        assert_eq!(level_for(false, 0), LevelFilter::INFO);
        assert_eq!(level_for(false, 1), LevelFilter::DEBUG);
        assert_eq!(level_for(false, 2), LevelFilter::TRACE);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false, 0);
        init(true, 0);
    }
}
