//! Unified logging initialization for patgate binaries
//!
//! The filter is chosen in this order:
//! 1. CLI flags (`-v/-q`) when given
//! 2. `RUST_LOG`
//! 3. the binary's default filter

use anyhow::Result;
use clap_verbosity_flag::{LogLevel, Verbosity};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter without installing a subscriber.
pub fn build_filter<L: LogLevel>(
    verbosity: &Verbosity<L>,
    default_filter: &str,
) -> Result<EnvFilter> {
    if verbosity.is_present() {
        let level = verbosity.log_level_filter().to_string().to_lowercase();
        return Ok(EnvFilter::try_new(level)?);
    }

    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
}

/// Initialize the global subscriber.
///
/// # Example
///
/// ```no_run
/// use clap::Parser;
/// use clap_verbosity_flag::{InfoLevel, Verbosity};
/// use patgate_common::logging;
///
/// #[derive(Parser)]
/// struct Args {
///     #[command(flatten)]
///     verbosity: Verbosity<InfoLevel>,
/// }
///
/// let args = Args::parse();
/// logging::init_logging(&args.verbosity, "patgate=info").unwrap();
/// ```
pub fn init_logging<L: LogLevel>(verbosity: &Verbosity<L>, default_filter: &str) -> Result<()> {
    let filter = build_filter(verbosity, default_filter)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap_verbosity_flag::InfoLevel;

    #[test]
    fn test_verbose_flags_override_default() {
        let verbosity = Verbosity::<InfoLevel>::new(2, 0);
        let filter = build_filter(&verbosity, "patgate=info").unwrap();
        assert!(filter.to_string().contains("trace"));
    }

    #[test]
    fn test_quiet_flag_lowers_level() {
        let verbosity = Verbosity::<InfoLevel>::new(0, 1);
        let filter = build_filter(&verbosity, "patgate=info").unwrap();
        assert!(filter.to_string().contains("warn"));
    }
}
