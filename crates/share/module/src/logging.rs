//! Logging setup.

use clap::Args;
use eyre::Result;
use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Debug, Args, Clone, Default)]
#[command(next_help_heading = "Logging")]
pub struct LogArgs {
    /// Silence all output
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Include timestamps in logs
    #[arg(long)]
    pub timestamps: bool,

    /// Extra comma-separated filter directives, e.g. `quadrant_share_getter=trace`
    #[arg(long = "log.filter", value_name = "DIRECTIVE")]
    pub filter: Option<String>,
}

/// Build the log filter for `args`.
///
/// Precedence:
/// 1. `--quiet` shows errors only
/// 2. Otherwise `RUST_LOG` if set, else a level from the verbosity flags
/// 3. `--log.filter` directives are added on top; invalid ones are skipped
pub fn build_filter(args: &LogArgs) -> EnvFilter {
    if args.quiet {
        return EnvFilter::new("error");
    }

    let base_level = match args.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base_level));

    if let Some(custom_filter) = &args.filter {
        for directive in custom_filter.split(',') {
            if let Ok(d) = directive.trim().parse() {
                filter = filter.add_directive(d);
            }
        }
    }

    filter
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(args: &LogArgs) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(build_filter(args));
    let result = if args.timestamps {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };
    result.map_err(|err| eyre::eyre!(err))
}
