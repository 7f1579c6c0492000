// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::CliArgs;

use clap::Parser;

/// Parse command-line arguments using clap
///
/// Values missing from the command line are taken from the environment.
/// Call `dotenvy::dotenv()` first so a `.env` file is honoured. If parsing
/// fails (missing required setting, invalid date, --help), clap displays an
/// error message or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
