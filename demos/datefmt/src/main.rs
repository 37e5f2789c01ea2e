use clap::{Parser, Subcommand};
use timewarp_core::format::{self, DEFAULT_PATTERN};

#[derive(Parser)]
#[command(name = "datefmt")]
#[command(about = "Format and parse timestamps with yyyy/MM/dd/HH/mm patterns", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a millisecond timestamp in the local time zone
    Format {
        #[arg(allow_negative_numbers = true)]
        millis: i64,
        /// Defaults to "yyyy-MM-dd HH:mm"
        pattern: Option<String>,
    },
    /// Read a local date back into milliseconds, printing NaN on mismatch
    Parse {
        value: String,
        /// Defaults to "yyyy-MM-dd HH:mm"
        pattern: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Format { millis, pattern } => {
            let pattern = pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
            log::debug!("format {millis} with pattern {pattern:?}");
            println!("{}", format::format(millis, pattern));
        }
        Commands::Parse { value, pattern } => {
            let pattern = pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
            log::debug!("parse {value:?} with pattern {pattern:?}");
            match format::parse(&value, pattern) {
                Some(ts) => println!("{ts}"),
                None => println!("NaN"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_shape() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from(["datefmt", "format", "-60000", "yyyy"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Format { millis: -60000, pattern: Some(ref p) } if p == "yyyy"
        ));

        let cli = Cli::try_parse_from(["datefmt", "parse", "2024-01-02 03:04"]).unwrap();
        assert!(matches!(cli.command, Commands::Parse { pattern: None, .. }));

        assert!(Cli::try_parse_from(["datefmt", "format", "soon"]).is_err());
        assert!(Cli::try_parse_from(["datefmt"]).is_err());
    }
}
