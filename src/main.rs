use anyhow::Result;
use cconv::core::log::init_logging;
use cconv::core::prefs::Theme;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for cconv::AppCommand {
    fn from(cmd: Commands) -> cconv::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                from,
                to,
                swap,
                json,
            } => cconv::AppCommand::Convert {
                amount,
                from,
                to,
                swap,
                json,
            },
            Commands::Currencies => cconv::AppCommand::Currencies,
            Commands::History { clear, replay } => cconv::AppCommand::History { clear, replay },
            Commands::Stats { reset } => cconv::AppCommand::Stats { reset },
            Commands::Favorites { amount } => cconv::AppCommand::Favorites { amount },
            Commands::Theme { toggle, set } => cconv::AppCommand::Theme { toggle, set },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert; empty means 0
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Source currency (defaults to the last used one)
        #[arg(short, long)]
        from: Option<String>,
        /// Target currency (defaults to the last used one)
        #[arg(short, long)]
        to: Option<String>,
        /// Swap source and target before converting
        #[arg(short, long)]
        swap: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List supported currencies
    Currencies,
    /// Show recent conversions
    History {
        /// Remove all history entries
        #[arg(long, conflicts_with = "replay")]
        clear: bool,
        /// Run the conversion at this position again (1 is the newest)
        #[arg(long, value_name = "N")]
        replay: Option<usize>,
    },
    /// Show usage statistics
    Stats {
        /// Reset all counters
        #[arg(long)]
        reset: bool,
    },
    /// Convert an amount across the favorite pairs
    Favorites {
        #[arg(default_value = "1")]
        amount: String,
    },
    /// Show or change the color theme
    Theme {
        /// Switch between light and dark
        #[arg(long, conflicts_with = "set")]
        toggle: bool,
        /// Set the theme explicitly (light or dark)
        #[arg(long)]
        set: Option<Theme>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => cconv::cli::setup::setup(),
        Some(cmd) => cconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
