pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::AppContext;
use crate::core::config::AppConfig;
use crate::core::prefs::Theme;
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
        swap: bool,
        json: bool,
    },
    Currencies,
    History {
        clear: bool,
        replay: Option<usize>,
    },
    Stats {
        reset: bool,
    },
    Favorites {
        amount: String,
    },
    Theme {
        toggle: bool,
        set: Option<Theme>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let ctx = AppContext::from_config(config).await?;

    match command {
        AppCommand::Convert {
            amount,
            from,
            to,
            swap,
            json,
        } => cli::convert::run(&ctx, &amount, from.as_deref(), to.as_deref(), swap, json).await,
        AppCommand::Currencies => cli::currencies::run(&ctx).await,
        AppCommand::History { clear, replay } => cli::history::run(&ctx, clear, replay).await,
        AppCommand::Stats { reset } => cli::stats::run(&ctx, reset).await,
        AppCommand::Favorites { amount } => cli::favorites::run(&ctx, &amount).await,
        AppCommand::Theme { toggle, set } => cli::theme::run(&ctx, toggle, set).await,
    }
}
