//! smart-complete - autocomplete for single-line terminal inputs.

use smart_complete::autocomplete::AutocompleteField;
use smart_complete::cli::Cli;
use smart_complete::config::Config;
use smart_complete::error::Result;
use smart_complete::logging;
use smart_complete::tui::{self, App};
use tracing::{error, info};

/// Field name used when no profile is selected.
const DEFAULT_FIELD: &str = "input";

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // Interactive mode owns the terminal, so its logs go to a file
    if cli.is_headless() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    match run(&cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> Result<i32> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let overrides = cli.resolve_overrides(&config)?;
    let name = cli.field.as_deref().unwrap_or(DEFAULT_FIELD);
    let field = AutocompleteField::attach(name, overrides);
    let app = App::new(field);

    if cli.is_headless() {
        return tui::headless::run_headless(cli, app).await;
    }

    tui::run(app).await?;
    Ok(0)
}
