use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use pmr_converter::bank::Bank;
use pmr_converter::log::init_logging;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display a bank's buy/sell rate table
    Rates {
        /// Bank to show rates for (PRB, SBER or AGRO)
        bank: Option<String>,
    },
    /// Convert an amount between two currencies
    Convert {
        /// Amount of the sell currency
        amount: f64,
        /// Ticker to sell (e.g. RUP)
        sell: String,
        /// Ticker to receive (e.g. USD)
        receive: String,
        /// Bank whose rates to use (PRB, SBER or AGRO)
        bank: Option<String>,
    },
}

fn parse_bank(bank: Option<String>) -> Result<Option<Bank>> {
    bank.as_deref().map(str::parse).transpose()
}

impl Commands {
    fn into_app_command(self) -> Result<pmr_converter::AppCommand> {
        Ok(match self {
            Commands::Rates { bank } => pmr_converter::AppCommand::Rates {
                bank: parse_bank(bank)?,
            },
            Commands::Convert {
                amount,
                sell,
                receive,
                bank,
            } => pmr_converter::AppCommand::Convert {
                amount,
                sell,
                receive,
                bank: parse_bank(bank)?,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => {
            pmr_converter::run_command(cmd.into_app_command()?, cli.config_path.as_deref()).await
        }
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

fn setup() -> Result<()> {
    use anyhow::Context;

    let path = pmr_converter::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
feed:
  base_url: "https://server-converter-kiav.onrender.com/"

default_bank: PRB
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
