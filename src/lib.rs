pub mod bank;
pub mod config;
pub mod engine;
pub mod log;
pub mod providers;
pub mod rates;
pub mod repository;
pub mod selection;
pub mod session;

use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use std::sync::Arc;
use tracing::info;

use crate::bank::Bank;
use crate::engine::{ConversionEngine, ConversionRequest};
use crate::providers::{HttpRateSource, refresh_rates};
use crate::repository::RateRepository;
use crate::session::ConverterSession;

pub enum AppCommand {
    /// Print the bank's current rate table.
    Rates { bank: Option<Bank> },
    /// Convert an amount between two tickers at the bank's rates.
    Convert {
        amount: f64,
        sell: String,
        receive: String,
        bank: Option<Bank>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };

    let repository = Arc::new(RateRepository::new());
    let source = HttpRateSource::new(&config.feed.base_url);
    refresh_rates(&source, &repository).await?;
    info!("Rates loaded from {}", config.feed.base_url);

    match command {
        AppCommand::Rates { bank } => {
            let mut session = ConverterSession::new(Arc::clone(&repository));
            session.select_bank(bank.unwrap_or(config.default_bank));
            print_rates(&session);
        }
        // The pair comes straight from the arguments, so this bypasses the
        // selector and hands the engine whatever pair was asked for,
        // cross-currency included.
        AppCommand::Convert {
            amount,
            sell,
            receive,
            bank,
        } => {
            let engine = ConversionEngine::new(Arc::clone(&repository));
            let request = ConversionRequest {
                bank: bank.unwrap_or(config.default_bank),
                sell_currency: sell.to_uppercase(),
                receive_currency: receive.to_uppercase(),
                sell_amount: amount,
            };

            let result = engine.convert(&request);
            println!(
                "{} {} -> {:.4} {} ({})",
                request.sell_amount,
                request.sell_currency,
                result,
                request.receive_currency,
                request.bank,
            );
        }
    }

    Ok(())
}

fn print_rates(session: &ConverterSession) {
    let bank = session.selection().bank();
    let rates = session.rates();
    if rates.is_empty() {
        println!("No rates available for {bank}");
        println!(
            "Offered tickers: {}",
            session.selection().available_tickers().join(", ")
        );
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Ticker", "Buy", "Sell"]);

    for rate in rates {
        table.add_row(vec![
            Cell::new(&rate.ticker),
            Cell::new(format!("{:.2}", rate.buy)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", rate.sell)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{bank} exchange rates");
    println!("{table}");
}
