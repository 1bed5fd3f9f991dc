//! Converter session: selection plus amount, with the result derived on read

use crate::engine::{ConversionEngine, ConversionRequest, ConvertError};
use crate::repository::RateRepository;
use crate::selection::PairSelection;
use crate::{bank::Bank, rates::Rate};
use std::sync::Arc;

/// One user's converter state. The converted amount is never stored; it is
/// recomputed from the current selection, amount, and repository snapshot on
/// every read, so it cannot go stale when any of those change.
pub struct ConverterSession {
    repository: Arc<RateRepository>,
    engine: ConversionEngine,
    selection: PairSelection,
    sell_amount: f64,
}

impl ConverterSession {
    pub fn new(repository: Arc<RateRepository>) -> Self {
        Self {
            engine: ConversionEngine::new(Arc::clone(&repository)),
            repository,
            selection: PairSelection::new(),
            sell_amount: 0.0,
        }
    }

    pub fn selection(&self) -> &PairSelection {
        &self.selection
    }

    pub fn sell_amount(&self) -> f64 {
        self.sell_amount
    }

    pub fn set_sell_amount(&mut self, amount: f64) {
        // Malformed input is worth nothing, same as the engine would decide.
        self.sell_amount = if amount.is_finite() && amount > 0.0 {
            amount
        } else {
            0.0
        };
    }

    pub fn select_sell(&mut self, ticker: &str) {
        self.selection.select_sell(ticker);
    }

    pub fn select_receive(&mut self, ticker: &str) {
        self.selection.select_receive(ticker);
    }

    pub fn swap(&mut self) {
        self.selection.swap();
    }

    pub fn select_bank(&mut self, bank: Bank) {
        self.selection.select_bank(bank);
    }

    fn request(&self) -> ConversionRequest {
        ConversionRequest {
            bank: self.selection.bank(),
            sell_currency: self.selection.sell_currency().to_string(),
            receive_currency: self.selection.receive_currency().to_string(),
            sell_amount: self.sell_amount,
        }
    }

    /// Display value: diagnostics are logged and collapse to zero.
    pub fn converted_amount(&self) -> f64 {
        self.engine.convert(&self.request())
    }

    /// Same derivation with the failure surfaced, for callers that want to
    /// tell "no rates" apart from a genuine zero.
    pub fn try_converted_amount(&self) -> Result<f64, ConvertError> {
        self.engine.try_convert(&self.request())
    }

    /// The selected bank's rates as last fetched, for display.
    pub fn rates(&self) -> Vec<Rate> {
        self.repository
            .get(self.selection.bank())
            .map(|table| table.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{RateTable, rate};

    fn session_with_rates() -> ConverterSession {
        let repository = Arc::new(RateRepository::new());
        repository.replace(
            Bank::Prb,
            RateTable::from_rates(vec![rate("USD", 18.5, 19.0), rate("EUR", 20.0, 20.5)]).unwrap(),
        );
        ConverterSession::new(repository)
    }

    #[test]
    fn test_result_tracks_amount_changes() {
        let mut session = session_with_rates();
        assert_eq!(session.converted_amount(), 0.0);

        session.set_sell_amount(185.0);
        assert_eq!(session.converted_amount(), 10.0);
    }

    #[test]
    fn test_result_tracks_selection_changes() {
        let mut session = session_with_rates();
        session.set_sell_amount(10.0);
        session.swap(); // USD -> RUP
        assert_eq!(session.converted_amount(), 190.0);

        session.select_receive("EUR"); // forces sell back to RUP
        assert_eq!(session.selection().sell_currency(), "RUP");
        assert_eq!(session.converted_amount(), 0.5);
    }

    #[test]
    fn test_result_tracks_repository_updates() {
        let repository = Arc::new(RateRepository::new());
        let mut session = ConverterSession::new(Arc::clone(&repository));
        session.set_sell_amount(185.0);

        assert_eq!(session.converted_amount(), 0.0);
        assert_eq!(
            session.try_converted_amount(),
            Err(ConvertError::RatesUnavailable(Bank::Prb))
        );

        repository.replace(
            Bank::Prb,
            RateTable::from_rates(vec![rate("USD", 18.5, 19.0)]).unwrap(),
        );
        assert_eq!(session.converted_amount(), 10.0);
    }

    #[test]
    fn test_bank_switch_can_strand_selection() {
        let mut session = session_with_rates();
        session.set_sell_amount(185.0);
        assert_eq!(session.converted_amount(), 10.0);

        session.select_bank(Bank::Agro);
        assert_eq!(
            session.try_converted_amount(),
            Err(ConvertError::RatesUnavailable(Bank::Agro))
        );
        assert_eq!(session.converted_amount(), 0.0);
        assert!(session.rates().is_empty());
    }

    #[test]
    fn test_malformed_amount_is_normalized() {
        let mut session = session_with_rates();
        session.set_sell_amount(f64::NAN);
        assert_eq!(session.sell_amount(), 0.0);
        session.set_sell_amount(-3.0);
        assert_eq!(session.sell_amount(), 0.0);
    }
}
