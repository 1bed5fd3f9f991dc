//! Latest rate snapshot per bank

use crate::bank::Bank;
use crate::rates::RateTable;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

#[derive(Debug, Default)]
struct Snapshot {
    tables: HashMap<Bank, Arc<RateTable>>,
    fetched_at: Option<DateTime<Utc>>,
}

/// Holds the most recent `RateTable` for each bank. Tables are only ever
/// swapped in whole, either one bank at a time or wholesale from a feed
/// response; readers never observe a partially applied table.
#[derive(Debug, Default)]
pub struct RateRepository {
    inner: RwLock<Snapshot>,
}

impl RateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current table for the bank, or `None` when the feed has never
    /// delivered one (or omitted the bank in its last response).
    pub fn get(&self, bank: Bank) -> Option<Arc<RateTable>> {
        let snapshot = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        snapshot.tables.get(&bank).cloned()
    }

    /// Replaces the table for one bank. No merge: the previous table is gone.
    pub fn replace(&self, bank: Bank, table: RateTable) {
        let mut snapshot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        debug!(%bank, tickers = table.len(), "Replacing rate table");
        snapshot.tables.insert(bank, Arc::new(table));
        snapshot.fetched_at = Some(Utc::now());
    }

    /// Applies one feed response across all banks at once. Banks paired with
    /// `None` end up absent, matching a feed that omitted them.
    pub fn replace_all<I>(&self, tables: I)
    where
        I: IntoIterator<Item = (Bank, Option<RateTable>)>,
    {
        let mut next = HashMap::new();
        for (bank, table) in tables {
            if let Some(table) = table {
                debug!(%bank, tickers = table.len(), "Loaded rate table");
                next.insert(bank, Arc::new(table));
            } else {
                debug!(%bank, "No rates in this snapshot");
            }
        }

        let mut snapshot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        snapshot.tables = next;
        snapshot.fetched_at = Some(Utc::now());
    }

    /// When the last successful feed response was applied, if ever.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        let snapshot = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        snapshot.fetched_at
    }
}
