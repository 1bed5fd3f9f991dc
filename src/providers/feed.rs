//! HTTP rate feed client

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::bank::Bank;
use crate::rates::{Rate, RateTable};
use crate::repository::RateRepository;

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch(&self) -> Result<FeedSnapshot>;
}

/// One feed response. A missing key means the feed had no data for that bank
/// in this snapshot, which is not the same as an empty list.
#[derive(Debug, Default, Deserialize)]
pub struct FeedSnapshot {
    pub prb: Option<Vec<Rate>>,
    pub sber: Option<Vec<Rate>>,
    pub agro: Option<Vec<Rate>>,
}

impl FeedSnapshot {
    pub fn has_any(&self) -> bool {
        self.prb.is_some() || self.sber.is_some() || self.agro.is_some()
    }

    /// Pairs every bank with its table (or `None`), ready for a wholesale
    /// repository replace. Unusable or empty rate lists collapse to `None`.
    pub fn into_tables(self) -> [(Bank, Option<RateTable>); 3] {
        [
            (Bank::Prb, self.prb.and_then(RateTable::from_rates)),
            (Bank::Sber, self.sber.and_then(RateTable::from_rates)),
            (Bank::Agro, self.agro.and_then(RateTable::from_rates)),
        ]
    }
}

// HttpRateSource implementation for RateSource
pub struct HttpRateSource {
    base_url: String,
}

impl HttpRateSource {
    pub fn new(base_url: &str) -> Self {
        HttpRateSource {
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    #[instrument(name = "RateFeedFetch", skip(self))]
    async fn fetch(&self) -> Result<FeedSnapshot> {
        debug!("Requesting rate snapshot from {}", self.base_url);

        let client = reqwest::Client::builder()
            .user_agent("pmr-converter/0.1")
            .build()?;
        let response = client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, self.base_url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} from rate feed", response.status()));
        }

        let text = response.text().await?;
        let snapshot: FeedSnapshot = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse rate feed response: {}", e))?;

        Ok(snapshot)
    }
}

/// Fetches one snapshot and applies it wholesale. A failed fetch or a
/// response with no recognized bank keys is reported and leaves the
/// repository exactly as it was; stale rates beat no rates.
pub async fn refresh_rates(source: &dyn RateSource, repository: &RateRepository) -> Result<()> {
    let snapshot = match source.fetch().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Rate feed fetch failed: {e}");
            return Err(e);
        }
    };

    if !snapshot.has_any() {
        error!("Rate feed response contained no bank data");
        return Err(anyhow!("Rate feed response contained no bank data"));
    }

    repository.replace_all(snapshot.into_tables());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_feed(mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    const FULL_RESPONSE: &str = r#"{
        "prb": [
            { "ticker": "USD", "buy": 18.5, "sell": 19.0 },
            { "ticker": "EUR", "buy": 20.0, "sell": 20.5 }
        ],
        "agro": [
            { "ticker": "USD", "buy": 18.4, "sell": 19.1 }
        ]
    }"#;

    #[tokio::test]
    async fn test_successful_snapshot_fetch() {
        let mock_server = create_mock_feed(FULL_RESPONSE).await;

        let source = HttpRateSource::new(&mock_server.uri());
        let snapshot = source.fetch().await.unwrap();

        assert!(snapshot.has_any());
        assert_eq!(snapshot.prb.as_ref().unwrap().len(), 2);
        assert!(snapshot.sber.is_none());
        assert_eq!(snapshot.agro.as_ref().unwrap()[0].buy, 18.4);
    }

    #[tokio::test]
    async fn test_feed_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let source = HttpRateSource::new(&mock_server.uri());
        let result = source.fetch().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error from rate feed"
        );
    }

    #[tokio::test]
    async fn test_feed_malformed_body() {
        let mock_server = create_mock_feed("not json").await;

        let source = HttpRateSource::new(&mock_server.uri());
        let result = source.fetch().await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse rate feed response")
        );
    }

    #[tokio::test]
    async fn test_refresh_applies_snapshot_wholesale() {
        let mock_server = create_mock_feed(FULL_RESPONSE).await;
        let source = HttpRateSource::new(&mock_server.uri());
        let repository = RateRepository::new();

        refresh_rates(&source, &repository).await.unwrap();

        assert!(repository.get(Bank::Prb).is_some());
        assert!(repository.get(Bank::Sber).is_none());
        assert_eq!(repository.get(Bank::Agro).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_without_bank_keys_leaves_repository_alone() {
        let mock_server = create_mock_feed(r#"{ "status": "ok" }"#).await;
        let source = HttpRateSource::new(&mock_server.uri());

        let repository = RateRepository::new();
        repository.replace(
            Bank::Prb,
            RateTable::from_rates(vec![crate::rates::rate("USD", 18.5, 19.0)]).unwrap(),
        );

        let result = refresh_rates(&source, &repository).await;
        assert!(result.is_err());
        assert!(repository.get(Bank::Prb).is_some());
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_repository_alone() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let source = HttpRateSource::new(&mock_server.uri());
        let repository = RateRepository::new();
        repository.replace(
            Bank::Agro,
            RateTable::from_rates(vec![crate::rates::rate("EUR", 20.0, 20.5)]).unwrap(),
        );

        assert!(refresh_rates(&source, &repository).await.is_err());
        assert!(repository.get(Bank::Agro).is_some());
    }

    #[tokio::test]
    async fn test_empty_rate_list_maps_to_absent() {
        let mock_server = create_mock_feed(r#"{ "prb": [], "sber": [{ "ticker": "USD", "buy": 18.5, "sell": 19.0 }] }"#).await;
        let source = HttpRateSource::new(&mock_server.uri());
        let repository = RateRepository::new();

        refresh_rates(&source, &repository).await.unwrap();

        assert!(repository.get(Bank::Prb).is_none());
        assert!(repository.get(Bank::Sber).is_some());
    }
}
