//! Baseball Savant bat-tracking leaderboard client.
//!
//! Downloads the leaderboard as CSV and hands back the raw header and rows.
//! Column interpretation is left to the `power_plus` crate so the schema
//! heuristics can be tested without HTTP.

use async_trait::async_trait;
use common::config::SourceConfig;
use common::{FetchError, RawTable};
use std::time::Duration;
use tracing::debug;

/// Anything that can produce the raw leaderboard for a season.
///
/// The refresh orchestrator depends on this rather than on [`SavantClient`]
/// directly.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, season: u16) -> Result<RawTable, FetchError>;
}

/// Leaderboard client with connection pooling and a bounded request timeout.
#[derive(Debug, Clone)]
pub struct SavantClient {
    client: reqwest::Client,
    url: String,
    min_swings: u32,
    timeout: Duration,
}

impl SavantClient {
    pub fn new(config: &SourceConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .user_agent("power-plus-server/0.1")
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()
            .expect("failed to build Savant HTTP client");

        Self {
            client,
            url: config.url.clone(),
            min_swings: config.min_swings,
            timeout,
        }
    }

    /// Upper bound on a single fetch.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the batter leaderboard for `season`.
    pub async fn fetch_leaderboard(&self, season: u16) -> Result<RawTable, FetchError> {
        debug!("Fetching bat-tracking leaderboard: {} (season {})", self.url, season);

        let resp = self
            .client
            .get(&self.url)
            .query(&[
                ("year", season.to_string()),
                ("type", "batter".to_string()),
                ("minSwings", self.min_swings.to_string()),
                ("csv", "true".to_string()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("request to {} failed: {}", self.url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = resp.text().await.map_err(|e| {
            FetchError::Network(format!("reading body from {} failed: {}", self.url, e))
        })?;

        let table = parse_csv(&body)?;
        debug!(
            "Got {} leaderboard rows across {} columns",
            table.rows.len(),
            table.columns.len()
        );

        Ok(table)
    }
}

#[async_trait]
impl SourceFetcher for SavantClient {
    async fn fetch(&self, season: u16) -> Result<RawTable, FetchError> {
        self.fetch_leaderboard(season).await
    }
}

/// Parse a CSV payload into a [`RawTable`].
///
/// A payload with no header row, or with a row whose width differs from the
/// header, is rejected.
pub fn parse_csv(text: &str) -> Result<RawTable, FetchError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| FetchError::ParseFailure(format!("bad header row: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
        return Err(FetchError::ParseFailure("missing header row".into()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| FetchError::ParseFailure(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE: &str = "\u{feff}id,name,swings_competitive,avg_bat_speed,swing_length\n\
                          665742,\"Soto, Juan\",412,75.1,7.6\n\
                          592450,\"Judge, Aaron\",398,76.9,8.1\n";

    fn config_for(server: &MockServer, timeout_secs: u64) -> SourceConfig {
        SourceConfig {
            url: format!("{}/leaderboard/bat-tracking", server.uri()),
            timeout_secs,
            ..SourceConfig::default()
        }
    }

    #[test]
    fn test_parse_csv_strips_bom_and_keeps_order() {
        let table = parse_csv(SAMPLE).expect("sample should parse");

        assert_eq!(
            table.columns,
            vec!["id", "name", "swings_competitive", "avg_bat_speed", "swing_length"]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "Soto, Juan");
        assert_eq!(table.rows[1][1], "Judge, Aaron");
    }

    #[test]
    fn test_parse_csv_rejects_empty_payload() {
        assert!(matches!(parse_csv(""), Err(FetchError::ParseFailure(_))));
    }

    #[test]
    fn test_parse_csv_rejects_ragged_rows() {
        let ragged = "a,b,c\n1,2,3\n4,5\n";
        assert!(matches!(parse_csv(ragged), Err(FetchError::ParseFailure(_))));
    }

    #[tokio::test]
    async fn test_fetch_sends_leaderboard_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("year", "2024"))
            .and(query_param("type", "batter"))
            .and(query_param("minSwings", "1"))
            .and(query_param("csv", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
            .expect(1)
            .mount(&server)
            .await;

        let client = SavantClient::new(&config_for(&server, 5));
        let table = client.fetch(2024).await.expect("fetch should succeed");

        assert_eq!(table.rows.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_maps_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = SavantClient::new(&config_for(&server, 5));
        let err = client.fetch(2025).await.unwrap_err();

        assert!(matches!(err, FetchError::BadStatus(503)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_fetch_non_csv_body_is_parse_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>\n<b>a,b</b>\n"))
            .mount(&server)
            .await;

        let client = SavantClient::new(&config_for(&server, 5));
        let err = client.fetch(2025).await.unwrap_err();

        assert!(matches!(err, FetchError::ParseFailure(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_fetch_times_out_as_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(SAMPLE)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = SavantClient::new(&config_for(&server, 1));
        let err = client.fetch(2025).await.unwrap_err();

        assert!(matches!(err, FetchError::Network(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_network_error() {
        let config = SourceConfig {
            url: "http://127.0.0.1:9/leaderboard".into(),
            timeout_secs: 2,
            ..SourceConfig::default()
        };
        let client = SavantClient::new(&config);

        let err = client.fetch(2025).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "got {:?}", err);
    }
}
