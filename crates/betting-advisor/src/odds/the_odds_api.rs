//! The Odds API (v4) client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::AdvisorConfig;
use crate::error::{AdvisorError, Result};
use crate::model::{OddsEvent, Sport, SportsListing};

use super::OddsClient;

const REMAINING_HEADER: &str = "x-requests-remaining";

pub struct TheOddsApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TheOddsApiClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Client from config; `None` when `ODDS_API_KEY` is absent
    pub fn from_config(config: &AdvisorConfig) -> Result<Option<Self>> {
        let Some(key) = config.odds_api_key.as_deref() else {
            return Ok(None);
        };
        Ok(Some(Self::new(config.http_client()?, &config.odds_base_url, key)))
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<reqwest::Response> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "Odds API request");

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Odds API error");
        Err(AdvisorError::from_status(status.as_u16(), body))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| AdvisorError::Decode(e.to_string()))
}

/// Sport keys are path segments; keep them to `[a-z0-9_]`
fn check_sport_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AdvisorError::InvalidSportKey(key.to_string()))
    }
}

#[async_trait]
impl OddsClient for TheOddsApiClient {
    async fn sports(&self) -> Result<SportsListing> {
        let response = self.get("/sports", &[]).await?;
        let requests_remaining = response
            .headers()
            .get(REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let sports: Vec<Sport> = decode(response).await?;
        Ok(SportsListing {
            sports,
            requests_remaining,
        })
    }

    async fn odds(&self, sport_key: &str, regions: &str, markets: &str) -> Result<Vec<OddsEvent>> {
        check_sport_key(sport_key)?;

        let path = format!("/sports/{sport_key}/odds");
        let response = self
            .get(
                &path,
                &[
                    ("regions", regions),
                    ("markets", markets),
                    ("oddsFormat", "decimal"),
                    ("dateFormat", "iso"),
                ],
            )
            .await?;

        decode(response).await
    }

    fn name(&self) -> &str {
        "the-odds-api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::Server) -> TheOddsApiClient {
        TheOddsApiClient::new(reqwest::Client::new(), server.url(), "test-key")
    }

    #[tokio::test]
    async fn sports_reads_quota_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sports")
            .match_query(Matcher::UrlEncoded("apiKey".into(), "test-key".into()))
            .with_status(200)
            .with_header("x-requests-remaining", "487")
            .with_body(r#"[{"key": "soccer_epl", "title": "EPL", "group": "Soccer", "active": true}]"#)
            .create_async()
            .await;

        let listing = client(&server).sports().await.unwrap();
        mock.assert_async().await;

        assert_eq!(listing.sports.len(), 1);
        assert_eq!(listing.requests_remaining.as_deref(), Some("487"));
    }

    #[tokio::test]
    async fn odds_sends_decimal_format() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sports/soccer_epl/odds")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("apiKey".into(), "test-key".into()),
                Matcher::UrlEncoded("regions".into(), "eu".into()),
                Matcher::UrlEncoded("markets".into(), "h2h".into()),
                Matcher::UrlEncoded("oddsFormat".into(), "decimal".into()),
                Matcher::UrlEncoded("dateFormat".into(), "iso".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let events = client(&server).odds("soccer_epl", "eu", "h2h").await.unwrap();
        mock.assert_async().await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_maps_to_distinct_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sports")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message": "API key is not valid"}"#)
            .create_async()
            .await;

        let err = client(&server).sports().await.unwrap_err();
        assert!(matches!(err, AdvisorError::Unauthorized));
    }

    #[tokio::test]
    async fn invalid_sport_key_never_reaches_network() {
        let server = mockito::Server::new_async().await;
        let err = client(&server).odds("../admin", "eu", "h2h").await.unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidSportKey(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sports")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client(&server).sports().await.unwrap_err();
        assert!(matches!(err, AdvisorError::Decode(_)));
    }
}
