//! Web search via SerpAPI.
//!
//! Only one text snippet is returned per query, picked from the richest
//! section of the result page that is present.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::AdvisorConfig;
use crate::error::{AdvisorError, Result};

pub const NO_RESULT: &str = "No good search result found";

/// Maximum organic snippets joined when nothing better is present
const ORGANIC_SNIPPETS: usize = 3;

#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Best text answer for `query`
    async fn search(&self, query: &str) -> Result<String>;
}

pub struct SerpApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SerpApiClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Client from config; `None` when `SERPAPI_KEY` is absent
    pub fn from_config(config: &AdvisorConfig) -> Result<Option<Self>> {
        let Some(key) = config.serpapi_key.as_deref() else {
            return Ok(None);
        };
        Ok(Some(Self::new(config.http_client()?, &config.serpapi_base_url, key)))
    }
}

#[async_trait]
impl SearchClient for SerpApiClient {
    async fn search(&self, query: &str) -> Result<String> {
        let url = format!("{}/search.json", self.base_url);
        tracing::debug!(%query, "SerpAPI search");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("engine", "google"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::from_status(status.as_u16(), body));
        }

        let bytes = response.bytes().await?;
        let page: Value =
            serde_json::from_slice(&bytes).map_err(|e| AdvisorError::Decode(e.to_string()))?;

        Ok(best_snippet(&page).unwrap_or_else(|| NO_RESULT.to_string()))
    }
}

fn text_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Pick the answer text from a SerpAPI result page
pub(crate) fn best_snippet(page: &Value) -> Option<String> {
    let direct = text_at(page, "/answer_box/answer")
        .or_else(|| text_at(page, "/answer_box/snippet"))
        .map(str::to_string);
    if direct.is_some() {
        return direct;
    }

    if let Some(spotlight) = page.pointer("/sports_results/game_spotlight") {
        if let Some(text) = spotlight_text(spotlight) {
            return Some(text);
        }
    }

    if let Some(description) = text_at(page, "/knowledge_graph/description") {
        return Some(description.to_string());
    }

    let snippets: Vec<&str> = page
        .get("organic_results")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|r| text_at(r, "/snippet"))
        .take(ORGANIC_SNIPPETS)
        .collect();

    (!snippets.is_empty()).then(|| snippets.join("\n"))
}

/// Scores arrive as strings or numbers depending on the sport
fn score_text(score: &Value) -> Option<String> {
    match score {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn spotlight_text(spotlight: &Value) -> Option<String> {
    let teams: Vec<String> = spotlight
        .get("teams")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|team| {
            let name = text_at(team, "/name")?;
            Some(match team.get("score").and_then(score_text) {
                Some(score) => format!("{name} {score}"),
                None => name.to_string(),
            })
        })
        .collect();

    let mut parts = Vec::new();
    if let Some(league) = text_at(spotlight, "/league") {
        parts.push(league.to_string());
    }
    if !teams.is_empty() {
        parts.push(teams.join(" - "));
    }
    if let Some(status) = text_at(spotlight, "/status").or_else(|| text_at(spotlight, "/date")) {
        parts.push(status.to_string());
    }

    (!parts.is_empty()).then(|| parts.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn answer_box_wins() {
        let page = json!({
            "answer_box": {"answer": "Arsenal won 2-1"},
            "knowledge_graph": {"description": "Football club"},
            "organic_results": [{"snippet": "ignored"}]
        });
        assert_eq!(best_snippet(&page).as_deref(), Some("Arsenal won 2-1"));
    }

    #[test]
    fn spotlight_renders_teams_and_scores() {
        let page = json!({
            "sports_results": {"game_spotlight": {
                "league": "Premier League",
                "status": "FT",
                "teams": [{"name": "Arsenal", "score": "2"}, {"name": "Chelsea", "score": 1}]
            }}
        });
        assert_eq!(
            best_snippet(&page).as_deref(),
            Some("Premier League | Arsenal 2 - Chelsea 1 | FT")
        );
    }

    #[test]
    fn organic_snippets_are_joined() {
        let page = json!({
            "organic_results": [{"snippet": "one"}, {"title": "no snippet"}, {"snippet": "two"}]
        });
        assert_eq!(best_snippet(&page).as_deref(), Some("one\ntwo"));
    }

    #[test]
    fn empty_page_has_no_snippet() {
        assert!(best_snippet(&json!({})).is_none());
    }

    #[tokio::test]
    async fn search_falls_back_to_no_result() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "arsenal injuries".into()),
                Matcher::UrlEncoded("api_key".into(), "serp-key".into()),
                Matcher::UrlEncoded("engine".into(), "google".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"search_metadata": {"status": "Success"}}"#)
            .create_async()
            .await;

        let client = SerpApiClient::new(reqwest::Client::new(), server.url(), "serp-key");
        let text = client.search("arsenal injuries").await.unwrap();
        mock.assert_async().await;
        assert_eq!(text, NO_RESULT);
    }

    #[tokio::test]
    async fn search_quota_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search.json")
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let client = SerpApiClient::new(reqwest::Client::new(), server.url(), "serp-key");
        let err = client.search("x").await.unwrap_err();
        assert!(matches!(err, AdvisorError::QuotaExceeded));
    }
}
