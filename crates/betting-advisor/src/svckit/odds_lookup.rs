//! Odds Lookup Tool
//!
//! Fetches upcoming events and bookmaker prices for one sport.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::SecondsFormat;

use agent_core::{ParameterSchema, Result as CoreResult, Status, Tool, ToolCall, ToolResult, ToolSchema};

use crate::model::OddsEvent;
use crate::odds::OddsClient;
use crate::ToolKind;

/// Events shown per lookup
const MAX_EVENTS: usize = 5;

pub struct OddsLookupTool {
    odds: Arc<dyn OddsClient>,
    regions: String,
    markets: String,
}

impl OddsLookupTool {
    pub fn new(odds: Arc<dyn OddsClient>, regions: impl Into<String>, markets: impl Into<String>) -> Self {
        Self {
            odds,
            regions: regions.into(),
            markets: markets.into(),
        }
    }
}

#[async_trait]
impl Tool for OddsLookupTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: ToolKind::GetSportsOdds.name().into(),
            description: "Get current betting odds for a sport. Use keys like 'soccer_epl', 'soccer_france_ligue_one', 'basketball_nba'.".into(),
            parameters: vec![
                ParameterSchema::string("sport_key", "Sport key from list_available_sports (e.g., 'soccer_epl')"),
                ParameterSchema::string("regions", "Bookmaker regions (e.g., 'eu', 'uk', 'us')")
                    .optional(self.regions.clone()),
                ParameterSchema::string("markets", "Markets to fetch (e.g., 'h2h', 'totals')")
                    .optional(self.markets.clone()),
            ],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let name = ToolKind::GetSportsOdds.name();
        let sport_key = call.str_arg("sport_key").unwrap_or_default().trim();
        let regions = call.str_arg("regions").unwrap_or(self.regions.as_str());
        let markets = call.str_arg("markets").unwrap_or(self.markets.as_str());

        tracing::info!(tool = name, sport_key, regions, markets, "Fetching odds");

        match self.odds.odds(sport_key, regions, markets).await {
            Ok(events) if events.is_empty() => Ok(ToolResult::success(
                name,
                Status::Warning.line(format!("No odds found for sport: {sport_key}")),
            )),
            Ok(events) => Ok(ToolResult::success(name, render_odds(sport_key, &events))),
            Err(e) => Ok(super::upstream_failure(name, &e)),
        }
    }
}

fn render_odds(sport_key: &str, events: &[OddsEvent]) -> String {
    let mut out = format!("🏆 **Odds for {}**\n\n", sport_key.to_uppercase());

    for event in events.iter().take(MAX_EVENTS) {
        let _ = writeln!(out, "**{} vs {}**", event.home_team, event.away_team);
        let _ = writeln!(
            out,
            "📅 Date: {}",
            event.commence_time.to_rfc3339_opts(SecondsFormat::Secs, true)
        );

        if let Some((bookmaker, market)) = event.headline_market() {
            let _ = writeln!(out, "💰 Odds ({}):", bookmaker.title);
            for outcome in &market.outcomes {
                match outcome.point {
                    Some(point) => {
                        let _ = writeln!(out, "  - {} ({point}): {}", outcome.name, outcome.price);
                    }
                    None => {
                        let _ = writeln!(out, "  - {}: {}", outcome.name, outcome.price);
                    }
                }
            }
        }
        out.push_str("\n---\n\n");
    }

    out
}
