//! Sports List Tool
//!
//! Lists the sport keys the odds provider accepts.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema};

use crate::model::Sport;
use crate::odds::OddsClient;
use crate::ToolKind;

/// Sports shown per group
const PER_GROUP: usize = 10;

pub struct SportsListTool {
    odds: Arc<dyn OddsClient>,
}

impl SportsListTool {
    pub fn new(odds: Arc<dyn OddsClient>) -> Self {
        Self { odds }
    }
}

#[async_trait]
impl Tool for SportsListTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: ToolKind::ListAvailableSports.name().into(),
            description: "List all available sports with their keys for get_sports_odds.".into(),
            parameters: vec![],
        }
    }

    async fn execute(&self, _call: &ToolCall) -> CoreResult<ToolResult> {
        let name = ToolKind::ListAvailableSports.name();
        match self.odds.sports().await {
            Ok(listing) => Ok(ToolResult::success(name, render_sports(&listing.sports))),
            Err(e) => Ok(super::upstream_failure(name, &e)),
        }
    }
}

fn render_sports(sports: &[Sport]) -> String {
    let (soccer, other): (Vec<&Sport>, Vec<&Sport>) = sports.iter().partition(|s| s.is_soccer());
    let mut out = String::from("🏆 **Available sports:**\n\n");

    render_group(&mut out, "⚽ **Football/Soccer:**", &soccer);
    render_group(&mut out, "🏈 **Other sports:**", &other);

    let _ = write!(out, "📊 Total: {} sports available", sports.len());
    out
}

fn render_group(out: &mut String, title: &str, items: &[&Sport]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title}");
    for sport in items.iter().take(PER_GROUP) {
        let _ = writeln!(out, "- {} (`{}`)", sport.title, sport.key);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::TheOddsApiClient;
    use mockito::Matcher;

    fn sport(key: &str, title: &str) -> Sport {
        Sport {
            key: key.into(),
            title: title.into(),
            group: String::new(),
            description: String::new(),
            active: true,
        }
    }

    #[test]
    fn groups_soccer_first_and_caps_each_group() {
        let mut sports: Vec<Sport> = (0..12)
            .map(|i| sport(&format!("soccer_league_{i}"), &format!("League {i}")))
            .collect();
        sports.push(sport("basketball_nba", "NBA"));

        let out = render_sports(&sports);
        let soccer_at = out.find("⚽").unwrap();
        let other_at = out.find("🏈").unwrap();
        assert!(soccer_at < other_at);
        assert!(out.contains("- League 9 (`soccer_league_9`)"));
        assert!(!out.contains("League 10"));
        assert!(out.contains("- NBA (`basketball_nba`)"));
        assert!(out.ends_with("📊 Total: 13 sports available"));
    }

    #[test]
    fn empty_groups_are_omitted() {
        let out = render_sports(&[sport("tennis_atp", "ATP")]);
        assert!(!out.contains("⚽"));
        assert!(out.contains("🏈"));
    }

    #[tokio::test]
    async fn lists_from_provider() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sports")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"key": "soccer_epl", "title": "EPL"}]"#)
            .create_async()
            .await;

        let client = TheOddsApiClient::new(reqwest::Client::new(), server.url(), "k");
        let result = SportsListTool::new(Arc::new(client))
            .execute(&ToolCall::new("list_available_sports"))
            .await
            .unwrap();

        assert!(result.succeeded);
        assert!(result.output.contains("- EPL (`soccer_epl`)"));
    }
}
