//! # betting-advisor
//!
//! Sports-betting assistant tools for the agent loop: live bookmaker odds,
//! web search for team news, and a network diagnostic.
//!
//! ## Tool availability
//!
//! ```text
//! ┌──────────────────────────┬────────────────┐
//! │ tool                     │ credential     │
//! ├──────────────────────────┼────────────────┤
//! │ search                   │ SERPAPI_KEY    │
//! │ test_odds_connection     │ ODDS_API_KEY   │
//! │ get_sports_odds          │ ODDS_API_KEY   │
//! │ list_available_sports    │ ODDS_API_KEY   │
//! │ ping                     │ (none)         │
//! └──────────────────────────┴────────────────┘
//! ```
//!
//! A tool whose credential is absent is never registered.

pub mod config;
pub mod error;
pub mod model;
pub mod odds;
pub mod search;
pub mod svckit;

use std::sync::Arc;

use agent_core::{AgentError, Tool, ToolRegistry};
use serde::Serialize;

pub use config::AdvisorConfig;
pub use error::{AdvisorError, Result};
pub use model::{Bookmaker, Market, OddsEvent, Outcome, Sport, SportsListing};
pub use odds::{OddsClient, TheOddsApiClient};
pub use search::{SearchClient, SerpApiClient};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{
        OddsConnectionTool, OddsLookupTool, PingTool, SportsListTool, WebSearchTool,
    };
}

/// Closed set of tools this advisor can offer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Search,
    TestOddsConnection,
    GetSportsOdds,
    ListAvailableSports,
    Ping,
}

/// Credential a tool depends on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Credential {
    OddsApi,
    SerpApi,
}

impl Credential {
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::OddsApi => "ODDS_API_KEY",
            Self::SerpApi => "SERPAPI_KEY",
        }
    }
}

impl ToolKind {
    /// Registration order
    pub const ALL: [Self; 5] = [
        Self::Search,
        Self::TestOddsConnection,
        Self::GetSportsOdds,
        Self::ListAvailableSports,
        Self::Ping,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::TestOddsConnection => "test_odds_connection",
            Self::GetSportsOdds => "get_sports_odds",
            Self::ListAvailableSports => "list_available_sports",
            Self::Ping => "ping",
        }
    }

    pub const fn credential(self) -> Option<Credential> {
        match self {
            Self::Search => Some(Credential::SerpApi),
            Self::TestOddsConnection | Self::GetSportsOdds | Self::ListAvailableSports => {
                Some(Credential::OddsApi)
            }
            Self::Ping => None,
        }
    }
}

/// What `build_registry` registered and what it left out
#[derive(Clone, Debug, Default, Serialize)]
pub struct SetupReport {
    pub registered: Vec<ToolKind>,
    pub disabled: Vec<DisabledTool>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DisabledTool {
    pub tool: ToolKind,
    pub missing: &'static str,
}

/// Build the registry from configuration
///
/// Fails only on duplicate names or an HTTP client that cannot be built.
pub fn build_registry(config: &AdvisorConfig) -> agent_core::Result<(ToolRegistry, SetupReport)> {
    let to_core = |e: AdvisorError| AgentError::Other(e.to_string());

    let odds: Option<Arc<dyn OddsClient>> = TheOddsApiClient::from_config(config)
        .map_err(to_core)?
        .map(|c| Arc::new(c) as Arc<dyn OddsClient>);
    let search: Option<Arc<dyn SearchClient>> = SerpApiClient::from_config(config)
        .map_err(to_core)?
        .map(|c| Arc::new(c) as Arc<dyn SearchClient>);

    build_registry_with(config, odds, search)
}

/// Build the registry around already-constructed upstream clients
pub fn build_registry_with(
    config: &AdvisorConfig,
    odds: Option<Arc<dyn OddsClient>>,
    search: Option<Arc<dyn SearchClient>>,
) -> agent_core::Result<(ToolRegistry, SetupReport)> {
    let mut registry = ToolRegistry::new();
    let mut report = SetupReport::default();
    let mut warned: Vec<Credential> = Vec::new();

    for kind in ToolKind::ALL {
        let tool: Option<Arc<dyn Tool>> = match kind {
            ToolKind::Search => search
                .clone()
                .map(|s| Arc::new(tools::WebSearchTool::new(s)) as Arc<dyn Tool>),
            ToolKind::TestOddsConnection => odds
                .clone()
                .map(|o| Arc::new(tools::OddsConnectionTool::new(o)) as Arc<dyn Tool>),
            ToolKind::GetSportsOdds => odds.clone().map(|o| {
                Arc::new(tools::OddsLookupTool::new(o, &config.regions, &config.markets))
                    as Arc<dyn Tool>
            }),
            ToolKind::ListAvailableSports => odds
                .clone()
                .map(|o| Arc::new(tools::SportsListTool::new(o)) as Arc<dyn Tool>),
            ToolKind::Ping => Some(Arc::new(tools::PingTool::new(config.ping_timeout)) as Arc<dyn Tool>),
        };

        match (tool, kind.credential()) {
            (Some(tool), _) => {
                registry.register_arc(tool)?;
                report.registered.push(kind);
            }
            (None, Some(credential)) => {
                if !warned.contains(&credential) {
                    warned.push(credential);
                    let err = AgentError::ConfigurationMissing(credential.env_var().into());
                    tracing::warn!(credential = credential.env_var(), error = %err, "Dependent tools disabled");
                }
                report.disabled.push(DisabledTool {
                    tool: kind,
                    missing: credential.env_var(),
                });
            }
            (None, None) => {}
        }
    }

    tracing::info!(
        registered = report.registered.len(),
        disabled = report.disabled.len(),
        "Tool registry built"
    );

    Ok((registry, report))
}

/// System prompt for the betting advisor agent
pub const BETTING_ADVISOR_PROMPT: &str = r#"You are PronosAI, an expert sports-betting analyst.

## Context

You help users analyse sports matches and give well-reasoned predictions.

## Guidelines

1. Use live odds whenever they are available (`get_sports_odds`)
2. Search for recent news about teams and players (`search`)
3. Analyse statistics and trends
4. Give argued predictions, and always remind the user of the risks
5. Be precise and informative

## Tools

- `search`: current information from the web
- `get_sports_odds`: bookmaker odds for a sport key
- `list_available_sports`: every sport key the odds provider accepts
- `test_odds_connection`: check the odds provider connection and quota
- `ping`: check network connectivity to a URL

Only tools listed in your tool definitions are available in this session.

## Popular Sport Keys

- `soccer_epl` (Premier League), `soccer_france_ligue_one`, `soccer_spain_la_liga`,
  `soccer_italy_serie_a`, `soccer_germany_bundesliga`, `soccer_uefa_champs_league`
- `basketball_nba`, `americanfootball_nfl`, `icehockey_nhl`, `tennis_atp_french_open`

If you are unsure of a key, call `list_available_sports` first.

## Odds

Prices are decimal odds. The implied probability of an outcome is 1 / price.
Never present a prediction as certain.

## Responsible Gambling

End every prediction with a short reminder that betting carries risk and
should stay within the user's means."#;

/// First assistant message of a new session
pub const WELCOME_MESSAGE: &str = r#"🎯 **Welcome to PronosAI!**

I am your sports-prediction assistant. I can help you:

• 📊 Analyse live sports odds
• 🔍 Look up news on teams and players
• 📈 Provide statistical analysis
• 🎯 Offer argued predictions

**Example questions:**
- "What are the Premier League odds this weekend?"
- "Analyse Barcelona vs Real Madrid"
- "Which sports are available?"

⚠️ **Important:** sports betting carries risk. Play responsibly!"#;

/// Canned prompts offered as one-click shortcuts
pub const QUICK_ACTIONS: [(&str, &str); 3] = [
    ("🏆 Available sports", "Which sports are available?"),
    ("⚽ Premier League odds", "Show me the Premier League odds"),
    ("🏈 NFL odds", "What are the current NFL odds?"),
];
