//! Domain Models
//!
//! Wire shapes of the odds provider. Prices are decimal odds held as
//! `rust_decimal::Decimal` so they print exactly as the bookmaker quoted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sport offered by the odds provider
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sport {
    /// Provider key (e.g., "soccer_epl")
    pub key: String,

    /// Display title (e.g., "EPL")
    pub title: String,

    #[serde(default)]
    pub group: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub active: bool,
}

impl Sport {
    pub fn is_soccer(&self) -> bool {
        self.key.contains("soccer")
    }
}

/// Sports list plus the quota header that came with it
#[derive(Clone, Debug)]
pub struct SportsListing {
    pub sports: Vec<Sport>,

    /// `x-requests-remaining` response header
    pub requests_remaining: Option<String>,
}

/// One upcoming match
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OddsEvent {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub sport_key: String,

    pub home_team: String,
    pub away_team: String,
    pub commence_time: DateTime<Utc>,

    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

impl OddsEvent {
    /// First market of the first bookmaker, as displayed to the user
    pub fn headline_market(&self) -> Option<(&Bookmaker, &Market)> {
        let bookmaker = self.bookmakers.first()?;
        let market = bookmaker.markets.first()?;
        Some((bookmaker, market))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bookmaker {
    #[serde(default)]
    pub key: String,

    pub title: String,

    #[serde(default)]
    pub markets: Vec<Market>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Market {
    /// Market key ("h2h", "spreads", "totals")
    pub key: String,

    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Outcome {
    pub name: String,

    /// Decimal odds
    pub price: Decimal,

    /// Handicap or total line, for spreads/totals
    #[serde(default)]
    pub point: Option<Decimal>,
}
