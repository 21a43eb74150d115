//! Odds Provider Integration
//!
//! Abstractions and implementations for sports odds providers.

mod the_odds_api;

pub use the_odds_api::TheOddsApiClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{OddsEvent, SportsListing};

/// Odds provider trait (Strategy pattern)
///
/// Implement this for each odds source. Only The Odds API ships today.
#[async_trait]
pub trait OddsClient: Send + Sync {
    /// All sports the provider covers, with the remaining request quota
    async fn sports(&self) -> Result<SportsListing>;

    /// Upcoming events with bookmaker prices for one sport
    async fn odds(&self, sport_key: &str, regions: &str, markets: &str) -> Result<Vec<OddsEvent>>;

    /// Provider name
    fn name(&self) -> &str;
}
