//! Match insights: the model markets for a fixture, and, when market prices are supplied, how
//! they compare against the bookmaker along with Kelly stakes for each outcome.

use anyhow::bail;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::kelly::KellyRecommendation;
use crate::market::{self, InvalidMarket, OverroundMethod};
use crate::odds::ParseError;
use crate::param::InvalidParameter;
use crate::scoregrid::{Btts, OneXTwo, OverUnder, ScoreMatrix, Scoreline};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsightsError {
    #[error("{0}")]
    InvalidParameter(#[from] InvalidParameter),

    #[error("{0}")]
    InvalidMarket(#[from] InvalidMarket),

    #[error("{0}")]
    Parse(#[from] ParseError),
}

/// Decimal prices quoted on the head-to-head market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}
impl MarketQuote {
    pub fn to_array(&self) -> [f64; 3] {
        [self.home, self.draw, self.away]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub home_rate: f64,
    pub away_rate: f64,
    pub max_goals: u8,
    pub line: f64,
    pub top_scorelines: usize,
    pub cap: f64,
    pub bankroll: Option<f64>,
    pub market: Option<MarketQuote>,
}
impl InsightsConfig {
    pub const DEFAULT_HOME_RATE: f64 = 1.45;
    pub const DEFAULT_AWAY_RATE: f64 = 1.2;
    pub const DEFAULT_MAX_GOALS: u8 = 8;
    pub const DEFAULT_LINE: f64 = 2.5;
    pub const DEFAULT_TOP_SCORELINES: usize = 5;
    pub const DEFAULT_CAP: f64 = 0.1;

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.home_rate.is_finite() && self.home_rate >= 0.0) {
            bail!("home goal rate must be finite and non-negative");
        }
        if !(self.away_rate.is_finite() && self.away_rate >= 0.0) {
            bail!("away goal rate must be finite and non-negative");
        }
        if !self.line.is_finite() {
            bail!("goal line must be finite");
        }
        if !(0.0..=1.0).contains(&self.cap) {
            bail!("Kelly cap must lie in [0, 1]");
        }
        if let Some(bankroll) = self.bankroll {
            if !(bankroll.is_finite() && bankroll >= 0.0) {
                bail!("bankroll must be finite and non-negative");
            }
        }
        if let Some(market) = &self.market {
            if market
                .to_array()
                .iter()
                .any(|&price| !(price.is_finite() && price > 1.0))
            {
                bail!("market prices must be finite and above 1");
            }
        }
        Ok(())
    }
}
impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            home_rate: Self::DEFAULT_HOME_RATE,
            away_rate: Self::DEFAULT_AWAY_RATE,
            max_goals: Self::DEFAULT_MAX_GOALS,
            line: Self::DEFAULT_LINE,
            top_scorelines: Self::DEFAULT_TOP_SCORELINES,
            cap: Self::DEFAULT_CAP,
            bankroll: None,
            market: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KellyRecommendations {
    pub home: KellyRecommendation,
    pub draw: KellyRecommendation,
    pub away: KellyRecommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketComparison {
    pub prices: MarketQuote,
    pub overround: f64,
    /// Margin-free market probabilities, by the basic (proportional) method.
    pub fair: OneXTwo,
    pub kelly: KellyRecommendations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInsights {
    pub p1x2: OneXTwo,
    pub fair_prices: OneXTwo,
    pub over_under: OverUnder,
    pub btts: Btts,
    pub top_scorelines: Vec<Scoreline>,
    /// Mass lost to truncation before renormalisation.
    pub cutoff: f64,
    pub market: Option<MarketComparison>,
}

/// Derives the model markets from the configured goal rates and, if a market quote is
/// present, compares it against the model.
pub fn compute_insights(config: &InsightsConfig) -> Result<MatchInsights, InsightsError> {
    let scoregrid = ScoreMatrix::from_poisson(config.home_rate, config.away_rate, config.max_goals)?;
    compute_from_scoregrid(&scoregrid, config)
}

/// As [compute_insights], over a prebuilt scoregrid. The goal rates in `config` are ignored.
pub fn compute_from_scoregrid(
    scoregrid: &ScoreMatrix,
    config: &InsightsConfig,
) -> Result<MatchInsights, InsightsError> {
    if !config.line.is_finite() {
        return Err(InvalidParameter::new("line", config.line, "must be finite").into());
    }
    let p1x2 = scoregrid.one_x_two();
    let market = config
        .market
        .as_ref()
        .map(|quote| compare_market(&p1x2, quote, config.cap, config.bankroll))
        .transpose()?;

    let insights = MatchInsights {
        fair_prices: p1x2.fair_prices(),
        over_under: scoregrid.over_under(config.line),
        btts: scoregrid.btts(),
        top_scorelines: scoregrid.top_scorelines(config.top_scorelines),
        cutoff: scoregrid.cutoff(),
        market,
        p1x2,
    };
    debug!(
        "1X2: {:?}, over {}: {}, btts: {}",
        insights.p1x2, config.line, insights.over_under.over, insights.btts.yes
    );
    Ok(insights)
}

fn compare_market(
    model: &OneXTwo,
    quote: &MarketQuote,
    cap: f64,
    bankroll: Option<f64>,
) -> Result<MarketComparison, InsightsError> {
    let devigged = market::devig(OverroundMethod::Basic, &quote.to_array())?;
    let fair = OneXTwo {
        home: devigged.fair[0],
        draw: devigged.fair[1],
        away: devigged.fair[2],
    };
    let kelly = KellyRecommendations {
        home: KellyRecommendation::recommend(model.home, quote.home, cap, bankroll)?,
        draw: KellyRecommendation::recommend(model.draw, quote.draw, cap, bankroll)?,
        away: KellyRecommendation::recommend(model.away, quote.away, cap, bankroll)?,
    };
    debug!(
        "market overround: {}, fair: {fair:?}, stakes: {}/{}/{}",
        devigged.overround, kelly.home.fraction, kelly.draw.fraction, kelly.away.fraction
    );
    Ok(MarketComparison {
        prices: quote.clone(),
        overround: devigged.overround,
        fair,
        kelly,
    })
}
