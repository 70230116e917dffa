//! Removal of the bookmaker's margin ("devigging") from a vector of decimal prices quoted on
//! mutually exclusive, collectively exhaustive outcomes.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::{debug, warn};

use crate::opt::{bisect, BisectionConfig, BisectionOutcome};
use crate::probs::SliceExt;

pub type PriceBounds = RangeInclusive<f64>;

/// Maximum tolerated departure of the fair probabilities from unity before a final rescale.
const FAIR_SUM_TOLERANCE: f64 = 1e-6;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum OverroundMethod {
    /// Proportional scaling of the implied probabilities.
    Basic,
    /// Solves `Σ rᵢ / (1 + k·rᵢ) = 1` for `k ≥ 0`.
    Multiplicative,
    /// Solves `Σ rᵢ^α = 1` for `α`.
    Power,
    /// Shin's insider-trading model, solving for the insider share `z`.
    Shin,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidMarket {
    #[error("at least 2 outcomes are required, got {0}")]
    TooFewOutcomes(usize),

    #[error("invalid price {price} at index {index}")]
    InvalidPrice { index: usize, price: f64 },
}

/// The root-finding step of a devig could not bracket a solution, so the fair probabilities are
/// approximate (though still normalised).
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{method} devig root not bracketed in [{lower}, {upper}] (root: {root}, residual: {residual})")]
pub struct NumericDegeneracy {
    pub method: OverroundMethod,
    pub lower: f64,
    pub upper: f64,
    pub root: f64,
    pub residual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevigResult {
    pub method: OverroundMethod,
    /// `Σ 1/priceᵢ − 1`. Negative for a book that admits an arbitrage.
    pub overround: f64,
    /// Implied probabilities `1/priceᵢ`.
    pub raw: Vec<f64>,
    /// Margin-free probabilities, summing to 1.
    pub fair: Vec<f64>,
    pub degeneracy: Option<NumericDegeneracy>,
}
impl DevigResult {
    pub fn fair_prices(&self) -> Vec<f64> {
        self.fair.invert().collect()
    }
}

fn validate(prices: &[f64]) -> Result<(), InvalidMarket> {
    if prices.len() < 2 {
        return Err(InvalidMarket::TooFewOutcomes(prices.len()));
    }
    match prices
        .iter()
        .enumerate()
        .find(|&(_, &price)| !(price.is_finite() && price > 1.0))
    {
        Some((index, &price)) => Err(InvalidMarket::InvalidPrice { index, price }),
        None => Ok(()),
    }
}

/// The overround of a book, independent of the devig method.
pub fn overround(prices: &[f64]) -> Result<f64, InvalidMarket> {
    validate(prices)?;
    Ok(prices.invert().sum::<f64>() - 1.0)
}

/// Strips the overround from `prices` using the given `method`.
pub fn devig(method: OverroundMethod, prices: &[f64]) -> Result<DevigResult, InvalidMarket> {
    validate(prices)?;
    let raw: Vec<_> = prices.invert().collect();
    let overround = raw.sum() - 1.0;

    let (mut fair, search) = match method {
        OverroundMethod::Basic => (raw.clone(), None),
        OverroundMethod::Multiplicative => {
            let outcome = solve(BisectionConfig::bracket(0.0, 1.0), |k| {
                raw.iter().map(|r| r / (1.0 + k * r)).sum::<f64>() - 1.0
            });
            let k = outcome.root;
            (raw.iter().map(|r| r / (1.0 + k * r)).collect(), Some(outcome))
        }
        OverroundMethod::Power => {
            let outcome = solve(BisectionConfig::bracket(1.0, 2.0), |alpha| {
                raw.iter().map(|r| r.powf(alpha)).sum::<f64>() - 1.0
            });
            let alpha = outcome.root;
            (raw.iter().map(|r| r.powf(alpha)).collect(), Some(outcome))
        }
        OverroundMethod::Shin => {
            let booksum = raw.sum();
            let min_raw = raw.iter().copied().fold(f64::INFINITY, f64::min);
            let upper = f64::max(1e-12, min_raw - 1e-12);
            let config = BisectionConfig::bracket(0.0, upper).with_ceiling(1.0 - 1e-12);
            let outcome = solve(config, |z| {
                raw.iter().map(|&r| shin_prob(r, booksum, z)).sum::<f64>() - 1.0
            });
            let z = outcome.root;
            (raw.iter().map(|&r| shin_prob(r, booksum, z)).collect(), Some(outcome))
        }
    };
    fair.normalise(1.0);

    let fair_sum = fair.sum();
    if (fair_sum - 1.0).abs() > FAIR_SUM_TOLERANCE {
        fair.scale(1.0 / fair_sum);
    }

    let degeneracy = search.and_then(|outcome| {
        debug!(
            "{method} devig root: {}, residual: {}, steps: {}",
            outcome.root, outcome.residual, outcome.steps
        );
        if outcome.bracketed {
            None
        } else {
            let degeneracy = NumericDegeneracy {
                method,
                lower: outcome.lower,
                upper: outcome.upper,
                root: outcome.root,
                residual: outcome.residual,
            };
            warn!("{degeneracy}");
            Some(degeneracy)
        }
    });

    Ok(DevigResult {
        method,
        overround,
        raw,
        fair,
        degeneracy,
    })
}

fn solve(config: BisectionConfig, f: impl FnMut(f64) -> f64) -> BisectionOutcome {
    let (lower, upper) = (config.lower, config.upper);
    // the brackets are constructed above and always valid
    bisect(&config, f).unwrap_or(BisectionOutcome {
        steps: 0,
        expansions: 0,
        root: (lower + upper) / 2.0,
        residual: f64::NAN,
        bracketed: false,
        lower,
        upper,
    })
}

/// The true probability of an outcome with implied probability `raw` under Shin's model, where
/// `z` is the share of insider money and `booksum` is the sum of implied probabilities.
#[inline]
fn shin_prob(raw: f64, booksum: f64, z: f64) -> f64 {
    ((z.powi(2) + 4.0 * (1.0 - z) * raw.powi(2) / booksum).sqrt() - z) / (2.0 * (1.0 - z))
}

/// Frames fair probabilities into prices carrying the given multiplicative `overround`, each
/// clamped to `bounds`. Zero probabilities map to the upper bound.
pub fn frame_prices(fair_probs: &[f64], overround: f64, bounds: &PriceBounds) -> Vec<f64> {
    fair_probs
        .iter()
        .map(|&prob| {
            let price = 1.0 / prob / (1.0 + overround);
            if price.is_nan() {
                *bounds.end()
            } else {
                price.clamp(*bounds.start(), *bounds.end())
            }
        })
        .collect()
}
