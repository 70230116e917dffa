//! Stake sizing by the Kelly criterion, capped at a fraction of the bankroll.

use serde::{Deserialize, Serialize};

use crate::param::{self, InvalidParameter};

/// The Kelly stake, as a fraction of the bankroll, for a bet at decimal `price` on an outcome
/// of `probability`, capped at `cap`. A bet with no edge is sized at zero; the stake is never
/// negative.
pub fn fraction(probability: f64, price: f64, cap: f64) -> Result<f64, InvalidParameter> {
    let probability = param::unit_interval("probability", probability)?;
    let price = param::decimal_price("price", price)?;
    let cap = param::unit_interval("cap", cap)?;

    let b = price - 1.0;
    let q = 1.0 - probability;
    let raw = (b * probability - q) / b;
    if !raw.is_finite() || raw <= 0.0 {
        Ok(0.0)
    } else {
        Ok(f64::min(cap, raw))
    }
}

pub fn stake_amount(bankroll: f64, fraction: f64) -> Result<f64, InvalidParameter> {
    let bankroll = param::non_negative("bankroll", bankroll)?;
    Ok(bankroll * fraction)
}

/// The expected return per unit staked, `p·price − 1`.
pub fn edge(probability: f64, price: f64) -> f64 {
    probability * price - 1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KellyRecommendation {
    /// Model probability of the outcome.
    pub probability: f64,
    /// Decimal price on offer.
    pub price: f64,
    /// Capped Kelly fraction, in `[0, cap]`.
    pub fraction: f64,
    /// `fraction × bankroll`, present only when a bankroll was given.
    pub stake_amount: Option<f64>,
    pub edge: f64,
}
impl KellyRecommendation {
    pub fn recommend(
        probability: f64,
        price: f64,
        cap: f64,
        bankroll: Option<f64>,
    ) -> Result<Self, InvalidParameter> {
        let fraction = fraction(probability, price, cap)?;
        let stake_amount = bankroll
            .map(|bankroll| stake_amount(bankroll, fraction))
            .transpose()?;
        Ok(Self {
            probability,
            price,
            fraction,
            stake_amount,
            edge: edge(probability, price),
        })
    }
}
