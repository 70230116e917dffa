//! The joint distribution of home and away goals, truncated at a maximum goal count per side,
//! together with the markets derived from it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::linear::Matrix;
use crate::odds;
use crate::param::InvalidParameter;
use crate::poisson;
use crate::probs::SliceExt;

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}
impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }

    pub fn total(&self) -> u16 {
        self.home as u16 + self.away as u16
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Win(Side),
    Draw,
    /// Strictly more total goals than the line.
    GoalsOver(f64),
    /// The complement of [Outcome::GoalsOver] on the same line.
    GoalsUnder(f64),
    BothTeamsToScore,
    NotBothTeamsToScore,
    CorrectScore(Score),
}
impl Outcome {
    pub fn gather(&self, scoregrid: &Matrix) -> f64 {
        match self {
            Outcome::Win(side) => Self::gather_win(side, scoregrid),
            Outcome::Draw => Self::gather_draw(scoregrid),
            Outcome::GoalsOver(line) => Self::gather_goals(scoregrid, |total| total > *line),
            Outcome::GoalsUnder(line) => Self::gather_goals(scoregrid, |total| total <= *line),
            Outcome::BothTeamsToScore => Self::gather_btts(scoregrid),
            Outcome::NotBothTeamsToScore => Self::gather_goals_nil(scoregrid),
            Outcome::CorrectScore(score) => Self::gather_correct_score(score, scoregrid),
        }
    }

    fn gather_win(side: &Side, scoregrid: &Matrix) -> f64 {
        let mut prob = 0.0;
        match side {
            Side::Home => {
                for row in 1..scoregrid.rows() {
                    for col in 0..usize::min(row, scoregrid.cols()) {
                        prob += scoregrid[(row, col)];
                    }
                }
            }
            Side::Away => {
                for col in 1..scoregrid.cols() {
                    for row in 0..usize::min(col, scoregrid.rows()) {
                        prob += scoregrid[(row, col)];
                    }
                }
            }
        }
        prob
    }

    fn gather_draw(scoregrid: &Matrix) -> f64 {
        (0..usize::min(scoregrid.rows(), scoregrid.cols()))
            .map(|index| scoregrid[(index, index)])
            .sum()
    }

    fn gather_goals(scoregrid: &Matrix, mut include: impl FnMut(f64) -> bool) -> f64 {
        scoregrid
            .cells()
            .filter(|&(row, col, _)| include((row + col) as f64))
            .map(|(_, _, prob)| prob)
            .sum()
    }

    fn gather_btts(scoregrid: &Matrix) -> f64 {
        let mut prob = 0.0;
        for row in 1..scoregrid.rows() {
            prob += scoregrid.row_slice(row)[1..].sum();
        }
        prob
    }

    fn gather_goals_nil(scoregrid: &Matrix) -> f64 {
        scoregrid
            .cells()
            .filter(|&(row, col, _)| row == 0 || col == 0)
            .map(|(_, _, prob)| prob)
            .sum()
    }

    fn gather_correct_score(score: &Score, scoregrid: &Matrix) -> f64 {
        let (row, col) = (score.home as usize, score.away as usize);
        if row < scoregrid.rows() && col < scoregrid.cols() {
            scoregrid[(row, col)]
        } else {
            0.0
        }
    }
}

/// Head-to-head (1X2) probabilities or prices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneXTwo {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}
impl OneXTwo {
    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.home, self.draw, self.away]
    }

    /// Fair decimal prices for these probabilities. A zero probability has an infinite price.
    pub fn fair_prices(&self) -> OneXTwo {
        OneXTwo {
            home: fair_price(self.home),
            draw: fair_price(self.draw),
            away: fair_price(self.away),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverUnder {
    pub line: f64,
    pub over: f64,
    pub under: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Btts {
    pub yes: f64,
    pub no: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scoreline {
    pub home: u8,
    pub away: u8,
    pub probability: f64,
}

pub(crate) fn fair_price(probability: f64) -> f64 {
    odds::probability_to_decimal(probability).unwrap_or(f64::INFINITY)
}

/// A square grid of joint scoreline probabilities, where cell `(h, a)` holds the probability of
/// the home side scoring `h` goals and the away side `a` goals. The cells always sum to 1.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreMatrix {
    grid: Matrix,
    cutoff: f64,
}
impl ScoreMatrix {
    /// Builds the grid from independent Poisson goal counts, truncating each side at `max_goals`
    /// and renormalising so that the tail mass beyond the truncation is redistributed
    /// proportionally.
    pub fn from_poisson(
        home_rate: f64,
        away_rate: f64,
        max_goals: u8,
    ) -> Result<Self, InvalidParameter> {
        let home_probs = poisson::pmf(home_rate, max_goals)
            .map_err(|err| InvalidParameter { name: "home goal rate", ..err })?;
        let away_probs = poisson::pmf(away_rate, max_goals)
            .map_err(|err| InvalidParameter { name: "away goal rate", ..err })?;
        let grid = Matrix::outer_product(&home_probs, &away_probs);
        let scoregrid = Self::from_grid(grid)?;
        debug!(
            "{0}x{0} scoregrid for rates {home_rate}/{away_rate}, cutoff: {1}",
            max_goals as usize + 1,
            scoregrid.cutoff
        );
        Ok(scoregrid)
    }

    /// Adopts an arbitrary non-negative square grid, normalising it to unit mass. The reported
    /// cutoff is the shortfall of the original mass from 1.
    pub fn from_grid(mut grid: Matrix) -> Result<Self, InvalidParameter> {
        if grid.rows() != grid.cols() || grid.rows() == 0 || grid.rows() > u8::MAX as usize + 1 {
            return Err(InvalidParameter::new(
                "scoregrid size",
                grid.rows() as f64,
                "must be square with 1 to 256 rows",
            ));
        }
        if let Some(&negative) = grid.flatten().iter().find(|&&prob| !(prob >= 0.0)) {
            return Err(InvalidParameter::new(
                "scoregrid cell",
                negative,
                "must be non-negative",
            ));
        }
        let total = grid.flatten_mut().normalise(1.0);
        if !(total > 0.0 && total.is_finite()) {
            return Err(InvalidParameter::new(
                "scoregrid mass",
                total,
                "must be positive and finite",
            ));
        }
        Ok(Self {
            grid,
            cutoff: 1.0 - total,
        })
    }

    pub fn grid(&self) -> &Matrix {
        &self.grid
    }

    /// The maximum goal count per side.
    pub fn max_goals(&self) -> u8 {
        (self.grid.rows() - 1) as u8
    }

    /// Probability mass that was lost to truncation, prior to renormalisation.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn probability(&self, score: &Score) -> f64 {
        Outcome::CorrectScore(score.clone()).gather(&self.grid)
    }

    pub fn one_x_two(&self) -> OneXTwo {
        let mut probs = [
            Outcome::Win(Side::Home).gather(&self.grid),
            Outcome::Draw.gather(&self.grid),
            Outcome::Win(Side::Away).gather(&self.grid),
        ];
        probs.normalise(1.0);
        let [home, draw, away] = probs;
        OneXTwo { home, draw, away }
    }

    pub fn over_under(&self, line: f64) -> OverUnder {
        let over = Outcome::GoalsOver(line).gather(&self.grid);
        OverUnder {
            line,
            over,
            under: 1.0 - over,
        }
    }

    pub fn btts(&self) -> Btts {
        let yes = Outcome::BothTeamsToScore.gather(&self.grid);
        Btts { yes, no: 1.0 - yes }
    }

    /// The `n` most likely scorelines, in descending order of probability. Equally likely
    /// scorelines are ordered by ascending home goals, then ascending away goals.
    pub fn top_scorelines(&self, n: usize) -> Vec<Scoreline> {
        let mut scorelines: Vec<_> = self
            .grid
            .cells()
            .map(|(home, away, probability)| Scoreline {
                home: home as u8,
                away: away as u8,
                probability,
            })
            .collect();
        // stable, so ties retain row-major order
        scorelines.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        scorelines.truncate(n);
        scorelines
    }
}

/// Both teams to score under independent Poisson goal counts, without truncation:
/// `1 − e^(−λh) − e^(−λa) + e^(−(λh + λa))`.
pub fn btts_closed_form(home_rate: f64, away_rate: f64) -> Btts {
    let yes =
        1.0 - f64::exp(-home_rate) - f64::exp(-away_rate) + f64::exp(-(home_rate + away_rate));
    Btts { yes, no: 1.0 - yes }
}
