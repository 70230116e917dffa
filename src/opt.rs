//! Univariate root finding.

use anyhow::bail;
use tracing::trace;

#[derive(Clone, Debug)]
pub struct BisectionConfig {
    pub lower: f64,
    pub upper: f64,
    /// Upper bounds never expand past this value.
    pub ceiling: f64,
    pub max_expansions: u32,
    pub max_steps: u64,
    pub acceptable_residual: f64,
}
impl BisectionConfig {
    pub const DEFAULT_MAX_EXPANSIONS: u32 = 32;
    pub const DEFAULT_MAX_STEPS: u64 = 200;
    pub const DEFAULT_ACCEPTABLE_RESIDUAL: f64 = 1e-9;

    pub fn bracket(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            ceiling: f64::INFINITY,
            max_expansions: Self::DEFAULT_MAX_EXPANSIONS,
            max_steps: Self::DEFAULT_MAX_STEPS,
            acceptable_residual: Self::DEFAULT_ACCEPTABLE_RESIDUAL,
        }
    }

    pub fn with_ceiling(mut self, ceiling: f64) -> Self {
        self.ceiling = ceiling;
        self
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.lower <= self.upper) {
            bail!("lower bound {} must not exceed upper bound {}", self.lower, self.upper)
        }
        if self.upper > self.ceiling {
            bail!("upper bound {} must not exceed the ceiling {}", self.upper, self.ceiling)
        }
        if self.acceptable_residual < 0.0 {
            bail!("acceptable residual must be non-negative")
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BisectionOutcome {
    pub steps: u64,
    pub expansions: u32,
    pub root: f64,
    pub residual: f64,
    /// Whether the function changed sign across the final bracket. An unbracketed search still
    /// yields a best-effort root.
    pub bracketed: bool,
    pub lower: f64,
    pub upper: f64,
}

/// Finds a root of `f` by bisection.
///
/// The bracket is first widened until `f` changes sign across it: the upper bound doubles while
/// `f` is positive at both ends, and the lower bound halves while `f` is negative at both ends.
/// Each direction gets at most `max_expansions` attempts. Bisection then runs regardless, ending
/// early once `|f(mid)|` is within the acceptable residual.
pub fn bisect(
    config: &BisectionConfig,
    mut f: impl FnMut(f64) -> f64,
) -> Result<BisectionOutcome, anyhow::Error> {
    config.validate()?;

    let (mut lower, mut upper) = (config.lower, config.upper);
    let (mut f_lower, mut f_upper) = (f(lower), f(upper));

    let mut expansions = 0;
    let mut attempts = 0;
    while f_lower > 0.0 && f_upper > 0.0 && attempts < config.max_expansions {
        attempts += 1;
        let expanded = f64::min(upper * 2.0, config.ceiling);
        if expanded == upper {
            break;
        }
        upper = expanded;
        f_upper = f(upper);
        expansions += 1;
    }

    attempts = 0;
    while f_lower < 0.0 && f_upper < 0.0 && attempts < config.max_expansions {
        attempts += 1;
        let contracted = lower / 2.0;
        if contracted == lower {
            break;
        }
        lower = contracted;
        f_lower = f(lower);
        expansions += 1;
    }

    let bracketed = f_lower * f_upper <= 0.0;
    trace!("bracket [{lower}, {upper}], f: [{f_lower}, {f_upper}], expansions: {expansions}, bracketed: {bracketed}");

    let (bracket_lower, bracket_upper) = (lower, upper);
    let mut steps = 0;
    while steps < config.max_steps {
        steps += 1;
        let mid = (lower + upper) / 2.0;
        let f_mid = f(mid);
        if f_mid.abs() <= config.acceptable_residual {
            return Ok(BisectionOutcome {
                steps,
                expansions,
                root: mid,
                residual: f_mid,
                bracketed,
                lower: bracket_lower,
                upper: bracket_upper,
            });
        }
        if (f_lower <= 0.0 && f_mid > 0.0) || (f_lower >= 0.0 && f_mid < 0.0) {
            upper = mid;
        } else {
            lower = mid;
            f_lower = f_mid;
        }
    }

    let root = (lower + upper) / 2.0;
    Ok(BisectionOutcome {
        steps,
        expansions,
        root,
        residual: f(root),
        bracketed,
        lower: bracket_lower,
        upper: bracket_upper,
    })
}

#[cfg(test)]
mod tests;
