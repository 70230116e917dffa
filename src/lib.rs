//! Football match probabilities from expected-goal rates, with the odds tooling around them:
//! parsing prices in any common notation, stripping the bookmaker's margin, and sizing stakes by
//! the Kelly criterion.

pub mod csv;
pub mod file;
pub mod insights;
pub mod kelly;
pub mod linear;
pub mod market;
pub mod odds;
pub mod opt;
pub mod param;
pub mod poisson;
pub mod print;
pub mod probs;
pub mod scoregrid;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
