//! Validation of numeric model parameters.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {name}: {value} ({constraint})")]
pub struct InvalidParameter {
    pub name: &'static str,
    pub value: f64,
    pub constraint: &'static str,
}
impl InvalidParameter {
    pub fn new(name: &'static str, value: f64, constraint: &'static str) -> Self {
        Self {
            name,
            value,
            constraint,
        }
    }
}

/// Requires `value` to be finite and `>= 0`.
pub fn non_negative(name: &'static str, value: f64) -> Result<f64, InvalidParameter> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InvalidParameter::new(name, value, "must be finite and non-negative"))
    }
}

/// Requires `value` to lie in the closed unit interval.
pub fn unit_interval(name: &'static str, value: f64) -> Result<f64, InvalidParameter> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(InvalidParameter::new(name, value, "must lie in [0, 1]"))
    }
}

/// Requires `value` to be a bettable decimal price, i.e., finite and strictly above 1.
pub fn decimal_price(name: &'static str, value: f64) -> Result<f64, InvalidParameter> {
    if value.is_finite() && value > 1.0 {
        Ok(value)
    } else {
        Err(InvalidParameter::new(name, value, "must be a finite price above 1"))
    }
}
