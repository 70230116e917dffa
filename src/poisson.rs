use crate::param::{self, InvalidParameter};

/// The Poisson probability mass function `P(X = k)` for `k` in `0..=max`, evaluated by the
/// recurrence `P(0) = e^(−λ)`, `P(k) = P(k − 1)·λ/k`, which avoids computing factorials.
pub fn pmf(lambda: f64, max: u8) -> Result<Vec<f64>, InvalidParameter> {
    let lambda = param::non_negative("lambda", lambda)?;
    let mut probs = Vec::with_capacity(max as usize + 1);
    let mut prob = f64::exp(-lambda);
    probs.push(prob);
    for k in 1..=max {
        prob *= lambda / k as f64;
        probs.push(prob);
    }
    Ok(probs)
}
