use super::*;
use assert_float_eq::*;

#[test]
fn bisect_sqrt() {
    let config = BisectionConfig::bracket(0.0, 20.0);
    let outcome = bisect(&config, |value| 81.0 - value.powi(2)).unwrap();
    assert_float_absolute_eq!(9.0, outcome.root, 1e-9);
    assert!(outcome.bracketed);
    assert_eq!(0, outcome.expansions);
}

#[test]
fn bisect_expands_upper() {
    let config = BisectionConfig::bracket(0.0, 1.0);
    // decreasing, positive on [0, 1], root at 10
    let outcome = bisect(&config, |value| 10.0 - value).unwrap();
    assert_float_absolute_eq!(10.0, outcome.root, 1e-9);
    assert!(outcome.bracketed);
    assert_eq!(4, outcome.expansions);
    assert_eq!(16.0, outcome.upper);
}

#[test]
fn bisect_contracts_lower() {
    let config = BisectionConfig::bracket(1.0, 2.0);
    // decreasing, negative on [1, 2], root at 0.3
    let outcome = bisect(&config, |value| 0.3 - value).unwrap();
    assert_float_absolute_eq!(0.3, outcome.root, 1e-9);
    assert!(outcome.bracketed);
    assert_eq!(0.25, outcome.lower);
}

#[test]
fn bisect_respects_ceiling() {
    let config = BisectionConfig::bracket(0.0, 0.25).with_ceiling(1.0);
    let mut max_probe: f64 = 0.0;
    let outcome = bisect(&config, |value| {
        max_probe = max_probe.max(value);
        5.0 - value
    })
    .unwrap();
    assert!(!outcome.bracketed);
    assert_eq!(1.0, max_probe);
    assert_eq!(1.0, outcome.upper);
}

#[test]
fn bisect_unbracketed_terminates() {
    let config = BisectionConfig::bracket(0.0, 1.0);
    let mut evaluations = 0;
    let outcome = bisect(&config, |value| {
        evaluations += 1;
        1.0 + value.powi(2)
    })
    .unwrap();
    assert!(!outcome.bracketed);
    assert!(outcome.root.is_finite());
    assert!(evaluations <= 2 + 2 * 32 + 200 + 1);
}

#[test]
fn bisect_invalid_config() {
    let config = BisectionConfig::bracket(2.0, 1.0);
    assert_eq!(
        "lower bound 2 must not exceed upper bound 1",
        bisect(&config, |value| value).unwrap_err().to_string()
    );
}
