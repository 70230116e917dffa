use criterion::{criterion_group, criterion_main, Criterion};

use fairline::insights::{compute_insights, InsightsConfig, MarketQuote};
use fairline::scoregrid::ScoreMatrix;

fn criterion_benchmark(c: &mut Criterion) {
    // sanity check
    assert_eq!(81, ScoreMatrix::from_poisson(1.65, 1.05, 8).unwrap().grid().flatten().len());

    c.bench_function("cri_scoregrid_8", |b| {
        b.iter(|| ScoreMatrix::from_poisson(1.65, 1.05, 8));
    });
    c.bench_function("cri_scoregrid_top_scorelines_12", |b| {
        let scoregrid = ScoreMatrix::from_poisson(1.65, 1.05, 12).unwrap();
        b.iter(|| scoregrid.top_scorelines(5));
    });
    c.bench_function("cri_insights_8", |b| {
        let config = InsightsConfig {
            home_rate: 1.65,
            away_rate: 1.05,
            bankroll: Some(1000.0),
            market: Some(MarketQuote {
                home: 2.1,
                draw: 3.4,
                away: 3.6,
            }),
            ..InsightsConfig::default()
        };
        b.iter(|| compute_insights(&config));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
