//! Console tables for insights, markets and devig results.

use stanza::style::HAlign::Left;
use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

use crate::insights::{MarketComparison, MatchInsights};
use crate::kelly::KellyRecommendation;
use crate::market::DevigResult;
use crate::scoregrid::{OneXTwo, Scoreline};

fn label_col() -> Col {
    Col::new(Styles::default().with(MinWidth(10)).with(Left))
}

fn value_col() -> Col {
    Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right))
}

fn header_row(cells: &[&str]) -> Row {
    Row::new(
        Styles::default().with(Header(true)).with(Separator(true)),
        cells.iter().map(|&cell| cell.into()).collect(),
    )
}

fn percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

fn price(price: f64) -> String {
    if price.is_finite() {
        format!("{price:.2}")
    } else {
        "-".into()
    }
}

/// The model markets: 1X2, over/under and BTTS, with fair prices.
pub fn tabulate_insights(insights: &MatchInsights) -> Table {
    let mut table = Table::default()
        .with_cols(vec![label_col(), value_col(), value_col()])
        .with_row(header_row(&["Market", "Probability", "Fair price"]));

    let over_under = &insights.over_under;
    let outcomes = [
        ("Home".to_string(), insights.p1x2.home),
        ("Draw".to_string(), insights.p1x2.draw),
        ("Away".to_string(), insights.p1x2.away),
        (format!("Over {}", over_under.line), over_under.over),
        (format!("Under {}", over_under.line), over_under.under),
        ("BTTS yes".to_string(), insights.btts.yes),
        ("BTTS no".to_string(), insights.btts.no),
    ];
    for (label, probability) in outcomes {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                label.into(),
                percent(probability).into(),
                price(1.0 / probability).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_scorelines(scorelines: &[Scoreline]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![label_col(), value_col(), value_col()])
        .with_row(header_row(&["Score", "Probability", "Fair price"]));
    for scoreline in scorelines {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{}-{}", scoreline.home, scoreline.away).into(),
                percent(scoreline.probability).into(),
                price(1.0 / scoreline.probability).into(),
            ],
        ));
    }
    table
}

/// Model against market for each 1X2 outcome, with the Kelly stakes.
pub fn tabulate_market(model: &OneXTwo, comparison: &MarketComparison) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            label_col(),
            value_col(),
            value_col(),
            value_col(),
            value_col(),
            value_col(),
            value_col(),
        ])
        .with_row(header_row(&[
            "Outcome", "Price", "Market", "Model", "Edge", "Kelly", "Stake",
        ]));
    let rows: [(&str, f64, f64, &KellyRecommendation); 3] = [
        ("Home", comparison.fair.home, model.home, &comparison.kelly.home),
        ("Draw", comparison.fair.draw, model.draw, &comparison.kelly.draw),
        ("Away", comparison.fair.away, model.away, &comparison.kelly.away),
    ];
    for (label, market, model, kelly) in rows {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                label.into(),
                price(kelly.price).into(),
                percent(market).into(),
                percent(model).into(),
                format!("{:+.2}%", kelly.edge * 100.0).into(),
                percent(kelly.fraction).into(),
                kelly
                    .stake_amount
                    .map(|amount| format!("{amount:.2}"))
                    .unwrap_or_else(|| "-".into())
                    .into(),
            ],
        ));
    }
    table.push_row(Row::new(
        Styles::default().with(Separator(true)),
        vec![
            "Overround".into(),
            "".into(),
            percent(comparison.overround).into(),
            "".into(),
            "".into(),
            "".into(),
            "".into(),
        ],
    ));
    table
}

/// Side-by-side devig results for the same book, one column group per method.
pub fn tabulate_devig(prices: &[f64], results: &[DevigResult]) -> Table {
    let mut cols = vec![label_col(), value_col(), value_col()];
    for _ in results {
        cols.push(Col::new(
            Styles::default()
                .with(Separator(true))
                .with(MinWidth(10))
                .with(HAlign::Right),
        ));
        cols.push(value_col());
    }
    let mut table = Table::default().with_cols(cols).with_row({
        let mut header_cells = vec!["#".into(), "Price".into(), "Raw".into()];
        for result in results {
            header_cells.push(format!("{} fair", result.method).into());
            header_cells.push("Price".into());
        }
        Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            header_cells,
        )
    });

    for (index, &quoted) in prices.iter().enumerate() {
        let mut row_cells = vec![
            format!("{}", index + 1).into(),
            price(quoted).into(),
            percent(1.0 / quoted).into(),
        ];
        for result in results {
            let fair = result.fair[index];
            row_cells.push(percent(fair).into());
            row_cells.push(price(1.0 / fair).into());
        }
        table.push_row(Row::new(Styles::default(), row_cells));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::{compute_insights, InsightsConfig, MarketQuote};
    use crate::market::{devig, OverroundMethod};
    use stanza::renderer::console::Console;
    use stanza::renderer::Renderer;
    use strum::IntoEnumIterator;

    fn render(table: &Table) -> String {
        Console::default().render(table).to_string()
    }

    #[test]
    fn insights_and_market() {
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
        let insights = compute_insights(&config).unwrap();

        let rendered = render(&tabulate_insights(&insights));
        assert!(rendered.contains("51.37%"), "{rendered}");
        assert!(rendered.contains("Over 2.5"), "{rendered}");

        let rendered = render(&tabulate_scorelines(&insights.top_scorelines));
        assert!(rendered.contains("1-1"), "{rendered}");
        assert!(rendered.contains("11.64%"), "{rendered}");

        let market = insights.market.as_ref().unwrap();
        let rendered = render(&tabulate_market(&insights.p1x2, market));
        assert!(rendered.contains("71.67"), "{rendered}");
        assert!(rendered.contains("Overround"), "{rendered}");
    }

    #[test]
    fn devig_comparison() {
        let prices = [2.1, 3.4, 3.6];
        let results: Vec<_> = OverroundMethod::iter()
            .map(|method| devig(method, &prices).unwrap())
            .collect();
        let rendered = render(&tabulate_devig(&prices, &results));
        assert!(rendered.contains("shin fair"), "{rendered}");
        assert!(rendered.contains("45.43%"), "{rendered}");
    }

    #[test]
    fn infinite_price() {
        assert_eq!("-", price(f64::INFINITY));
        assert_eq!("2.10", price(2.1));
    }
}
