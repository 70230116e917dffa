use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use fairline::csv::{write_score_matrix, CsvWriter};
use fairline::file::FromJsonFile;
use fairline::insights::{compute_from_scoregrid, InsightsConfig, MarketQuote};
use fairline::odds;
use fairline::print::{tabulate_insights, tabulate_market, tabulate_scorelines};
use fairline::scoregrid::ScoreMatrix;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// JSON file to source the configuration from; flags override its values
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// expected goals for the home side
    #[clap(long)]
    home_rate: Option<f64>,

    /// expected goals for the away side
    #[clap(long)]
    away_rate: Option<f64>,

    /// maximum goals per side in the score matrix
    #[clap(short = 'k', long)]
    max_goals: Option<u8>,

    /// total goals line
    #[clap(short = 'l', long)]
    line: Option<f64>,

    /// number of top scorelines to show
    #[clap(short = 'n', long)]
    top: Option<usize>,

    /// market odds for home, draw and away, in any notation (e.g. "2.10 3.40 13/5")
    #[clap(short = 'o', long)]
    odds: Option<String>,

    /// bankroll to size stakes against
    #[clap(short = 'b', long)]
    bankroll: Option<f64>,

    /// cap on the Kelly fraction
    #[clap(long)]
    cap: Option<f64>,

    /// write the score matrix to a CSV file
    #[clap(long)]
    csv: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.config.is_none() && (self.home_rate.is_none() || self.away_rate.is_none()) {
            bail!("either a config file or both --home-rate and --away-rate must be specified");
        }
        Ok(())
    }

    fn to_config(&self) -> anyhow::Result<InsightsConfig> {
        let mut config = match &self.config {
            None => InsightsConfig::default(),
            Some(path) => InsightsConfig::from_json_file(path)?,
        };
        if let Some(home_rate) = self.home_rate {
            config.home_rate = home_rate;
        }
        if let Some(away_rate) = self.away_rate {
            config.away_rate = away_rate;
        }
        if let Some(max_goals) = self.max_goals {
            config.max_goals = max_goals;
        }
        if let Some(line) = self.line {
            config.line = line;
        }
        if let Some(top) = self.top {
            config.top_scorelines = top;
        }
        if let Some(bankroll) = self.bankroll {
            config.bankroll = Some(bankroll);
        }
        if let Some(cap) = self.cap {
            config.cap = cap;
        }
        if let Some(odds) = &self.odds {
            config.market = Some(parse_quote(odds)?);
        }
        Ok(config)
    }
}

fn parse_quote(text: &str) -> anyhow::Result<MarketQuote> {
    let tokens: Vec<_> = text.split_whitespace().collect();
    if tokens.len() != 3 {
        bail!("expected 3 prices for home, draw and away, got {}", tokens.len());
    }
    Ok(MarketQuote {
        home: odds::parse(tokens[0])?,
        draw: odds::parse(tokens[1])?,
        away: odds::parse(tokens[2])?,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let config = args.to_config()?;
    config.validate()?;
    debug!("config: {config:?}");

    let scoregrid = ScoreMatrix::from_poisson(config.home_rate, config.away_rate, config.max_goals)?;
    let insights = compute_from_scoregrid(&scoregrid, &config)?;
    info!(
        "λ home: {}, λ away: {}, max goals: {}, truncated mass: {:.3e}",
        config.home_rate, config.away_rate, config.max_goals, insights.cutoff
    );
    info!("\n{}", Console::default().render(&tabulate_insights(&insights)));
    info!(
        "top scorelines:\n{}",
        Console::default().render(&tabulate_scorelines(&insights.top_scorelines))
    );
    if let Some(market) = &insights.market {
        info!(
            "market:\n{}",
            Console::default().render(&tabulate_market(&insights.p1x2, market))
        );
    }

    if let Some(path) = &args.csv {
        let mut writer = CsvWriter::create(path)?;
        write_score_matrix(&mut writer, &scoregrid)?;
        info!("score matrix written to {}", path.display());
    }
    Ok(())
}
