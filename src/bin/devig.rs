use std::env;
use std::error::Error;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use strum::IntoEnumIterator;
use tracing::{debug, info};

use fairline::market::{devig, overround, OverroundMethod};
use fairline::odds::{self, OddsFormat};
use fairline::print::tabulate_devig;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// devig method; all methods are shown if omitted
    #[clap(short = 'm', long)]
    method: Option<OverroundMethod>,

    /// notation of the prices, which may then be pasted as a single comma-separated row;
    /// detected per price if omitted
    #[clap(short = 'f', long)]
    format: Option<OddsFormat>,

    /// prices of mutually exclusive outcomes, in any notation
    #[clap(allow_hyphen_values = true)]
    prices: Vec<String>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.prices.is_empty() {
            bail!("at least 2 prices must be specified");
        }
        Ok(())
    }
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

    let prices = match args.format {
        None => args
            .prices
            .iter()
            .map(|raw| odds::parse(raw))
            .collect::<Result<Vec<_>, _>>()?,
        Some(format) => odds::parse_list(format, &args.prices.join(" ")),
    };
    debug!("prices: {prices:?}");
    if prices.len() < 2 {
        return Err(format!("at least 2 valid prices are required, got {}", prices.len()).into());
    }

    let methods: Vec<_> = match args.method {
        None => OverroundMethod::iter().collect(),
        Some(method) => vec![method],
    };
    let results = methods
        .into_iter()
        .map(|method| devig(method, &prices))
        .collect::<Result<Vec<_>, _>>()?;

    info!("overround: {:.2}%", overround(&prices)? * 100.0);
    info!("\n{}", Console::default().render(&tabulate_devig(&prices, &results)));
    Ok(())
}
