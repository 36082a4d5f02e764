use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tickwatch_core::{Dataset, MarketClock, Range, SeriesSource, TickerSource};
use tickwatch_data::{CsvStore, IexChartClient, StaticTickers, StockMarketClockClient};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "tickwatch")]
#[command(about = "Fetch historical price series and compute technical indicators")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch symbols, compute RSI columns, and write one CSV per symbol
    Fetch {
        /// Symbols to process, comma-separated (e.g. "SPY,AMZN,AAPL")
        #[arg(short, long, value_delimiter = ',', required = true)]
        symbols: Vec<String>,

        /// Chart lookback range (1d, 1m, 3m, 6m, ytd, 1y, 2y, 5y)
        #[arg(short, long, default_value = "1y")]
        range: Range,

        /// RSI smoothing period
        #[arg(long, default_value = "8")]
        rsi_period: usize,

        /// Directory to write datasets into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// File name prefix (files are named <prefix><SYMBOL>.csv)
        #[arg(long, default_value = "data-")]
        prefix: String,

        /// Chart API base URL
        #[arg(long, env = "TICKWATCH_CHART_URL", default_value = tickwatch_data::iex::DEFAULT_BASE_URL)]
        base_url: String,
    },

    /// Read a stored dataset and report moving-average and MACD summaries
    Analyze {
        /// Symbol whose dataset to read
        #[arg(short, long)]
        symbol: String,

        /// Directory holding the datasets
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// File name prefix used when the dataset was written
        #[arg(long, default_value = "data-")]
        prefix: String,

        /// Simple moving average windows, comma-separated
        #[arg(long, value_delimiter = ',', default_values_t = [13, 30, 200])]
        windows: Vec<usize>,

        /// Slow EMA period for MACD
        #[arg(long, default_value = "26")]
        slow: usize,

        /// Fast EMA period for MACD
        #[arg(long, default_value = "12")]
        fast: usize,
    },

    /// Check whether an exchange is currently open
    Status {
        /// Exchange identifier (e.g. "nyse")
        #[arg(short, long, default_value = "nyse")]
        exchange: String,

        /// Market clock API base URL
        #[arg(long, env = "TICKWATCH_CLOCK_URL", default_value = tickwatch_data::market_clock::DEFAULT_BASE_URL)]
        base_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Fetch {
            symbols,
            range,
            rsi_period,
            out_dir,
            prefix,
            base_url,
        } => {
            run_fetch(symbols, range, rsi_period, out_dir, prefix, base_url).await?;
        }
        Commands::Analyze {
            symbol,
            dir,
            prefix,
            windows,
            slow,
            fast,
        } => {
            run_analyze(symbol, dir, prefix, windows, slow, fast)?;
        }
        Commands::Status { exchange, base_url } => {
            let clock = StockMarketClockClient::new(base_url)?;
            let status = clock.status(&exchange).await?;
            println!("{exchange}: {status}");
        }
    }

    Ok(())
}

async fn run_fetch(
    symbols: Vec<String>,
    range: Range,
    rsi_period: usize,
    out_dir: PathBuf,
    prefix: String,
    base_url: String,
) -> Result<()> {
    let universe = StaticTickers::new(symbols);
    let source = IexChartClient::new(base_url)?;
    let store = CsvStore::new(&out_dir, &prefix);

    let symbols = universe.tickers().await?;
    tracing::info!(symbols = symbols.len(), %range, rsi_period, "Starting fetch run");

    let mut written = 0usize;
    for symbol in &symbols {
        // One bad symbol never aborts the run; fetching stays sequential.
        let series = match source.fetch(symbol, range).await {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Fetch failed, skipping symbol");
                continue;
            }
        };

        let closes = series.closes();
        let output = match tickwatch_indicators::rsi(&closes, rsi_period) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "RSI not computable, skipping symbol");
                continue;
            }
        };

        let mut dataset = Dataset::new(series);
        dataset.push_column("rsi", output.rsi)?;
        dataset.push_column("deltas", output.price_deltas)?;
        dataset.push_column("up", output.final_up)?;
        dataset.push_column("down", output.final_down)?;

        let path = store.write(&dataset)?;
        tracing::info!(symbol = %symbol, rows = dataset.len(), path = %path.display(), "Wrote dataset");
        written += 1;
    }

    tracing::info!(written, skipped = symbols.len() - written, "Fetch run complete");
    Ok(())
}

fn run_analyze(
    symbol: String,
    dir: PathBuf,
    prefix: String,
    windows: Vec<usize>,
    slow: usize,
    fast: usize,
) -> Result<()> {
    let store = CsvStore::new(&dir, &prefix);
    let dataset = store.read(&symbol)?;
    let closes = dataset.series().closes();

    let sep = "=".repeat(60);
    println!("\n{sep}");
    println!("  {symbol} — {} rows", dataset.len());
    println!("{sep}");
    if let (Some(first), Some(last)) = (closes.first(), closes.last()) {
        println!("  Close:           {first} → {last}");
    }
    if let Some(rsi) = dataset.column("rsi").and_then(|c| c.last()) {
        println!("  Stored RSI:      {rsi:.2}");
    }

    for &window in &windows {
        match tickwatch_indicators::sma(&closes, window) {
            Ok(values) => {
                // Align the valid-mode output with the full series so the
                // last entry reads as "the SMA as of the final row".
                let padded = tickwatch_core::pad_front(&values, closes.len());
                println!(
                    "  SMA({window:>3}):        {:.4}  ({} valid points)",
                    padded[padded.len() - 1],
                    values.len()
                );
            }
            Err(e) => {
                tracing::warn!(window, error = %e, "SMA window skipped");
            }
        }
    }

    match tickwatch_indicators::macd(&closes, slow, fast) {
        Ok(out) => {
            let last = closes.len() - 1;
            println!("  EMA({slow}) / EMA({fast}): {:.4} / {:.4}", out.ema_slow[last], out.ema_fast[last]);
            println!("  MACD:            {:.4}", out.macd[last]);
        }
        Err(e) => {
            tracing::warn!(error = %e, "MACD skipped");
        }
    }
    println!("{sep}\n");

    Ok(())
}
