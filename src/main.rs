use anyhow::{Context, Result};
use charts::{BoxplotOptions, boxplot_returns, write_svg};
use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::{OutputSettings, RunConfig, SamplingFrequency, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use rolling::{BustSummaryRow, RollingEngine, RollingReport, RunPlan};
use std::path::PathBuf;
use std::process::ExitCode;
use storage::{CsvRepository, RunOutputs, load_observations};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, FmtSubscriber, fmt};

/// The main entry point for the levwin application.
fn main() -> ExitCode {
    // A missing .env file is fine; it only carries optional overrides.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => handle_run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Rolling-window analysis of daily-rebalanced leveraged positions.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate every window of a price history at each leverage and write the result tables.
    Run(RunArgs),
}

/// Every flag overrides the matching value from the config file and environment.
#[derive(Parser)]
struct RunArgs {
    /// Path to the price CSV.
    csv: Option<PathBuf>,

    /// A TOML file with run settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of holding periods per window.
    #[arg(long)]
    window: Option<usize>,

    /// Leverage multipliers to simulate (e.g. `--leverage 1 2 3`).
    #[arg(long, num_args = 1.., allow_negative_numbers = true)]
    leverage: Vec<f64>,

    /// Name of the date/label column.
    #[arg(long)]
    datecol: Option<String>,

    /// Name of the price column.
    #[arg(long)]
    pricecol: Option<String>,

    /// Name of the dividend column; adds the `1x_dividend` column.
    #[arg(long)]
    dividendcol: Option<String>,

    /// Sampling frequency of the input, used for annualization.
    #[arg(long, value_enum)]
    freq: Option<SamplingFrequency>,

    /// Output directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Add the unleveraged underlying return column.
    #[arg(long)]
    underlying: bool,

    /// Compute and write the summary statistics table.
    #[arg(long)]
    summary: bool,

    /// Render boxplots of the return distributions.
    #[arg(long)]
    plot: bool,

    /// Also write the log to `levwin.log` in the output directory.
    #[arg(long)]
    log_file: bool,
}

impl RunArgs {
    fn apply(self, config: &mut RunConfig) {
        if let Some(csv) = self.csv {
            config.data.path = Some(csv);
        }
        if let Some(window) = self.window {
            config.window.size = window;
        }
        if !self.leverage.is_empty() {
            config.leverage = self.leverage;
        }
        if let Some(column) = self.datecol {
            config.data.date_column = column;
        }
        if let Some(column) = self.pricecol {
            config.data.price_column = column;
        }
        if let Some(column) = self.dividendcol {
            config.data.dividend_column = Some(column);
        }
        if let Some(freq) = self.freq {
            config.window.frequency = freq;
        }
        if let Some(out) = self.out {
            config.output.dir = out;
        }
        config.metrics.underlying |= self.underlying;
        config.metrics.summary |= self.summary;
        config.output.plot |= self.plot;
        config.output.log_file |= self.log_file;
    }
}

// ==============================================================================
// Run Command Logic
// ==============================================================================

/// Handles the orchestration of a rolling-window run.
fn handle_run(args: RunArgs) -> Result<()> {
    let mut config =
        load_config(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);

    let _log_guard = init_tracing(&config.output)?;

    let plan = RunPlan::from_config(&config).context("Invalid run configuration")?;
    let csv_path = config
        .data
        .path
        .clone()
        .context("No input CSV given (pass a path or set data.path)")?;
    let series = load_observations(&csv_path, &config.data)
        .with_context(|| format!("Failed to load {}", csv_path.display()))?;
    tracing::info!(
        observations = series.len(),
        dividends = series.has_dividends(),
        "Loaded price history"
    );

    let engine = RollingEngine::new(plan)?;

    let progress_bar = ProgressBar::new(0);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    let report = engine.run_with_progress(&series, &progress_bar)?;
    progress_bar.finish_with_message("Run complete!");

    let outputs = RunOutputs::new(&config.output.dir, engine.plan().leverages());
    let repository = CsvRepository::new(outputs)?;
    let mut written = repository.save_report(&report)?;
    if config.output.plot {
        written.extend(render_plots(&report, repository.outputs())?);
    }

    print_bust_summary(&report.bust_summary);
    if let Some(summary) = &report.summary {
        print_summary(summary);
    }
    println!("Windows evaluated: {}", report.window_count);
    for path in &written {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// Installs the global subscriber. The returned guard must live until the run ends so that
/// buffered file output is flushed.
fn init_tracing(output: &OutputSettings) -> Result<Option<WorkerGuard>> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if !output.log_file {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(None);
    }

    std::fs::create_dir_all(&output.dir)
        .with_context(|| format!("Failed to create {}", output.dir.display()))?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&output.dir, "levwin.log"));

    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()?;

    Ok(Some(guard))
}

/// Draws the three distribution plots: total returns, total returns on a log scale, and
/// annualized returns.
fn render_plots(report: &RollingReport, outputs: &RunOutputs) -> Result<Vec<PathBuf>> {
    let columns = &report.returns.columns;
    let plots = [
        (
            "returns",
            &report.returns,
            BoxplotOptions::default().hide_fliers(),
        ),
        (
            "returns_log",
            &report.returns,
            BoxplotOptions::default().log_scale(),
        ),
        (
            "returns_annualized",
            &report.annualized_returns,
            BoxplotOptions::default()
                .hide_fliers()
                .with_y_label("annualized return"),
        ),
    ];

    let mut paths = Vec::with_capacity(plots.len());
    for (name, table, options) in plots {
        let svg = boxplot_returns(table, columns, &options)?;
        let path = outputs.path(name, "svg");
        write_svg(&path, &svg)?;
        paths.push(path);
    }
    Ok(paths)
}

fn print_bust_summary(rows: &[BustSummaryRow]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Leverage", "Bust Ratio"]);
    for row in rows {
        table.add_row(vec![
            format!("{}x", row.leverage),
            format!("{:.2}%", row.bust_ratio * 100.0),
        ]);
    }
    println!("{table}");
}

fn print_summary(rows: &[analytics::SummaryStatistics]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Portfolio",
        "Mean Return",
        "IQR",
        "Mean CAGR",
        "Std CAGR",
        "Bust Ratio",
        "Avg Sharpe",
        "Min Return",
        "Max Return",
    ]);
    for row in rows {
        table.add_row(vec![
            row.portfolio.clone(),
            format!("{:.4}", row.mean_total_return),
            format!("{:.4}", row.iqr_total_return),
            format!("{:.4}", row.mean_cagr),
            format!("{:.4}", row.std_cagr),
            format!("{:.2}%", row.bust_ratio * 100.0),
            format!("{:.3}", row.avg_sharpe),
            format!("{:.4}", row.min_total_return),
            format!("{:.4}", row.max_total_return),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Run(args) => args,
        }
    }

    #[test]
    fn flags_override_the_configuration() {
        let args = parse(&[
            "levwin", "run", "prices.csv", "--window", "12", "--leverage", "1", "-1", "2.5",
            "--freq", "day", "--dividendcol", "div", "--underlying",
        ]);
        let mut config = RunConfig::default();
        args.apply(&mut config);

        assert_eq!(config.data.path, Some(PathBuf::from("prices.csv")));
        assert_eq!(config.window.size, 12);
        assert_eq!(config.leverage, vec![1.0, -1.0, 2.5]);
        assert_eq!(config.window.frequency, SamplingFrequency::Day);
        assert_eq!(config.data.dividend_column.as_deref(), Some("div"));
        assert!(config.metrics.underlying);
        assert!(!config.metrics.summary);
    }

    #[test]
    fn absent_flags_keep_configured_values() {
        let args = parse(&["levwin", "run"]);
        let mut config = RunConfig::default();
        config.window.size = 36;
        config.metrics.summary = true;
        args.apply(&mut config);

        assert_eq!(config.window.size, 36);
        assert_eq!(config.leverage, vec![1.0, 2.0]);
        assert!(config.metrics.summary);
        assert!(config.data.path.is_none());
    }
}
