use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hitboard::dashboard::{CustomOptions, MoodView};
use hitboard::{Dashboard, DashboardConfig, DataSource, Field, Selection};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hitboard")]
#[command(about = "Build Billboard hit-analysis charts as Vega-Lite JSON", long_about = None)]
struct Args {
    /// Chart-entry CSV (defaults to the configured data_path)
    #[arg(long)]
    data: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Years to keep, comma separated (default: every offered year)
    #[arg(long, value_delimiter = ',')]
    years: Option<Vec<i32>>,

    /// Genres to keep, comma separated (default: every genre in the data)
    #[arg(long, value_delimiter = ',')]
    genres: Option<Vec<String>>,

    /// Minimum weeks on chart
    #[arg(long, default_value_t = 0)]
    min_weeks: u32,

    #[command(subcommand)]
    view: View,
}

#[derive(Subcommand, Debug)]
enum View {
    /// Print the selection options offered for the loaded data
    Options,
    /// Song count, average weeks on chart and genre proportions
    Overview,
    /// Proportion of happy songs
    Mood {
        #[arg(long, default_value = "year", value_parser = ["year", "genre"])]
        view: String,
    },
    /// Gender proportions and weeks-on-chart boxplot
    Gender,
    /// Scatter of two numeric columns
    Custom {
        #[arg(long, default_value = "peak_position")]
        x: String,
        #[arg(long, default_value = "weeks_on_chart")]
        y: String,
        #[arg(long, default_value = "mood_happy")]
        color: String,
        #[arg(long)]
        split_by_year: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => DashboardConfig::from_path(path).context("Failed to read configuration")?,
        None => DashboardConfig::default(),
    };
    let source = DataSource::new(args.data.clone().unwrap_or_else(|| config.data_path.clone()));
    let dataset = source
        .load()
        .with_context(|| {
            format!("Failed to load chart entries from {}", source.path().display())
        })?;

    let dashboard = Dashboard::new(dataset, &config);
    let domain = dashboard.domain();

    let mut selection = Selection::defaults(&domain);
    if let Some(years) = &args.years {
        selection.years = years.iter().copied().collect();
    }
    if let Some(genres) = &args.genres {
        selection.genres = genres.iter().cloned().collect();
    }
    selection.min_weeks = args.min_weeks;

    match &args.view {
        View::Options => emit(&domain),
        View::Overview => {
            emit(&dashboard.overview(&selection).context("Failed to build overview")?)
        }
        View::Mood { view } => {
            let view: MoodView = view.parse()?;
            emit(&dashboard.mood(&selection, view).context("Failed to build mood chart")?)
        }
        View::Gender => {
            emit(&dashboard.gender(&selection).context("Failed to build gender charts")?)
        }
        View::Custom {
            x,
            y,
            color,
            split_by_year,
        } => {
            let options = CustomOptions::new(
                x.parse::<Field>()?,
                y.parse::<Field>()?,
                color.parse::<Field>()?,
                *split_by_year,
            )?;
            emit(&dashboard.custom(&selection, &options).context("Failed to build custom chart")?)
        }
    }
}

/// Write a value as pretty JSON to stdout
fn emit<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value).context("Failed to serialize output")?;
    writeln!(handle).context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
