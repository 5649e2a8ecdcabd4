use anyhow::Context;
use astrolumina::config::{Config, CONFIG_ENV};
use astrolumina::pdf::{PdfExporter, PdfTheme};
use astrolumina::server::{self, AppState};
use astrolumina::{AstroApiClient, BirthInput, GeoDataset, GeoSelector, ReadingSession};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "astrolumina", about = "Birth chart planet positions")]
struct Cli {
    /// TOML config file
    #[arg(long, env = CONFIG_ENV, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch planet positions for a birth date, time and place
    Reading {
        #[arg(long)]
        name: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// HH:MM, 24-hour
        #[arg(long, value_parser = parse_time)]
        time: NaiveTime,
        /// Country code, e.g. RO
        #[arg(long)]
        country: String,
        /// Subdivision code, e.g. CJ
        #[arg(long)]
        county: String,
        #[arg(long)]
        city: String,
        /// Also export the chart as PDF
        #[arg(long)]
        pdf: Option<PathBuf>,
        /// Also save the reading as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// List countries
    Countries,
    /// List subdivisions of a country
    Counties {
        #[arg(long)]
        country: String,
    },
    /// List cities of a subdivision
    Cities {
        #[arg(long)]
        country: String,
        #[arg(long)]
        county: String,
    },
    /// Serve the geo and reading API locally
    Serve {
        #[arg(long)]
        addr: Option<String>,
    },
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let dataset = match &config.geo.dataset {
        Some(path) => GeoDataset::from_path(path).context("Failed to load geo dataset")?,
        None => GeoDataset::bundled().context("Failed to load bundled geo dataset")?,
    };

    match cli.command {
        Command::Reading {
            name,
            date,
            time,
            country,
            county,
            city,
            pdf,
            json,
        } => {
            let input = BirthInput {
                full_name: name,
                birth_date: Some(date),
                birth_hour: Some(time),
                country,
                county,
                city,
            };
            run_reading(&config, &dataset, input, pdf, json).await?;
        }
        Command::Countries => {
            for option in dataset.countries() {
                println!("{}\t{}", option.code, option.label);
            }
        }
        Command::Counties { country } => {
            for option in dataset.subdivisions(&country) {
                println!("{}\t{}", option.code, option.label);
            }
        }
        Command::Cities { country, county } => {
            for city in dataset.cities(&country, &county) {
                println!("{}\t{:.5}\t{:.5}", city.name, city.latitude, city.longitude);
            }
        }
        Command::Serve { addr } => {
            let client = AstroApiClient::new(config.api.clone())?;
            let state = AppState {
                dataset: Arc::new(dataset),
                source: Arc::new(client),
            };
            let addr = addr.unwrap_or_else(|| config.server.addr.clone());
            server::serve(state, &addr).await?;
        }
    }

    Ok(())
}

async fn run_reading(
    config: &Config,
    dataset: &GeoDataset,
    input: BirthInput,
    pdf: Option<PathBuf>,
    json: Option<PathBuf>,
) -> anyhow::Result<()> {
    info!("✨ AstroLumina - Planet Positions");

    let mut selector = GeoSelector::new(dataset);
    selector.select_country(&input.country);
    selector.select_county(&input.county);
    selector.select_city(&input.city);

    let client = AstroApiClient::new(config.api.clone())?;
    let mut session = ReadingSession::new(client);
    let reading = session.submit(&input, selector.coordinates()).await?;

    println!("{}", reading.display.name);
    println!("{} at {}", reading.display.date, reading.display.time);
    println!("{}", reading.display.location);
    println!();
    print!("{}", reading.chart);

    if let Some(path) = json {
        let body = serde_json::to_string_pretty(reading)?;
        tokio::fs::write(&path, body).await?;
        info!("💾 Saved reading to {}", path.display());
    }

    if let Some(path) = pdf {
        let exporter = PdfExporter::new(
            PdfTheme::named(config.pdf.theme),
            config.pdf.fonts.clone(),
        );
        exporter
            .export(&reading.chart, &reading.display, &path)
            .context("Failed to export PDF")?;
    }

    Ok(())
}
