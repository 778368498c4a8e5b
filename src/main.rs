use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use summerfinder::api::AppState;
use summerfinder::campgrounds::{DEFAULT_CAMPGROUNDS_FILE, load_campgrounds, save_campgrounds};
use summerfinder::config::{DEFAULT_CONFIG_FILE, HomeConfig, RetryMode, Settings};
use summerfinder::convert::{self, ElevationClient, Labels, TakeoutImporter};
use summerfinder::finder::{ConsoleSink, SummerDayFinder};
use summerfinder::models::SearchParameters;
use summerfinder::models::summer_day::{
    DEFAULT_MAX_HIGH_TEMP, DEFAULT_MAX_MILES, DEFAULT_MIN_HIGH_TEMP,
};
use summerfinder::notify::{Notifier, best_result_message};
use summerfinder::{WeatherClient, telemetry, web};

const RESULTS_FILE: &str = "sorted_summer_days.json";
const DEFAULT_LABELS_FILE: &str = "labels.json";

/// Find upcoming summer-like weekends at campgrounds near home.
#[derive(Parser, Debug)]
#[command(name = "summerfinder", version, about)]
struct Cli {
    /// Settings file (TOML). Defaults to ./summerfinder.toml when present
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the campground list and print progress to the console
    Search(SearchArgs),
    /// Run the HTTP front end
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Build or export the campground list
    #[command(subcommand)]
    Convert(ConvertCommand),
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Input file containing the list of campgrounds
    #[arg(long = "input_file", default_value = DEFAULT_CAMPGROUNDS_FILE)]
    input_file: PathBuf,

    /// Config file containing phone, home_lat and home_long values
    #[arg(long = "config_file", default_value = DEFAULT_CONFIG_FILE)]
    config_file: PathBuf,

    /// Maximum distance from home in miles
    #[arg(long = "max_miles", default_value_t = DEFAULT_MAX_MILES)]
    max_miles: f64,

    /// Minimum high temperature for a nice summer day (Fahrenheit)
    #[arg(long = "min_high_temp", default_value_t = DEFAULT_MIN_HIGH_TEMP)]
    min_high_temp: f64,

    /// Maximum high temperature for a nice summer day (Fahrenheit)
    #[arg(long = "max_high_temp", default_value_t = DEFAULT_MAX_HIGH_TEMP)]
    max_high_temp: f64,

    /// Prefer waterfront campgrounds in results
    #[arg(long = "prefer_waterfront")]
    prefer_waterfront: bool,

    /// Include all days of the week, not just weekends
    #[arg(long = "all_days")]
    all_days: bool,

    /// Weather retry policy: fail_fast, backoff or until_success
    #[arg(long)]
    retry: Option<RetryMode>,
}

impl SearchArgs {
    fn parameters(&self) -> SearchParameters {
        SearchParameters {
            max_miles: self.max_miles,
            min_high_temp: self.min_high_temp,
            max_high_temp: self.max_high_temp,
            prefer_waterfront: self.prefer_waterfront,
            weekends_only: !self.all_days,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ConvertCommand {
    /// Export a map-friendly CSV with elevation in feet and a temperature offset
    Csv { input: PathBuf, output: PathBuf },
    /// Export a KML document
    Kml { input: PathBuf, output: PathBuf },
    /// Move links out of notes and drop import indexes
    Clean { input: PathBuf, output: PathBuf },
    /// Add or update elevations (meters) from the elevation service
    Elevation { input: PathBuf, output: PathBuf },
    /// Print a campground record for a Google Maps place URL
    PlaceUrl { url: String },
    /// Build a location-to-name label map from a GeoJSON export
    Labels {
        geojson: PathBuf,
        /// Write here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import a Google Takeout saved-places CSV
    Takeout {
        csv: PathBuf,
        /// Label map produced by `convert labels`
        #[arg(long, default_value = DEFAULT_LABELS_FILE)]
        labels: PathBuf,
        /// First row to import
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// Row to stop before (defaults to the end)
        #[arg(long)]
        stop: Option<usize>,
        /// Write here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_from_path(cli.settings).context("Failed to load settings")?;
    telemetry::init(&settings.logging);

    match cli.command {
        Command::Search(args) => search(settings, args).await,
        Command::Serve { port } => {
            let port = port.unwrap_or(settings.server.port);
            let state = AppState::new(settings)?;
            web::run(state, port).await?;
            Ok(())
        }
        Command::Convert(command) => run_convert(&settings, command).await,
    }
}

async fn search(settings: Settings, args: SearchArgs) -> Result<()> {
    let config = HomeConfig::load(&args.config_file)?;
    let home = config.home();
    let phone = config.phone();

    match &home {
        Some(home) => println!(
            "Considering campgrounds within {:?} miles of home {home}.",
            args.max_miles
        ),
        None => {
            println!("Warning: No home location provided. All campgrounds will be considered.")
        }
    }
    match phone {
        Some(phone) => println!("The best option, if found, will be sent via SMS to {phone}."),
        None => println!("No phone number provided.  SMS message will not be sent."),
    }

    let campgrounds = load_campgrounds(&args.input_file)?;

    let mut weather_settings = settings.weather.clone();
    if let Some(retry) = args.retry {
        weather_settings.retry = retry;
    }
    let finder = SummerDayFinder::new(WeatherClient::new(&weather_settings)?);

    let summer_days = finder
        .search(&campgrounds, &args.parameters(), home.as_ref(), &mut ConsoleSink)
        .await;

    let Some(best) = summer_days.first() else {
        println!("No summer days found :(");
        return Ok(());
    };

    let json = serde_json::to_string_pretty(&summer_days)?;
    fs::write(RESULTS_FILE, json).with_context(|| format!("Failed to write {RESULTS_FILE}"))?;
    info!("Wrote {} summer days to {}", summer_days.len(), RESULTS_FILE);

    if let Some(phone) = phone {
        let notifier = Notifier::new(&settings.notifier)?;
        let result = notifier.notify(phone, &best_result_message(best)?).await;
        println!("{}", serde_json::to_string(&result)?);
    }

    Ok(())
}

async fn run_convert(settings: &Settings, command: ConvertCommand) -> Result<()> {
    match command {
        ConvertCommand::Csv { input, output } => {
            let campgrounds = load_campgrounds(&input)?;
            let file = fs::File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            convert::write_csv(file, &campgrounds)?;
        }
        ConvertCommand::Kml { input, output } => {
            let campgrounds = load_campgrounds(&input)?;
            fs::write(&output, convert::to_kml(&campgrounds)?)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
        ConvertCommand::Clean { input, output } => {
            let mut campgrounds = load_campgrounds(&input)?;
            convert::clean_campgrounds(&mut campgrounds);
            save_campgrounds(&output, &campgrounds)?;
        }
        ConvertCommand::Elevation { input, output } => {
            let mut campgrounds = load_campgrounds(&input)?;
            let client = ElevationClient::new(&settings.elevation)?;
            convert::add_elevations(&client, &mut campgrounds).await?;
            save_campgrounds(&output, &campgrounds)?;
        }
        ConvertCommand::PlaceUrl { url } => {
            let client = ElevationClient::new(&settings.elevation)?;
            let campground = convert::campground_from_place_url(&client, &url).await?;
            println!("{}", serde_json::to_string_pretty(&campground)?);
        }
        ConvertCommand::Labels { geojson, output } => {
            let text = fs::read_to_string(&geojson)
                .with_context(|| format!("Failed to read {}", geojson.display()))?;
            let labels = convert::labels_from_geojson(&text)?;
            emit_json(&labels, output.as_deref())?;
        }
        ConvertCommand::Takeout {
            csv,
            labels,
            start,
            stop,
            output,
        } => {
            let file = fs::File::open(&csv)
                .with_context(|| format!("Failed to open {}", csv.display()))?;
            let rows = convert::read_rows(file)?;
            let labels = load_labels(&labels)?;

            let importer = TakeoutImporter::new(&labels)?;
            let campgrounds = importer
                .import(&rows, start..stop.unwrap_or(rows.len()))
                .await;
            emit_json(&campgrounds, output.as_deref())?;
        }
    }
    Ok(())
}

fn load_labels(path: &Path) -> Result<Labels> {
    if !path.exists() {
        warn!("No labels file at {}, using Takeout titles", path.display());
        return Ok(Labels::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn emit_json<T: serde::Serialize + ?Sized>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_flags() {
        let cli = Cli::parse_from([
            "summerfinder",
            "search",
            "--max_miles",
            "150",
            "--all_days",
            "--prefer_waterfront",
            "--retry",
            "until_success",
        ]);

        let Command::Search(args) = cli.command else {
            panic!("expected search command");
        };
        let params = args.parameters();
        assert_eq!(params.max_miles, 150.0);
        assert_eq!(params.min_high_temp, DEFAULT_MIN_HIGH_TEMP);
        assert!(!params.weekends_only);
        assert!(params.prefer_waterfront);
        assert_eq!(args.retry, Some(RetryMode::UntilSuccess));
        assert_eq!(args.input_file, PathBuf::from(DEFAULT_CAMPGROUNDS_FILE));
    }

    #[test]
    fn test_search_defaults_to_weekends() {
        let cli = Cli::parse_from(["summerfinder", "search"]);
        let Command::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert!(args.parameters().weekends_only);
        assert_eq!(args.max_miles, DEFAULT_MAX_MILES);
    }

    #[test]
    fn test_takeout_flags() {
        let cli = Cli::parse_from([
            "summerfinder",
            "convert",
            "takeout",
            "Saved.csv",
            "--start",
            "3",
            "--stop",
            "4",
        ]);
        let Command::Convert(ConvertCommand::Takeout {
            start, stop, labels, ..
        }) = cli.command
        else {
            panic!("expected takeout command");
        };
        assert_eq!(start, 3);
        assert_eq!(stop, Some(4));
        assert_eq!(labels, PathBuf::from(DEFAULT_LABELS_FILE));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
