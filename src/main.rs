mod cli;
mod display;

use anyhow::Context;
use chrono::Datelike;
use clap::Parser;
use cli::{Cli, Commands, HistoryArgs, RecommendArgs};
use cropwise::config::Config;
use cropwise::datasources::OpenWeatherMapClient;
use cropwise::db::Database;
use cropwise::logic::season::month_from_number;
use cropwise::models::{
    Feedback, FeatureInput, HistoryEntry, RecommendationReport, WeatherSnapshot,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let Cli {
        command,
        config,
        data_dir,
        verbose,
    } = Cli::parse();

    init_logging(verbose);

    match command {
        Commands::Recommend(args) => recommend(args, config, data_dir).await,
        Commands::Crops { yaml } => list_crops(config, yaml),
        Commands::History(args) => history(data_dir, args),
        Commands::Init => {
            Config::setup_interactive().context("Setup failed")?;
            Ok(())
        }
        Commands::Check => check(config, data_dir).await,
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("cropwise=debug"),
        _ => EnvFilter::new("cropwise=trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn recommend(
    args: RecommendArgs,
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    if let Some(policy) = args.policy {
        config.engine.scoring_policy = policy;
    }

    let knowledge = Arc::new(
        config
            .knowledge_base()
            .context("Failed to load knowledge base")?,
    );
    let engine = config.build_engine(knowledge)?;

    let file_input = match &args.input {
        Some(path) => FeatureInput::load(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => FeatureInput::default(),
    };

    let weather = fetch_weather(&config, &args).await;
    let weather_input = weather
        .as_ref()
        .map(WeatherSnapshot::as_feature_input)
        .unwrap_or_default();

    // Flags, then file, then live weather, then farm defaults
    let features = args
        .as_feature_input()
        .or(file_input)
        .or(weather_input)
        .or(config.farm.as_feature_input())
        .resolve()
        .context("Invalid field conditions")?;

    let month_number = args.month.unwrap_or_else(|| chrono::Local::now().month());
    let month = month_from_number(month_number)
        .with_context(|| format!("Invalid month {}", month_number))?;

    let report = engine.recommend(&features, month)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display::print_report(&report, weather.as_ref());
    }

    if config.history.enabled && !args.no_save {
        // History is best effort; the recommendation has already been shown
        if let Err(e) = save_history(&report, data_dir.as_ref()) {
            tracing::warn!(error = %e, "Failed to save recommendation history");
        }
    }

    Ok(())
}

/// Live conditions for explicit coordinates, or the configured location.
/// Any failure degrades to the remaining inputs.
async fn fetch_weather(config: &Config, args: &RecommendArgs) -> Option<WeatherSnapshot> {
    let owm = config.openweathermap.as_ref();

    let client = match (args.coordinates(), owm) {
        (Some((lat, lon)), Some(owm)) if !owm.api_key.is_empty() => {
            OpenWeatherMapClient::at(owm, lat, lon)
        }
        (Some(_), _) => {
            tracing::warn!("Coordinates given but no OpenWeatherMap API key is configured");
            return None;
        }
        (None, Some(owm)) if owm.enabled && !owm.api_key.is_empty() => {
            OpenWeatherMapClient::new(owm.clone())
        }
        (None, _) => return None,
    };

    match client.fetch_current().await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!(error = %e, "Weather lookup failed, continuing without it");
            None
        }
    }
}

fn save_history(report: &RecommendationReport, data_dir: Option<&PathBuf>) -> anyhow::Result<i64> {
    let db = Database::open(&Config::db_path(data_dir)?)?;
    let id = db.save_run(&HistoryEntry::from_report(report))?;
    tracing::info!(id, top_crop = ?report.top().map(|r| &r.crop), "Saved recommendation run");
    Ok(id)
}

fn list_crops(config_path: Option<PathBuf>, yaml: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let knowledge = config
        .knowledge_base()
        .context("Failed to load knowledge base")?;

    if yaml {
        print!("{}", knowledge.to_yaml()?);
    } else {
        display::print_crops(&knowledge);
    }
    Ok(())
}

fn history(data_dir: Option<PathBuf>, args: HistoryArgs) -> anyhow::Result<()> {
    let db = Database::open(&Config::db_path(data_dir.as_ref())?)
        .context("Failed to open history database")?;

    if let Some(id) = args.delete {
        db.delete_run(id)?;
        println!("Deleted run #{}", id);
        return Ok(());
    }

    if let Some(id) = args.feedback {
        let feedback = Feedback::new(id, args.helpful, args.notes);
        db.save_feedback(&feedback)
            .with_context(|| format!("Failed to save feedback for run #{}", id))?;
        tracing::info!(run_id = id, helpful = feedback.helpful, "Saved feedback");
        println!("Thanks, feedback recorded for run #{}", id);
        return Ok(());
    }

    if let Some(id) = args.show {
        let entry = db
            .get_run(id)?
            .with_context(|| format!("No saved run with id {}", id))?;
        display::print_history_entry(&entry, &db.feedback_for(id)?);
        return Ok(());
    }

    display::print_history(&db.recent_runs(args.limit)?);
    Ok(())
}

async fn check(config_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    println!("Checking configuration...");
    println!();

    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    println!("  ✓ Config loaded");

    let knowledge = Arc::new(
        config
            .knowledge_base()
            .context("Failed to load knowledge base")?,
    );
    println!("  ✓ Knowledge base: {} crops", knowledge.len());

    let engine = config.build_engine(knowledge)?;
    println!(
        "  ✓ Engine: {} scoring, {} risk",
        engine.scoring_policy().id(),
        engine.risk_policy().id()
    );
    if let Some(market) = engine.market() {
        println!("  ✓ Market prices: {} crops", market.prices.len());
    }

    match &config.openweathermap {
        Some(owm) if owm.enabled => {
            let client = OpenWeatherMapClient::new(owm.clone());
            match client.test_connection().await {
                Ok(true) => println!("  ✓ OpenWeatherMap: connected"),
                Ok(false) => println!("  ✗ OpenWeatherMap: request rejected (check API key)"),
                Err(e) => println!("  ✗ OpenWeatherMap: {}", e),
            }
        }
        _ => println!("  - OpenWeatherMap: not configured"),
    }

    let db = Database::open(&Config::db_path(data_dir.as_ref())?)
        .context("Failed to open history database")?;
    println!(
        "  ✓ History: {} ({} runs)",
        db.path().display(),
        db.count_runs()?
    );

    Ok(())
}
