use clap::{ArgGroup, Args, Parser, Subcommand};
use cropwise::logic::ScoringPolicyKind;
use cropwise::models::{FarmingMethod, FeatureInput, IrrigationType};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cropwise",
    version,
    about = "Crop suitability recommendations from soil, weather and farming practice"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank crops for the given field conditions
    Recommend(RecommendArgs),
    /// List the crops in the knowledge base
    Crops {
        /// Dump the full crop table as YAML
        #[arg(long)]
        yaml: bool,
    },
    /// Show or manage saved recommendation runs
    History(HistoryArgs),
    /// Re-run interactive setup
    Init,
    /// Validate config, knowledge base and data sources
    Check,
}

#[derive(Args)]
#[command(group(ArgGroup::new("verdict").args(["helpful", "not_helpful"])))]
pub struct HistoryArgs {
    /// Number of runs to list
    #[arg(short, long, default_value_t = cropwise::db::DEFAULT_HISTORY_LIMIT)]
    pub limit: usize,

    /// Show one run in full
    #[arg(long, conflicts_with_all = ["delete", "feedback"])]
    pub show: Option<i64>,

    /// Delete one run
    #[arg(long, conflicts_with = "feedback")]
    pub delete: Option<i64>,

    /// Leave feedback on a run; needs --helpful or --not-helpful
    #[arg(long, requires = "verdict")]
    pub feedback: Option<i64>,

    /// The run's advice worked out
    #[arg(long, requires = "feedback")]
    pub helpful: bool,

    /// The run's advice did not work out
    #[arg(long, requires = "feedback")]
    pub not_helpful: bool,

    /// Free-text note stored with the feedback
    #[arg(long, requires = "feedback")]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct RecommendArgs {
    /// Air temperature in °C
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Relative humidity in percent
    #[arg(long)]
    pub humidity: Option<f64>,

    /// Rainfall in mm
    #[arg(long)]
    pub rainfall: Option<f64>,

    /// Soil pH
    #[arg(long)]
    pub ph: Option<f64>,

    /// Available nitrogen, kg/ha
    #[arg(short = 'N', long = "nitrogen")]
    pub nitrogen: Option<f64>,

    /// Available phosphorus, kg/ha
    #[arg(short = 'P', long = "phosphorus")]
    pub phosphorus: Option<f64>,

    /// Available potassium, kg/ha
    #[arg(short = 'K', long = "potassium")]
    pub potassium: Option<f64>,

    /// Organic carbon in percent
    #[arg(long)]
    pub organic_carbon: Option<f64>,

    /// Soil type, e.g. Loamy, Clayey, Black
    #[arg(long)]
    pub soil_type: Option<String>,

    /// Farm area in hectares
    #[arg(long)]
    pub area: Option<f64>,

    /// organic, conventional or mixed
    #[arg(long, value_parser = parse_farming_method)]
    pub farming_method: Option<FarmingMethod>,

    /// rainfed, irrigated, drip or sprinkler
    #[arg(long, value_parser = parse_irrigation)]
    pub irrigation: Option<IrrigationType>,

    /// Years of farming experience
    #[arg(long)]
    pub experience: Option<u32>,

    /// YAML or JSON file with field conditions; flags override its values
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Sowing month (1-12), defaults to the current month
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Latitude for a live weather lookup
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude for a live weather lookup
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Override the configured scoring policy
    #[arg(long, value_parser = parse_policy)]
    pub policy: Option<ScoringPolicyKind>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not record this run in history
    #[arg(long)]
    pub no_save: bool,
}

impl RecommendArgs {
    /// Values given directly on the command line.
    pub fn as_feature_input(&self) -> FeatureInput {
        FeatureInput {
            temperature: self.temperature,
            humidity: self.humidity,
            rainfall: self.rainfall,
            ph: self.ph,
            nitrogen: self.nitrogen,
            phosphorus: self.phosphorus,
            potassium: self.potassium,
            organic_carbon: self.organic_carbon,
            soil_type: self.soil_type.clone(),
            area_ha: self.area,
            farming_method: self.farming_method,
            irrigation_type: self.irrigation,
            experience_years: self.experience,
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}

fn parse_farming_method(s: &str) -> Result<FarmingMethod, String> {
    FarmingMethod::from_str(s)
        .ok_or_else(|| format!("unknown farming method '{}' (organic, conventional, mixed)", s))
}

fn parse_irrigation(s: &str) -> Result<IrrigationType, String> {
    IrrigationType::from_str(s).ok_or_else(|| {
        format!(
            "unknown irrigation type '{}' (rainfed, irrigated, drip, sprinkler)",
            s
        )
    })
}

fn parse_policy(s: &str) -> Result<ScoringPolicyKind, String> {
    ScoringPolicyKind::from_str(s).ok_or_else(|| {
        format!(
            "unknown scoring policy '{}' (requirement_ratio, preference_range)",
            s
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_recommend_flags() {
        let cli = Cli::try_parse_from([
            "cropwise",
            "recommend",
            "--temperature",
            "28",
            "-N",
            "45",
            "--soil-type",
            "Loamy",
            "--irrigation",
            "drip",
            "--month",
            "7",
            "--lat",
            "-12.5",
            "--lon",
            "79.1",
            "--no-save",
        ])
        .unwrap();

        let Commands::Recommend(args) = cli.command else {
            panic!("expected recommend");
        };
        let input = args.as_feature_input();
        assert_eq!(input.temperature, Some(28.0));
        assert_eq!(input.nitrogen, Some(45.0));
        assert_eq!(input.irrigation_type, Some(IrrigationType::Drip));
        assert_eq!(input.rainfall, None);
        assert_eq!(args.month, Some(7));
        assert_eq!(args.coordinates(), Some((-12.5, 79.1)));
        assert!(args.no_save);
        assert!(!args.json);
    }

    #[test]
    fn rejects_bad_month_and_lone_latitude() {
        assert!(Cli::try_parse_from(["cropwise", "recommend", "--month", "13"]).is_err());
        assert!(Cli::try_parse_from(["cropwise", "recommend", "--lat", "20.0"]).is_err());
        assert!(
            Cli::try_parse_from(["cropwise", "recommend", "--farming-method", "hydro"]).is_err()
        );
    }

    #[test]
    fn history_defaults() {
        let cli = Cli::try_parse_from(["cropwise", "history"]).unwrap();
        let Commands::History(args) = cli.command else {
            panic!("expected history");
        };
        assert_eq!(args.limit, 20);
        assert!(args.show.is_none());
        assert!(args.delete.is_none());
        assert!(args.feedback.is_none());
    }

    #[test]
    fn parses_feedback() {
        let cli = Cli::try_parse_from([
            "cropwise",
            "history",
            "--feedback",
            "3",
            "--not-helpful",
            "--notes",
            "too dry for rice",
        ])
        .unwrap();
        let Commands::History(args) = cli.command else {
            panic!("expected history");
        };
        assert_eq!(args.feedback, Some(3));
        assert!(args.not_helpful);
        assert!(!args.helpful);
        assert_eq!(args.notes.as_deref(), Some("too dry for rice"));
    }

    #[test]
    fn feedback_needs_exactly_one_verdict() {
        assert!(Cli::try_parse_from(["cropwise", "history", "--feedback", "3"]).is_err());
        assert!(Cli::try_parse_from([
            "cropwise",
            "history",
            "--feedback",
            "3",
            "--helpful",
            "--not-helpful"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["cropwise", "history", "--helpful"]).is_err());
    }
}
