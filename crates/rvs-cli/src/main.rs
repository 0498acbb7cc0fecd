use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rvs_core::LocationSet;
use rvs_sentiment::{Lexicon, LexiconScorer, SentimentScorer};
use rvs_store::{QueryEngine, ReviewQuery, ReviewStore, ScoredReview};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rvs-cli")]
#[command(about = "Score review text and rank review data offline")]
struct Cli {
    /// Polarity lexicon to use instead of the built-in one.
    #[arg(long, global = true)]
    lexicon: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the sentiment profile of a text as JSON.
    Score {
        /// Text to score; multiple words are joined with spaces.
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Rank reviews from a CSV seed file exactly as the server would.
    Query {
        /// Seed file; defaults to `RVS_DATA_PATH`.
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        location: Option<String>,
        /// `YYYY-MM-DD`; malformed values are ignored.
        #[arg(long)]
        start_date: Option<String>,
        /// `YYYY-MM-DD`, compared as midnight; malformed values are ignored.
        #[arg(long)]
        end_date: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = rvs_core::load_offline_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let scorer = load_scorer(cli.lexicon.as_deref().or(config.lexicon_path.as_deref()))?;

    match cli.command {
        Commands::Score { text } => {
            let profile = scorer.score(&text.join(" "));
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Commands::Query {
            data,
            location,
            start_date,
            end_date,
        } => {
            let data = data.unwrap_or_else(|| config.data_path.clone());
            let query = ReviewQuery::from_params(
                location.as_deref(),
                start_date.as_deref(),
                end_date.as_deref(),
            );
            let results = run_query(&data, config.allowed_locations.clone(), scorer, &query)?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}

fn load_scorer(lexicon: Option<&Path>) -> anyhow::Result<Arc<dyn SentimentScorer>> {
    let lexicon = match lexicon {
        Some(path) => Arc::new(Lexicon::from_path(path)?),
        None => Lexicon::builtin(),
    };
    Ok(Arc::new(LexiconScorer::new(lexicon)))
}

fn run_query(
    data: &Path,
    locations: LocationSet,
    scorer: Arc<dyn SentimentScorer>,
    query: &ReviewQuery,
) -> anyhow::Result<Vec<ScoredReview>> {
    let store = Arc::new(ReviewStore::new(locations));
    store.load_initial(rvs_store::load_reviews_csv(data)?)?;
    let results = QueryEngine::new(store, scorer).filter(query);
    tracing::debug!(results = results.len(), "query finished");
    Ok(results)
}
