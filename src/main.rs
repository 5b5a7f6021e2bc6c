//! text-dedup CLI - preprocessing and near-duplicate detection over a words-set corpus

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use text_dedup_vectorizer::{Config, DedupService, QueryInput, RawTable, Result};

#[derive(Parser, Debug)]
#[command(name = "text-dedup")]
#[command(version)]
#[command(about = "Normalize Chinese/Latin texts and detect near-duplicates", long_about = None)]
struct Args {
    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the stop word list
    #[arg(long, global = true)]
    stop_words: Option<PathBuf>,

    /// Override the words-set corpus CSV
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// Override the raw question CSV
    #[arg(long, global = true)]
    raw_data: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the token set of one text
    Preprocess { text: String },

    /// Preprocess the raw question CSV into a words-set CSV
    BuildWordsSet {
        /// raw question CSV (defaults to resources.raw_data)
        #[arg(long)]
        input: Option<PathBuf>,
        /// words-set CSV to write (defaults to resources.corpus)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Report every pair of corpus entries above the threshold
    Scan {
        #[arg(long)]
        threshold: Option<f64>,
        /// look up question IDs in the raw question CSV
        #[arg(long)]
        resolve_ids: bool,
    },

    /// Accept or reject one text against the corpus
    Check {
        text: String,
        /// treat TEXT as space-joined tokens
        #[arg(long)]
        tokens: bool,
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Most similar corpus entries, `score<TAB>text` per line
    Similar {
        text: String,
        #[arg(long)]
        tokens: bool,
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// Terms weighing more than the threshold in any corpus entry
    Keywords {
        #[arg(long)]
        threshold: Option<f64>,
    },
}

fn main() {
    let args = Args::parse();

    // Initialize logging (stderr, stdout carries results)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("text_dedup_vectorizer={0},text_dedup={0}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        eprintln!("{}", json!(e.report()));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::load_or_default(args.config.as_deref())?;

    // Apply CLI overrides
    if let Some(path) = args.stop_words {
        config.resources.stop_words = path;
    }
    if let Some(path) = args.corpus {
        config.resources.corpus = path;
    }
    if let Some(path) = args.raw_data {
        config.resources.raw_data = path;
    }
    match &args.command {
        Command::Scan { threshold: Some(t), .. } | Command::Check { threshold: Some(t), .. } => {
            config.similarity.threshold = *t;
        }
        Command::Similar { top_n: Some(n), .. } => config.similarity.top_n = *n,
        Command::Keywords { threshold: Some(t) } => config.similarity.keyword_threshold = *t,
        _ => {}
    }
    config.validate()?;

    let service = DedupService::from_config(config)?;
    let config = service.config();

    match args.command {
        Command::Preprocess { text } => {
            println!("{}", serde_json::to_string(&service.preprocess(&text)?)?);
        }
        Command::BuildWordsSet { input, output } => {
            let input = input.unwrap_or_else(|| config.resources.raw_data.clone());
            let output = output.unwrap_or_else(|| config.resources.corpus.clone());
            let corpus = service.build_words_set(&input, &output)?;
            println!(
                "{}",
                json!({ "rows": corpus.len(), "output": output.display().to_string() })
            );
        }
        Command::Scan { resolve_ids, .. } => {
            let corpus = service.load_corpus()?;
            let raw = if resolve_ids {
                Some(RawTable::load_csv(&config.resources.raw_data, &config.columns)?)
            } else {
                None
            };
            let reports = service.scan(&corpus, raw.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Command::Check { text, tokens, .. } => {
            let corpus = service.load_corpus()?;
            let verdict = service.check(&corpus, &QueryInput::new(text, tokens))?;
            println!("{}", serde_json::to_string(&verdict)?);
        }
        Command::Similar { text, tokens, .. } => {
            let corpus = service.load_corpus()?;
            let hits = service.similar(&corpus, &QueryInput::new(text, tokens), config.similarity.top_n)?;
            print!("{}", hits);
        }
        Command::Keywords { .. } => {
            let corpus = service.load_corpus()?;
            let keywords = service.keywords(&corpus, config.similarity.keyword_threshold)?;
            println!("{}", json!({ "keywords": keywords }));
        }
    }
    Ok(())
}
