use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use resonance::config::Config;
use resonance::dataset::loader;
use resonance::dataset::models::Dataset;
use resonance::engagement::keywords::KeywordQuery;
use resonance::narration::narrator;
use resonance::narration::openai::OpenAiGenerator;
use resonance::narration::topic;
use resonance::output::terminal;

/// Resonance: keyword engagement analytics for social media posts.
///
/// Ranks posts by favorites per view and tests whether keywords are
/// associated with higher or lower engagement.
#[derive(Parser)]
#[command(name = "resonance", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank posts by engagement
    Rank {
        /// Posts file (.csv, .json, .jsonl)
        file: PathBuf,

        /// How many top posts to show (default: RESONANCE_TOP_N or 10)
        #[arg(long)]
        top: Option<usize>,

        /// Ask the text generator what drives engagement
        #[arg(long)]
        summarize: bool,

        /// Print the top posts as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Compare engagement of posts with and without each keyword
    Keywords {
        /// Posts file (.csv, .json, .jsonl)
        file: PathBuf,

        /// Comma-separated keywords (e.g. "rust, async, web3")
        #[arg(long, short)]
        keywords: String,

        /// Drop repeated keywords before testing
        #[arg(long)]
        dedupe: bool,

        /// False discovery rate for highlighting significant keywords
        #[arg(long, default_value = "0.05")]
        alpha: f64,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Ask the text generator to explain the results
        #[arg(long)]
        narrate: bool,
    },

    /// Write a new post about a topic in the style of the top posts
    Persona {
        /// Posts file (.csv, .json, .jsonl)
        file: PathBuf,

        /// Topic as free text, or an http(s) URL to read it from
        #[arg(long)]
        topic: String,

        /// How many top posts to use as examples
        #[arg(long)]
        top: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("resonance=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Rank {
            file,
            top,
            summarize,
            json,
        } => {
            let top = top.unwrap_or(config.top_n);
            if summarize {
                config.require_generator()?;
            }
            let dataset = load_dataset(&file)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&dataset.top_view(top))?);
            } else {
                terminal::display_ranked_posts(&dataset, top);
                terminal::display_rejected(&dataset.rejected);
            }

            if summarize {
                let generator = OpenAiGenerator::from_config(&config);
                println!("\nAnalyzing engagement...");
                let summary = narrator::summarize_engagement(&generator, &dataset, top).await?;
                println!("\n{}\n{}", "=== Engagement Analysis ===".bold(), summary);
            }
        }

        Commands::Keywords {
            file,
            keywords,
            dedupe,
            alpha,
            json,
            narrate,
        } => {
            if !(0.0..=1.0).contains(&alpha) {
                anyhow::bail!("--alpha must be between 0 and 1, got {alpha}");
            }
            if narrate {
                config.require_generator()?;
            }
            let dataset = load_dataset(&file)?;

            let mut query = KeywordQuery::parse(&keywords);
            if dedupe {
                query = query.deduplicated();
            }
            info!(keywords = query.len(), "Running keyword analysis");

            let report = resonance::analysis::pipeline::analyze_keywords(&dataset, &query);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                terminal::display_keyword_report(&report, alpha);
                terminal::display_rejected(&dataset.rejected);
            }

            if narrate {
                let generator = OpenAiGenerator::from_config(&config);
                let summary = narrator::summarize_keywords(&generator, &report, alpha).await?;
                println!("\n{}\n{}", "=== Keyword Analysis ===".bold(), summary);
            }
        }

        Commands::Persona { file, topic, top } => {
            config.require_generator()?;
            let top = top.unwrap_or(config.top_n);
            let dataset = load_dataset(&file)?;
            let generator = OpenAiGenerator::from_config(&config);

            println!("Analyzing engagement for persona post...");
            let analysis = narrator::summarize_engagement(&generator, &dataset, top).await?;

            let client = reqwest::Client::new();
            let topic_content = topic::resolve_topic(&client, &topic).await?;

            println!("Writing post...");
            let post = narrator::persona_post(
                &generator,
                &dataset,
                top,
                &analysis,
                &topic_content,
                &config.persona_name,
            )
            .await?;
            terminal::display_persona_post(&post);
        }
    }

    Ok(())
}

/// Load a posts file and compute engagement.
fn load_dataset(path: &Path) -> Result<Dataset> {
    let loaded = loader::load_posts(path)
        .with_context(|| format!("Failed to load posts from {}", path.display()))?;
    Ok(loaded.into_dataset())
}
