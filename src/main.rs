use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use reviewlens::taxonomy::FeedbackTaxonomy;
use reviewlens::{
    Config, FeedbackClassifier, GeminiProvider, PlayStoreClient, ReviewPipeline, ReviewStore,
};

#[derive(Parser, Debug)]
#[command(name = "reviewlens")]
#[command(version = "0.1.0")]
#[command(about = "Collect app store reviews, classify them with an LLM, and summarize the findings")]
#[command(author = "Review Lens")]
struct Args {
    /// Play Store application id to collect reviews for
    #[arg(short, long)]
    app_id: Option<String>,

    /// Maximum number of reviews to collect
    #[arg(long)]
    max_reviews: Option<u32>,

    /// Collect reviews and stop before classification
    #[arg(long)]
    collect_only: bool,

    /// Classify and analyze existing artifacts without collecting
    #[arg(long, conflicts_with = "collect_only")]
    process_only: bool,

    /// Raw artifact to classify instead of the newest one
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("reviewlens=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration, CLI arguments override environment
    let mut config = Config::from_env()?;
    if let Some(app_id) = args.app_id {
        config.collector.app_id = app_id;
    }
    if let Some(max_reviews) = args.max_reviews {
        config.collector.max_reviews = max_reviews;
    }

    // Initialize components
    let store = ReviewStore::new(&config.data_dir)?;
    let source = PlayStoreClient::new(config.collector.clone())?;
    let provider = GeminiProvider::new(
        config.gemini_api_key.clone(),
        &config.classifier,
        FeedbackTaxonomy::new(),
    );
    let classifier = FeedbackClassifier::new(provider, config.classifier.clone());

    // Create pipeline
    let pipeline = ReviewPipeline::new(source, classifier, store, config.collector.clone());

    if args.collect_only {
        let path = pipeline.collect().await?;
        tracing::info!("Raw artifact written to {}", path.display());
        return Ok(());
    }

    if args.process_only {
        let processed_path = pipeline.classify(args.input).await?;
        let report = pipeline.analyze(Some(processed_path))?;
        println!("{}", report);
        return Ok(());
    }

    // Run all phases
    tracing::info!("Starting review pipeline for {}", config.collector.app_id);
    let report = pipeline.run().await?;
    println!("{}", report);

    Ok(())
}
