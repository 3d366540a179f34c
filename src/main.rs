use std::sync::Arc;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use faqrag::bench::ledger;
use faqrag::bench::recommend_best_strategy;
use faqrag::bench::runners::run_on_questions;
use faqrag::bench::AnswerStrategy;
use faqrag::bench::ExtractiveRunner;
use faqrag::bench::GoldenSetEvaluator;
use faqrag::bench::LlmOnlyRunner;
use faqrag::bench::RagRunner;
use faqrag::config::AppConfig;
use faqrag::corpus::build_corpus;
use faqrag::embeddings::EmbeddingClient;
use faqrag::embeddings::EmbeddingConfig;
use faqrag::embeddings::EmbeddingIndex;
use faqrag::llm::prompts;
use faqrag::llm::ExtractiveQaClient;
use faqrag::llm::LlmService;
use faqrag::loader::load_faq_data;
use faqrag::loader::load_golden_set;
use faqrag::models::StrategyAnswerRow;
use faqrag::models::StrategySummary;
use faqrag::rag::Retriever;
use faqrag::FaqRagError;
use faqrag::Result;
use serde::Deserialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "faqrag")]
#[command(about = "Municipal FAQ question answering service and benchmark harness")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve,
    /// Run answering strategies over the golden set and score them
    Benchmark {
        /// Strategies to benchmark (default: all)
        #[arg(short, long, value_enum)]
        strategy: Vec<StrategyName>,
        /// Inter-row delay in seconds, to respect backend rate limits
        #[arg(long)]
        delay: Option<f64>,
    },
    /// Score pre-generated benchmark answers from a JSON results file
    Evaluate {
        /// JSON file with raw benchmark rows (one strategy field per row)
        results_file: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyName {
    LlmOnly,
    Rag,
    Extractive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        faqrag::logging::init_logging_with_level("debug")?;
    } else {
        faqrag::logging::init_logging()?;
    }

    let config = AppConfig::load()?;

    match cli.command {
        Commands::Serve => faqrag::api::serve_api(&config).await,
        Commands::Benchmark { strategy, delay } => {
            let strategies = if strategy.is_empty() {
                vec![StrategyName::LlmOnly, StrategyName::Rag, StrategyName::Extractive]
            } else {
                strategy
            };
            let delay = delay.unwrap_or(config.benchmark.delay_seconds);
            run_benchmark(&config, &strategies, delay).await
        }
        Commands::Evaluate { results_file } => evaluate_results_file(&config, &results_file).await,
    }
}

/// System prompt used for one benchmark strategy
fn bench_system_prompt(name: StrategyName) -> Option<&'static str> {
    match name {
        StrategyName::LlmOnly => Some(prompts::LLM_ONLY_SYSTEM_PROMPT),
        StrategyName::Rag => Some(prompts::RAG_BENCH_SYSTEM_PROMPT),
        StrategyName::Extractive => None,
    }
}

async fn build_strategy(
    name: StrategyName,
    config: &AppConfig,
    embedding: Arc<EmbeddingClient>,
    generation: Arc<LlmService>,
) -> Result<Box<dyn AnswerStrategy>> {
    let entries = load_faq_data(config.faq_path());
    if entries.is_empty() && name != StrategyName::LlmOnly {
        return Err(FaqRagError::DataLoad(format!(
            "FAQ corpus at {} is empty; retrieval strategies cannot run",
            config.faq_path()
        )));
    }

    match name {
        StrategyName::LlmOnly => Ok(Box::new(LlmOnlyRunner::new(generation))),
        StrategyName::Rag => Ok(Box::new(
            RagRunner::build(embedding, entries, generation, config.benchmark.top_k).await?,
        )),
        StrategyName::Extractive => {
            let corpus = build_corpus(&entries);
            let index = Arc::new(EmbeddingIndex::build(embedding, corpus).await?);
            let retriever = Arc::new(Retriever::new(index, Arc::new(entries)));
            let extraction = Arc::new(ExtractiveQaClient::new(
                config.embedding_endpoint(),
                config.extraction_model(),
                Some(config.resolve_api_token()?),
            )?);
            Ok(Box::new(ExtractiveRunner::new(
                retriever,
                extraction,
                config.benchmark.top_k,
            )))
        }
    }
}

async fn run_benchmark(
    config: &AppConfig,
    strategies: &[StrategyName],
    delay_seconds: f64,
) -> Result<()> {
    let golden_set = load_golden_set(&config.benchmark.golden_set_path)?;
    info!("Benchmarking over {} golden questions", golden_set.len());

    let embedding = Arc::new(EmbeddingClient::new(EmbeddingConfig::from_app_config(
        config,
    ))?);
    let generation = Arc::new(LlmService::from_config(config)?);
    let evaluator = GoldenSetEvaluator::new(embedding.clone(), config.benchmark.complexite_score);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut summaries = Vec::new();

    for name in strategies {
        let strategy =
            build_strategy(*name, config, embedding.clone(), generation.clone()).await?;
        println!("\n=== Benchmark {} ===", strategy.name());

        let rows = run_on_questions(
            strategy.as_ref(),
            &golden_set,
            bench_system_prompt(*name),
            delay_seconds,
        )
        .await;

        let mut input = stdin.lock();
        let mut output = stdout.lock();
        let (records, summary) = evaluator
            .evaluate(strategy.name(), &rows, &mut input, &mut output)
            .await?;

        let detail_path = format!(
            "{}/{}-eval.csv",
            config.benchmark.output_dir,
            strategy.name().replace('_', "-")
        );
        ledger::write_detailed_results(&detail_path, &records)?;
        ledger::append_summary(
            format!("{}/methods_scores_summary.csv", config.benchmark.output_dir),
            &summary,
        )?;

        summaries.push(summary);
    }

    print_recommendation(&summaries);
    Ok(())
}

/// One raw row of a pre-generated benchmark results file
#[derive(Deserialize)]
struct RawBenchmarkRow {
    strategy: String,
    #[serde(flatten)]
    row: StrategyAnswerRow,
}

async fn evaluate_results_file(config: &AppConfig, results_file: &str) -> Result<()> {
    let content = std::fs::read_to_string(results_file).map_err(|e| {
        FaqRagError::DataLoad(format!("results file {results_file} not readable: {e}"))
    })?;
    let raw_rows: Vec<RawBenchmarkRow> = serde_json::from_str(&content)?;

    // Group rows by strategy, preserving first-seen order
    let mut strategies: Vec<(String, Vec<StrategyAnswerRow>)> = Vec::new();
    for raw in raw_rows {
        match strategies.iter_mut().find(|(name, _)| *name == raw.strategy) {
            Some((_, rows)) => rows.push(raw.row),
            None => strategies.push((raw.strategy, vec![raw.row])),
        }
    }

    let embedding = Arc::new(EmbeddingClient::new(EmbeddingConfig::from_app_config(
        config,
    ))?);
    let evaluator = GoldenSetEvaluator::new(embedding, config.benchmark.complexite_score);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut summaries = Vec::new();

    println!("=== Lancement de l'évaluation ===");
    for (name, rows) in &strategies {
        println!("--- Évaluation de la stratégie : {name} ---");
        let mut input = stdin.lock();
        let mut output = stdout.lock();
        let (records, summary) = evaluator.evaluate(name, rows, &mut input, &mut output).await?;

        let detail_path = format!("{}/{}-eval.csv", config.benchmark.output_dir, name);
        ledger::write_detailed_results(&detail_path, &records)?;
        ledger::append_summary(
            format!("{}/evaluation_report.csv", config.benchmark.output_dir),
            &summary,
        )?;

        summaries.push(summary);
    }

    print_recommendation(&summaries);
    Ok(())
}

fn print_recommendation(summaries: &[StrategySummary]) {
    println!("\n=== Recommandation de la meilleure stratégie ===");
    for summary in summaries {
        println!(
            "- Stratégie '{}': Score global = {:.4}",
            summary.method, summary.global_score
        );
    }
    match recommend_best_strategy(summaries) {
        Some(best) => println!(
            "La stratégie recommandée est : '{}' avec un score global de {:.4}",
            best.method, best.global_score
        ),
        None => println!("Impossible de déterminer la meilleure stratégie."),
    }
}
