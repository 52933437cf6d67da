//! Research Engine Binary
//!
//! Takes a natural-language research goal and drives the full pipeline:
//! generation, reflection, tournament ranking, evolution, meta-review.
//! Writes the combined result as pretty-printed JSON when asked.

use clap::Parser;
use coscientist::engine::RunConfig;
use coscientist::model::ModelConfig;

#[derive(Parser)]
#[command(about = "Autonomous research hypothesis engine")]
struct Args {
    /// research goal, or a path to a .txt/.md file containing it
    #[arg(long)]
    goal: String,
    /// where to write the result as pretty-printed JSON
    #[arg(long)]
    output: Option<std::path::PathBuf>,
    /// maximum supervisor rounds
    #[arg(long, default_value_t = 10)]
    iterations: usize,
    /// concurrent task workers
    #[arg(long, default_value_t = 5)]
    workers: usize,
    /// model name
    #[arg(long, default_value = "gemini-2.0")]
    model: String,
    /// model sampling temperature
    #[arg(long, default_value_t = 0.7)]
    temperature: f64,
    /// fixed seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

/// a goal argument ending in .txt or .md names a file when one exists
fn goal_of(arg: &str) -> String {
    match (arg.ends_with(".txt") || arg.ends_with(".md"), std::fs::read_to_string(arg)) {
        (true, Ok(contents)) => contents,
        _ => arg.to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    coscientist::init();
    let config = RunConfig {
        goal: goal_of(&args.goal),
        max_iterations: args.iterations,
        workers: args.workers,
        model: ModelConfig {
            name: args.model,
            temperature: args.temperature,
            ..ModelConfig::default()
        },
        seed: args.seed.unwrap_or_else(|| {
            use rand::Rng;
            rand::rng().random()
        }),
        ..RunConfig::default()
    };
    let result = coscientist::engine::run_default(config).await?;
    log::info!(
        "run {:?}: {} top hypotheses",
        result.status,
        result.top_hypotheses.len(),
    );
    match args.output {
        Some(path) => std::fs::write(&path, serde_json::to_string_pretty(&result)?)
            .map_err(|e| anyhow::anyhow!("failed to write {}: {}", path.display(), e))?,
        None => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}
