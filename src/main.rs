use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fitness_tracker::config::{self, Settings};
use fitness_tracker::{catalog, db, logging};

#[derive(Parser)]
#[command(name = "fitness-tracker")]
#[command(about = "Fitness tracking API: exercises, workouts, plans and progress", long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run migrations and start the HTTP server (default)
  Serve,
  /// Import the exercise template catalog from a JSON dataset
  SeedTemplates {
    #[arg(long)]
    file: PathBuf,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  logging::init().context("failed to install log subscriber")?;

  match cli.command.unwrap_or(Commands::Serve) {
    Commands::Serve => {
      let settings = Settings::load().context("invalid configuration")?;
      fitness_tracker::serve(settings).await?;
    }
    Commands::SeedTemplates { file } => {
      dotenvy::dotenv().ok();
      let pool = db::initialize_db(&config::database_url())
        .await
        .context("failed to open database")?;

      let report = catalog::seed_templates_from_file(&pool, &file)
        .await
        .with_context(|| format!("failed to seed templates from {}", file.display()))?;
      println!("Seed done. created={}, skipped={}", report.created, report.skipped);

      pool.close().await;
    }
  }

  Ok(())
}
