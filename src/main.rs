mod analysis;
mod api;
mod db;
mod filter;
mod harvest;
mod normalize;

use std::time::Instant;

use clap::{Parser, Subcommand};

use analysis::tokens::Tokenizer;
use filter::TitleFilter;
use harvest::Pacing;

#[derive(Parser)]
#[command(name = "hh_harvester", about = "HeadHunter vacancy harvester and skill analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search vacancies and store new ones
    Harvest {
        /// Search query (title-only match)
        #[arg(short, long, default_value = filter::DEFAULT_QUERY)]
        query: String,
        /// Geographic area id filter
        #[arg(short, long)]
        area: Option<String>,
    },
    /// Skill and keyword frequency report over stored vacancies
    Analyze,
    /// Harvest + analyze in one pipeline
    Run {
        #[arg(short, long, default_value = filter::DEFAULT_QUERY)]
        query: String,
        #[arg(short, long)]
        area: Option<String>,
    },
    /// Show database counts
    Stats,
    /// Recently stored vacancies table
    Overview {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Harvest { query, area } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            run_harvest(&conn, &query, area.as_deref()).await
        }
        Commands::Analyze => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            analysis::run_full_analysis(&conn, &Tokenizer::default())
        }
        Commands::Run { query, area } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            run_harvest(&conn, &query, area.as_deref()).await?;
            println!("\n{}", "=".repeat(60));
            analysis::run_full_analysis(&conn, &Tokenizer::default())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Total:            {}", s.total);
            println!("With skills:      {}", s.with_skills);
            println!("With description: {}", s.with_description);
            Ok(())
        }
        Commands::Overview { limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let rows = db::fetch_overview(&conn, limit)?;
            if rows.is_empty() {
                println!("No vacancies stored. Run 'harvest' first.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<10} | {:<40} | {:<24} | {:<20} | {:<19}",
                "#", "ID", "Title", "Employer", "Salary", "Stored"
            );
            println!("{}", "-".repeat(130));
            for (i, r) in rows.iter().enumerate() {
                println!(
                    "{:>3} | {:<10} | {:<40} | {:<24} | {:<20} | {:<19}",
                    i + 1,
                    r.hh_id,
                    truncate(&r.title, 40),
                    truncate(&r.employer, 24),
                    format_salary(r.salary_from, r.salary_to, r.currency.as_deref()),
                    r.created_at,
                );
            }
            println!("\n{} vacancies", rows.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run_harvest(
    conn: &rusqlite::Connection,
    query: &str,
    area: Option<&str>,
) -> anyhow::Result<()> {
    let client = api::HhClient::new()?;
    let filter = TitleFilter::default();

    println!("Harvesting vacancies for '{}'...", query);
    let summary = harvest::run(conn, &client, &filter, query, area, Pacing::courtesy()).await?;

    println!("\nHarvest finished.");
    println!("Found by API:  {}", summary.found);
    println!("Relevant:      {}", summary.relevant);
    println!("New:           {}", summary.new);
    println!("Existing:      {}", summary.existing);
    Ok(())
}

fn format_salary(from: Option<i64>, to: Option<i64>, currency: Option<&str>) -> String {
    let range = match (from, to) {
        (Some(f), Some(t)) => format!("{}-{}", f, t),
        (Some(f), None) => format!("from {}", f),
        (None, Some(t)) => format!("up to {}", t),
        (None, None) => return "-".to_string(),
    };
    match currency {
        Some(c) => format!("{} {}", range, c),
        None => range,
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
