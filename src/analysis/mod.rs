pub mod rank;
pub mod tokens;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tracing::debug;

use crate::db;
use tokens::Tokenizer;

pub const TOP_SKILLS_LIMIT: usize = 50;
pub const TOP_KEYWORDS_LIMIT: usize = 50;

/// Aggregate counts, then skill and keyword frequency reports.
pub fn run_full_analysis(conn: &Connection, tokenizer: &Tokenizer) -> Result<()> {
    let stats = db::get_stats(conn)?;
    println!("Vacancies stored:        {}", stats.total);
    println!("  with skills:           {}", stats.with_skills);
    println!("  with description:      {}", stats.with_description);
    println!();

    analyze_skills(conn)?;
    println!("\n{}", "=".repeat(60));
    analyze_keywords(conn, tokenizer)?;
    Ok(())
}

/// Frequency of structured skill tags across all stored vacancies.
pub fn analyze_skills(conn: &Connection) -> Result<()> {
    let blobs = db::fetch_skill_blobs(conn)?;
    let all_skills = collect_skills(&blobs);

    let ranked = rank::rank(all_skills.iter().cloned(), TOP_SKILLS_LIMIT);
    println!("Skill tags (top {}):", TOP_SKILLS_LIMIT);
    println!("  {} mentions, {} distinct", all_skills.len(), distinct(&all_skills));
    print_ranked(&ranked);
    Ok(())
}

/// Frequency of keywords extracted from vacancy descriptions.
pub fn analyze_keywords(conn: &Connection, tokenizer: &Tokenizer) -> Result<()> {
    let descriptions = db::fetch_descriptions(conn)?;

    let pb = ProgressBar::new(descriptions.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} descriptions")?
            .progress_chars("=> "),
    );

    let mut all_keywords = Vec::new();
    for description in &descriptions {
        all_keywords.extend(tokenizer.extract_tokens(description));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let ranked = rank::rank(all_keywords.iter().cloned(), TOP_KEYWORDS_LIMIT);
    println!("Description keywords (top {}):", TOP_KEYWORDS_LIMIT);
    println!("  {} tokens, {} distinct", all_keywords.len(), distinct(&all_keywords));
    print_ranked(&ranked);
    Ok(())
}

/// Deserialize skill blobs, flattening into one tag list. A malformed blob
/// drops only that vacancy's contribution.
fn collect_skills(blobs: &[String]) -> Vec<String> {
    let mut all = Vec::new();
    for blob in blobs {
        match serde_json::from_str::<Vec<String>>(blob) {
            Ok(skills) => all.extend(skills),
            Err(e) => debug!("skipping malformed skill blob: {}", e),
        }
    }
    all
}

fn distinct(tokens: &[String]) -> usize {
    tokens.iter().collect::<std::collections::HashSet<_>>().len()
}

fn print_ranked(ranked: &[(String, usize)]) {
    for (i, (token, count)) in ranked.iter().enumerate() {
        println!("{:>3}. {}: {}", i + 1, token, count);
    }
}

// ── Tests ──
