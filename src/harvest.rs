use std::time::Duration;

use anyhow::Result;
use rusqlite::Connection;
use tracing::{info, warn};

use crate::api::{VacancySource, VacancySummary};
use crate::db::{self, StoreError};
use crate::filter::{TitleFilter, Verdict};
use crate::normalize;

/// Courtesy pauses between requests, injectable so tests run without
/// wall-clock waits.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub page_pause: Duration,
    pub item_pause: Duration,
}

impl Pacing {
    pub fn courtesy() -> Self {
        Pacing {
            page_pause: Duration::from_secs(3),
            item_pause: Duration::from_secs(2),
        }
    }

    pub fn none() -> Self {
        Pacing {
            page_pause: Duration::ZERO,
            item_pause: Duration::ZERO,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Total matches reported by the API on page 0.
    pub found: u64,
    /// Items surviving the title filter.
    pub relevant: usize,
    pub new: usize,
    pub existing: usize,
}

/// Full ingestion run: paginated search, title filtering, then per-item
/// detail fetch + insert for everything not already stored.
pub async fn run<S: VacancySource>(
    conn: &Connection,
    source: &S,
    filter: &TitleFilter,
    query: &str,
    area: Option<&str>,
    pacing: Pacing,
) -> Result<HarvestSummary> {
    let (summaries, found) = search_all(source, filter, query, area, pacing).await;
    let relevant = summaries.len();
    info!("{} relevant vacancies collected", relevant);

    let (new, existing) = store_new(conn, source, &summaries, pacing).await?;

    Ok(HarvestSummary {
        found,
        relevant,
        new,
        existing,
    })
}

/// Walk search pages sequentially, keeping items that pass the title filter.
/// Any fetch error ends the loop and returns what was gathered so far; an
/// empty page is the authoritative stop signal even if the reported page
/// count disagrees.
async fn search_all<S: VacancySource>(
    source: &S,
    filter: &TitleFilter,
    query: &str,
    area: Option<&str>,
    pacing: Pacing,
) -> (Vec<VacancySummary>, u64) {
    let mut collected = Vec::new();
    let mut found = 0u64;
    let mut page = 0u32;

    loop {
        info!("loading page {}", page + 1);
        let result = match source.search_page(query, area, page).await {
            Ok(r) => r,
            Err(e) => {
                warn!("search page {} failed: {}", page + 1, e);
                break;
            }
        };

        if page == 0 {
            found = result.found;
            info!("{} vacancies across {} pages", result.found, result.pages);
        }
        if result.items.is_empty() {
            break;
        }

        let fetched = result.items.len();
        let mut kept = 0usize;
        for item in result.items {
            match filter.check(&item.name) {
                Verdict::Relevant => {
                    kept += 1;
                    collected.push(item);
                }
                Verdict::NoKeyword => info!("  rejected (no keyword): {}", item.name),
                Verdict::Excluded => info!("  rejected (excluded word): {}", item.name),
            }
        }
        info!("page {}: {} fetched, {} kept", page + 1, fetched, kept);

        if page + 1 >= result.pages {
            break;
        }
        page += 1;
        tokio::time::sleep(pacing.page_pause).await;
    }

    (collected, found)
}

/// Insert every not-yet-stored vacancy, enriched with its detail. Detail
/// fetch failures and storage faults affect single items only.
async fn store_new<S: VacancySource>(
    conn: &Connection,
    source: &S,
    summaries: &[VacancySummary],
    pacing: Pacing,
) -> Result<(usize, usize)> {
    let total = summaries.len();
    let mut new = 0usize;
    let mut existing = 0usize;

    for (i, summary) in summaries.iter().enumerate() {
        let already = match db::exists(conn, &summary.id) {
            Ok(b) => b,
            Err(e) => {
                // Insert's unique constraint still catches a true duplicate
                warn!("existence check failed for {}: {}", summary.id, e);
                false
            }
        };
        if already {
            existing += 1;
            info!("[{}/{}] already stored: {}", i + 1, total, summary.name);
            continue;
        }

        info!("[{}/{}] fetching detail: {}", i + 1, total, summary.name);
        let detail = match source.detail(&summary.id).await {
            Ok(d) => Some(d),
            Err(e) => {
                warn!("detail fetch failed for {}: {}", summary.id, e);
                None
            }
        };

        let record = normalize::normalize(summary, detail.as_ref());
        match db::insert(conn, &record) {
            Ok(()) => {
                new += 1;
                info!("added: {}", record.title);
            }
            Err(StoreError::Duplicate) => {
                existing += 1;
                info!("already exists: {}", record.hh_id);
            }
            Err(e) => warn!("failed to save {}: {}", record.hh_id, e),
        }

        tokio::time::sleep(pacing.item_pause).await;
    }

    Ok((new, existing))
}

// ── Tests ──
