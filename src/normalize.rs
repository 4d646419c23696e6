use std::sync::LazyLock;

use regex::Regex;

use crate::api::{VacancyDetail, VacancySummary};
use crate::db::NewVacancy;

/// Stored descriptions are capped at this many characters.
pub const MAX_DESCRIPTION_CHARS: usize = 10_000;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<]+?>").unwrap());

/// Build a storable vacancy from a search summary and its (possibly missing)
/// detail. A failed detail fetch yields empty skills and description rather
/// than blocking the record.
pub fn normalize(summary: &VacancySummary, detail: Option<&VacancyDetail>) -> NewVacancy {
    let skill_names: Vec<&str> = detail
        .map(|d| d.key_skills.iter().map(|s| s.name.as_str()).collect())
        .unwrap_or_default();
    let skills = serde_json::to_string(&skill_names).unwrap_or_else(|_| "[]".to_string());

    let description = detail
        .and_then(|d| d.description.as_deref())
        .map(clean_description)
        .unwrap_or_default();

    let (salary_from, salary_to, currency) = match &summary.salary {
        Some(s) => (s.from, s.to, s.currency.clone()),
        None => (None, None, None),
    };

    NewVacancy {
        hh_id: summary.id.clone(),
        title: summary.name.clone(),
        description,
        skills,
        url: summary.alternate_url.clone(),
        employer: summary.employer.name.clone(),
        salary_from,
        salary_to,
        currency,
    }
}

/// Strip markup, trim, and truncate to the storage cap.
fn clean_description(html: &str) -> String {
    let text = TAG_RE.replace_all(html, "");
    let text = text.trim();
    if text.chars().count() <= MAX_DESCRIPTION_CHARS {
        text.to_string()
    } else {
        text.chars().take(MAX_DESCRIPTION_CHARS).collect()
    }
}

// ── Tests ──
