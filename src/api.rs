use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

const BASE_URL: &str = "https://api.hh.ru";
const USER_AGENT: &str = "hh-harvester-rust/0.1";

pub const PER_PAGE: u32 = 100;
const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);
const DETAIL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    pub items: Vec<VacancySummary>,
    pub pages: u32,
    pub found: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VacancySummary {
    pub id: String,
    pub name: String,
    pub alternate_url: String,
    pub employer: Employer,
    pub salary: Option<Salary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Employer {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Salary {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VacancyDetail {
    #[serde(default)]
    pub key_skills: Vec<KeySkill>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeySkill {
    pub name: String,
}

/// Read-only boundary to the vacancy listing API. The harvest pipeline only
/// talks through this trait, so tests can script responses.
#[async_trait]
pub trait VacancySource {
    /// Fetch one page of search results. Title-only search, page size 100.
    async fn search_page(
        &self,
        query: &str,
        area: Option<&str>,
        page: u32,
    ) -> Result<SearchPage, FetchError>;

    /// Fetch full detail for one vacancy.
    async fn detail(&self, id: &str) -> Result<VacancyDetail, FetchError>;
}

/// HeadHunter API client. The API requires a User-Agent on every request.
pub struct HhClient {
    client: reqwest::Client,
}

impl HhClient {
    pub fn new() -> anyhow::Result<Self> {
        Ok(HhClient {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
        })
    }
}

#[async_trait]
impl VacancySource for HhClient {
    async fn search_page(
        &self,
        query: &str,
        area: Option<&str>,
        page: u32,
    ) -> Result<SearchPage, FetchError> {
        let mut params: Vec<(&str, String)> = vec![
            ("text", query.to_string()),
            ("page", page.to_string()),
            ("per_page", PER_PAGE.to_string()),
            // Match keywords against the vacancy title only
            ("search_field", "name".to_string()),
        ];
        if let Some(area) = area {
            params.push(("area", area.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/vacancies", BASE_URL))
            .query(&params)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn detail(&self, id: &str) -> Result<VacancyDetail, FetchError> {
        let response = self
            .client
            .get(format!("{}/vacancies/{}", BASE_URL, id))
            .timeout(DETAIL_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_page_deserializes() {
        let json = r#"{
            "items": [{
                "id": "12345",
                "name": "Go Developer",
                "alternate_url": "https://hh.ru/vacancy/12345",
                "employer": {"name": "Acme"},
                "salary": {"from": 100000, "to": null, "currency": "RUR"}
            }],
            "pages": 3,
            "found": 250
        }"#;
        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.pages, 3);
        assert_eq!(page.found, 250);
        let item = &page.items[0];
        assert_eq!(item.id, "12345");
        assert_eq!(item.employer.name, "Acme");
        let salary = item.salary.as_ref().unwrap();
        assert_eq!(salary.from, Some(100000));
        assert_eq!(salary.to, None);
        assert_eq!(salary.currency.as_deref(), Some("RUR"));
    }

    #[test]
    fn summary_without_salary() {
        let json = r#"{
            "id": "7",
            "name": "Go Developer",
            "alternate_url": "https://hh.ru/vacancy/7",
            "employer": {"name": "Acme"},
            "salary": null
        }"#;
        let item: VacancySummary = serde_json::from_str(json).unwrap();
        assert!(item.salary.is_none());
    }

    #[test]
    fn detail_with_missing_fields() {
        // key_skills can be absent entirely; description can be null
        let detail: VacancyDetail = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert!(detail.key_skills.is_empty());
        assert!(detail.description.is_none());

        let detail: VacancyDetail = serde_json::from_str(
            r#"{"key_skills": [{"name": "Go"}, {"name": "PostgreSQL"}], "description": "<p>x</p>"}"#,
        )
        .unwrap();
        let names: Vec<&str> = detail.key_skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Go", "PostgreSQL"]);
    }
}
