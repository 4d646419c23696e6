use std::path::PathBuf;

use anyhow::{Context, Result};
use rusqlite::Connection;

const DB_PATH: &str = "data/vacancies.sqlite";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The vacancy's hh_id is already stored. Expected and benign.
    #[error("vacancy already exists")]
    Duplicate,
    #[error("storage failure: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub fn path() -> PathBuf {
    std::env::var("HH_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DB_PATH))
}

pub fn connect() -> Result<Connection> {
    let p = path();
    if let Some(dir) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let conn = Connection::open(&p).with_context(|| format!("Failed to open {:?}", p))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS vacancies (
            id          INTEGER PRIMARY KEY,
            hh_id       TEXT UNIQUE NOT NULL,
            title       TEXT NOT NULL,
            description TEXT,
            skills      TEXT,
            url         TEXT,
            employer    TEXT,
            salary_from INTEGER,
            salary_to   INTEGER,
            currency    TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

/// A vacancy ready for insertion. `id` and `created_at` are assigned by the
/// store.
#[derive(Debug, Clone)]
pub struct NewVacancy {
    pub hh_id: String,
    pub title: String,
    pub description: String,
    /// JSON array of tag strings.
    pub skills: String,
    pub url: String,
    pub employer: String,
    pub salary_from: Option<i64>,
    pub salary_to: Option<i64>,
    pub currency: Option<String>,
}

pub fn exists(conn: &Connection, hh_id: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM vacancies WHERE hh_id = ?1")?;
    Ok(stmt.exists(rusqlite::params![hh_id])?)
}

pub fn insert(conn: &Connection, v: &NewVacancy) -> Result<(), StoreError> {
    let result = conn.execute(
        "INSERT INTO vacancies
         (hh_id, title, description, skills, url, employer, salary_from, salary_to, currency)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            v.hh_id,
            v.title,
            v.description,
            v.skills,
            v.url,
            v.employer,
            v.salary_from,
            v.salary_to,
            v.currency,
        ],
    );
    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(StoreError::Duplicate)
        }
        Err(e) => Err(StoreError::Sqlite(e)),
    }
}

// ── Analysis readers ──

/// Serialized skill lists, non-empty rows only.
pub fn fetch_skill_blobs(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT skills FROM vacancies WHERE skills IS NOT NULL AND skills != '' ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Vacancy descriptions, non-empty rows only.
pub fn fetch_descriptions(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT description FROM vacancies WHERE description IS NOT NULL AND description != '' ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub with_skills: usize,
    pub with_description: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM vacancies", [], |r| r.get(0))?;
    let with_skills: usize = conn.query_row(
        "SELECT COUNT(*) FROM vacancies WHERE skills IS NOT NULL AND skills != '' AND skills != '[]'",
        [],
        |r| r.get(0),
    )?;
    let with_description: usize = conn.query_row(
        "SELECT COUNT(*) FROM vacancies WHERE description IS NOT NULL AND description != ''",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        total,
        with_skills,
        with_description,
    })
}

// ── Overview ──

pub struct OverviewRow {
    pub hh_id: String,
    pub title: String,
    pub employer: String,
    pub salary_from: Option<i64>,
    pub salary_to: Option<i64>,
    pub currency: Option<String>,
    pub created_at: String,
}

/// Most recently stored vacancies first.
pub fn fetch_overview(conn: &Connection, limit: usize) -> Result<Vec<OverviewRow>> {
    let mut stmt = conn.prepare(
        "SELECT hh_id, title, COALESCE(employer,''), salary_from, salary_to, currency, created_at
         FROM vacancies
         ORDER BY id DESC
         LIMIT ?1",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![limit], |row| {
            Ok(OverviewRow {
                hh_id: row.get(0)?,
                title: row.get(1)?,
                employer: row.get(2)?,
                salary_from: row.get(3)?,
                salary_to: row.get(4)?,
                currency: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn vacancy(hh_id: &str) -> NewVacancy {
        NewVacancy {
            hh_id: hh_id.to_string(),
            title: "Go Developer".to_string(),
            description: "builds services in Go".to_string(),
            skills: r#"["Go","PostgreSQL"]"#.to_string(),
            url: format!("https://hh.ru/vacancy/{}", hh_id),
            employer: "Acme".to_string(),
            salary_from: Some(100_000),
            salary_to: Some(150_000),
            currency: Some("RUR".to_string()),
        }
    }

    #[test]
    fn insert_then_exists() {
        let conn = test_conn();
        assert!(!exists(&conn, "1").unwrap());
        insert(&conn, &vacancy("1")).unwrap();
        assert!(exists(&conn, "1").unwrap());
    }

    #[test]
    fn double_insert_is_duplicate_not_second_row() {
        let conn = test_conn();
        insert(&conn, &vacancy("1")).unwrap();
        let err = insert(&conn, &vacancy("1")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        let count: usize = conn
            .query_row("SELECT COUNT(*) FROM vacancies", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn analysis_readers_skip_empty_values() {
        let conn = test_conn();
        insert(&conn, &vacancy("1")).unwrap();
        let mut bare = vacancy("2");
        bare.skills = String::new();
        bare.description = String::new();
        insert(&conn, &bare).unwrap();

        assert_eq!(fetch_skill_blobs(&conn).unwrap().len(), 1);
        assert_eq!(fetch_descriptions(&conn).unwrap().len(), 1);
    }

    #[test]
    fn stats_counts() {
        let conn = test_conn();
        insert(&conn, &vacancy("1")).unwrap();
        let mut no_skills = vacancy("2");
        no_skills.skills = "[]".to_string();
        insert(&conn, &no_skills).unwrap();

        let s = get_stats(&conn).unwrap();
        assert_eq!(s.total, 2);
        assert_eq!(s.with_skills, 1);
        assert_eq!(s.with_description, 2);
    }

    #[test]
    fn overview_returns_newest_first() {
        let conn = test_conn();
        insert(&conn, &vacancy("1")).unwrap();
        insert(&conn, &vacancy("2")).unwrap();
        let rows = fetch_overview(&conn, 10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].hh_id, "2");
        assert_eq!(rows[1].hh_id, "1");
    }
}
