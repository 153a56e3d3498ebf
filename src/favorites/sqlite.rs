// src/favorites/sqlite.rs
//! SQLite-backed favorites so saved articles survive a restart.

use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::Context;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::{Favorite, FavoritesStore};
use crate::article::{Article, ArticleSource};

/// Path value that keeps the database in memory instead of on disk.
pub const IN_MEMORY: &str = ":memory:";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS favorites (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    url          TEXT NOT NULL UNIQUE,
    title        TEXT NOT NULL DEFAULT '',
    description  TEXT NOT NULL DEFAULT '',
    content      TEXT NOT NULL DEFAULT '',
    url_to_image TEXT,
    published_at TEXT NOT NULL DEFAULT '',
    source_id    TEXT NOT NULL DEFAULT '',
    source_name  TEXT NOT NULL DEFAULT '',
    saved_at     TEXT NOT NULL
);";

const SELECT_COLUMNS: &str = "SELECT url, title, description, content, url_to_image,
    published_at, source_id, source_name, saved_at FROM favorites";

pub struct SqliteFavorites {
    conn: Mutex<Connection>,
}

impl SqliteFavorites {
    /// Open (or create) the database file at `path`, creating parent
    /// directories as needed. [`IN_MEMORY`] opens a private in-memory store.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path == Path::new(IN_MEMORY) {
            return Self::open_in_memory();
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating favorites dir {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("opening favorites db {}", path.display()))?;
        info!(path = %path.display(), "favorites database opened");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("opening in-memory favorites db")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(SCHEMA).context("creating favorites table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn favorite_from_row(row: &Row<'_>) -> rusqlite::Result<Favorite> {
    Ok(Favorite {
        article: Article {
            url: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            content: row.get(3)?,
            image_url: row.get(4)?,
            published_at: row.get(5)?,
            source: ArticleSource {
                id: row.get(6)?,
                name: row.get(7)?,
            },
        },
        saved_at: row.get::<_, DateTime<Utc>>(8)?,
    })
}

impl FavoritesStore for SqliteFavorites {
    fn add(&self, article: &Article) -> anyhow::Result<bool> {
        if article.url.is_empty() {
            return Ok(false);
        }
        let inserted = self
            .conn()
            .execute(
                "INSERT OR IGNORE INTO favorites
                 (url, title, description, content, url_to_image, published_at,
                  source_id, source_name, saved_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    article.url,
                    article.title,
                    article.description,
                    article.content,
                    article.image_url,
                    article.published_at,
                    article.source.id,
                    article.source.name,
                    Utc::now(),
                ],
            )
            .context("inserting favorite")?;
        debug!(url = %article.url, inserted, "favorite saved");
        Ok(true)
    }

    fn list(&self) -> anyhow::Result<Vec<Favorite>> {
        let conn = self.conn();
        // ids only grow, so id order is save order
        let mut stmt = conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY id DESC"))
            .context("preparing favorites query")?;
        let rows = stmt
            .query_map([], favorite_from_row)
            .context("listing favorites")?;
        let favs = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("reading favorite row")?;
        Ok(favs)
    }

    fn remove(&self, url: &str) -> anyhow::Result<bool> {
        let n = self
            .conn()
            .execute("DELETE FROM favorites WHERE url = ?1", params![url])
            .context("deleting favorite")?;
        Ok(n > 0)
    }

    fn exists(&self, url: &str) -> anyhow::Result<bool> {
        let found = self
            .conn()
            .query_row(
                "SELECT 1 FROM favorites WHERE url = ?1",
                params![url],
                |_| Ok(()),
            )
            .optional()
            .context("looking up favorite")?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn art(url: &str) -> Article {
        Article {
            url: url.into(),
            title: format!("title {url}"),
            description: "desc".into(),
            content: "body".into(),
            image_url: Some(format!("{url}/img.png")),
            published_at: "2024-03-10T08:00:00Z".into(),
            source: ArticleSource {
                id: "bbc-news".into(),
                name: "BBC News".into(),
            },
        }
    }

    #[test]
    fn add_is_idempotent_and_list_is_newest_first() {
        let s = SqliteFavorites::open_in_memory().unwrap();
        assert!(s.add(&art("a")).unwrap());
        assert!(s.add(&art("b")).unwrap());
        assert!(s.add(&art("a")).unwrap());

        let favs = s.list().unwrap();
        let urls: Vec<_> = favs.iter().map(|f| f.article.url.as_str()).collect();
        assert_eq!(urls, vec!["b", "a"]);
        assert_eq!(favs[1].article, art("a"));
    }

    #[test]
    fn remove_and_exists() {
        let s = SqliteFavorites::open_in_memory().unwrap();
        s.add(&art("a")).unwrap();
        assert!(s.exists("a").unwrap());
        assert!(!s.exists("b").unwrap());
        assert!(s.remove("a").unwrap());
        assert!(!s.remove("a").unwrap());
        assert!(!s.exists("a").unwrap());
    }

    #[test]
    fn empty_url_is_rejected() {
        let s = SqliteFavorites::open_in_memory().unwrap();
        assert!(!s.add(&art("")).unwrap());
        assert!(s.list().unwrap().is_empty());
    }

    #[test]
    fn missing_image_reads_back_as_none() {
        let s = SqliteFavorites::open_in_memory().unwrap();
        let mut a = art("a");
        a.image_url = None;
        s.add(&a).unwrap();
        assert_eq!(s.list().unwrap()[0].article.image_url, None);
    }

    #[test]
    fn favorites_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("favorites.db");

        let first = SqliteFavorites::open(&path).unwrap();
        first.add(&art("a")).unwrap();
        first.add(&art("b")).unwrap();
        first.remove("a").unwrap();
        let saved_at = first.list().unwrap()[0].saved_at;
        drop(first);

        let reopened = SqliteFavorites::open(&path).unwrap();
        let favs = reopened.list().unwrap();
        assert_eq!(favs.len(), 1);
        assert_eq!(favs[0].article, art("b"));
        assert_eq!(favs[0].saved_at, saved_at);
    }

    #[test]
    fn memory_path_does_not_touch_disk() {
        let s = SqliteFavorites::open(IN_MEMORY).unwrap();
        s.add(&art("a")).unwrap();
        assert!(s.exists("a").unwrap());
        assert!(!Path::new(IN_MEMORY).exists());
    }
}
