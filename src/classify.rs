//! Keyword classifier (tables hot-reloaded from `config/keywords.json`).
//!
//! All matching is case-insensitive substring lookup over the lowercased text:
//! - `categories`: ordered groups; the first group with any hit wins, else `general`
//! - `sentiment`:  used only when the item has no star rating
//! - `question`:   interrogative words; `?` anywhere also counts
//!
//! A built-in Ukrainian table is embedded and used whenever the file is missing
//! or does not parse.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
    time::SystemTime,
};

use anyhow::Context;

use crate::feedback::Sentiment;

pub const DEFAULT_KEYWORDS_PATH: &str = "config/keywords.json";
pub const GENERAL_CATEGORY: &str = "general";

static BUILTIN: Lazy<Arc<KeywordTables>> = Lazy::new(|| {
    let raw = include_str!("../config/keywords.json");
    Arc::new(KeywordTables::from_json_str(raw).expect("valid built-in keyword table"))
});

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct KeywordTables {
    #[serde(default)]
    pub categories: Vec<CategoryKeywords>,
    #[serde(default)]
    pub sentiment: SentimentKeywords,
    #[serde(default)]
    pub question: QuestionMarkers,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CategoryKeywords {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct SentimentKeywords {
    #[serde(default)]
    pub negative: Vec<String>,
    #[serde(default)]
    pub positive: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct QuestionMarkers {
    #[serde(default)]
    pub words: Vec<String>,
}

impl KeywordTables {
    /// The embedded Ukrainian table.
    pub fn builtin() -> Arc<Self> {
        BUILTIN.clone()
    }

    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let mut tables: KeywordTables =
            serde_json::from_str(s).context("parsing keyword tables")?;
        tables.lowercase_in_place();
        Ok(tables)
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading keyword tables from {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    fn lowercase_in_place(&mut self) {
        fn lower(v: &mut Vec<String>) {
            v.retain(|k| !k.trim().is_empty());
            for k in v.iter_mut() {
                *k = k.to_lowercase();
            }
        }
        for c in &mut self.categories {
            lower(&mut c.keywords);
        }
        lower(&mut self.sentiment.negative);
        lower(&mut self.sentiment.positive);
        lower(&mut self.question.words);
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|k| haystack.contains(k.as_str()))
}

/// Topical category of `text`. Declaration order of the table decides ties.
pub fn classify_category(text: &str, tables: &KeywordTables) -> String {
    let lower = text.to_lowercase();
    tables
        .categories
        .iter()
        .find(|c| contains_any(&lower, &c.keywords))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| GENERAL_CATEGORY.to_string())
}

/// Star rating decides when present; otherwise negative keywords are checked
/// before positive ones.
pub fn sentiment_label(rating: Option<i32>, text: &str, tables: &KeywordTables) -> Sentiment {
    match rating {
        Some(r) if r <= 2 => Sentiment::Negative,
        Some(3) => Sentiment::Neutral,
        Some(_) => Sentiment::Positive,
        None => {
            let lower = text.to_lowercase();
            if contains_any(&lower, &tables.sentiment.negative) {
                Sentiment::Negative
            } else if contains_any(&lower, &tables.sentiment.positive) {
                Sentiment::Positive
            } else {
                Sentiment::Neutral
            }
        }
    }
}

pub fn is_question(text: &str, tables: &KeywordTables) -> bool {
    if text.contains('?') {
        return true;
    }
    tokenize(text).any(|tok| tables.question.words.iter().any(|w| *w == tok))
}

/// Word tokens, lowercased. Apostrophes stay inside words (`кур'єр`).
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// Keyword tables that follow the file on disk. The file is checked on every
/// `current()` call and re-read when its mtime changes.
#[derive(Debug)]
pub struct HotReloadKeywords {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    tables: Arc<KeywordTables>,
    last_modified: Option<SystemTime>,
}

impl HotReloadKeywords {
    pub fn new(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KEYWORDS_PATH));
        Self {
            path,
            inner: RwLock::new(State {
                tables: KeywordTables::builtin(),
                last_modified: None,
            }),
        }
    }

    /// Fixed tables, never reloaded. Handy for tests and embedding.
    pub fn fixed(tables: KeywordTables) -> Self {
        Self {
            path: PathBuf::new(),
            inner: RwLock::new(State {
                tables: Arc::new(tables),
                last_modified: None,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> Arc<KeywordTables> {
        let mtime = if self.path.as_os_str().is_empty() {
            None
        } else {
            fs::metadata(&self.path).and_then(|m| m.modified()).ok()
        };

        {
            let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
            if mtime.is_none() || guard.last_modified == mtime {
                return guard.tables.clone();
            }
        }

        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if guard.last_modified != mtime {
            match KeywordTables::load_from_file(&self.path) {
                Ok(tables) => {
                    tracing::info!(
                        target: "keywords",
                        path = %self.path.display(),
                        categories = tables.categories.len(),
                        "keyword tables reloaded"
                    );
                    guard.tables = Arc::new(tables);
                }
                Err(e) => {
                    tracing::warn!(target: "keywords", error = ?e, "keeping previous keyword tables");
                }
            }
            // Remember the mtime either way so a broken file is not re-parsed on every call.
            guard.last_modified = mtime;
        }
        guard.tables.clone()
    }
}
