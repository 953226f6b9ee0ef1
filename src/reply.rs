//! Canned reply suggestions for the triage board.
//!
//! Picks a template by keywords, nothing more: a question gets the question
//! template, positive feedback gets a thank-you, everything else is answered
//! by its category template or the fallback.

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::classify::{classify_category, is_question, sentiment_label, KeywordTables};
use crate::feedback::Sentiment;

static BUILTIN: Lazy<Arc<ReplyTemplates>> = Lazy::new(|| {
    let raw = include_str!("../config/reply_templates.json");
    Arc::new(serde_json::from_str(raw).expect("valid built-in reply templates"))
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Template {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReplyTemplates {
    pub question: Template,
    pub positive: Template,
    #[serde(default)]
    pub categories: HashMap<String, Template>,
    pub fallback: Template,
}

impl ReplyTemplates {
    pub fn builtin() -> Arc<Self> {
        BUILTIN.clone()
    }

    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).context("parsing reply templates")
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReplySuggestion {
    pub template_id: String,
    pub text: String,
    pub category: String,
    pub sentiment: Sentiment,
    pub question: bool,
}

pub fn suggest_reply(
    text: &str,
    rating: Option<i32>,
    tables: &KeywordTables,
    templates: &ReplyTemplates,
) -> ReplySuggestion {
    let category = classify_category(text, tables);
    let sentiment = sentiment_label(rating, text, tables);
    let question = is_question(text, tables);

    let template = if question {
        &templates.question
    } else if sentiment == Sentiment::Positive {
        &templates.positive
    } else {
        templates
            .categories
            .get(&category)
            .unwrap_or(&templates.fallback)
    };

    ReplySuggestion {
        template_id: template.id.clone(),
        text: template.text.clone(),
        category,
        sentiment,
        question,
    }
}
