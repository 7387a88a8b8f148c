//! JSON shapes of the HTTP surface.
//!
//! Entries are exposed as [`EntryView`]: the stored variant flattened into
//! one object, with its public identifier and display-ready mentions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entry::{Entry, ParsedDocument};
use crate::mention::MentionOutcome;
use crate::observability::MetricsSnapshot;
use crate::store::Profile;

/// Publishing submission: a non-empty `name` makes an article.
#[derive(Debug, Deserialize, Clone)]
pub struct NewEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub content: String,
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EntryView {
    pub id: String,
    pub kind: String,
    pub published: DateTime<Utc>,
    pub draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub mentions: Vec<MentionView>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MentionView {
    pub source: String,
    pub published: DateTime<Utc>,
    pub content: String,
    pub url: String,
}

impl From<&Entry> for EntryView {
    fn from(entry: &Entry) -> Self {
        let (title, content) = match entry {
            Entry::Note(note) => (None, note.message.clone()),
            Entry::Article(article) => (Some(article.title.clone()), article.content.clone()),
        };
        let mentions = entry
            .mentions()
            .iter()
            .map(|mention| {
                let display = mention.display();
                MentionView {
                    source: mention.source.clone(),
                    published: mention.published,
                    content: display.content,
                    url: display.url,
                }
            })
            .collect();

        Self {
            id: entry.identifier(),
            kind: entry.kind().as_str().to_string(),
            published: entry.published(),
            draft: entry.is_draft(),
            title,
            content,
            mentions,
        }
    }
}

/// A mention the verifier has already confirmed and parsed.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VerifiedMention {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub data: ParsedDocument,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MentionAccepted {
    pub outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl From<MentionOutcome> for MentionAccepted {
    fn from(outcome: MentionOutcome) -> Self {
        let (label, id) = match outcome {
            MentionOutcome::Attached { id } => ("attached", Some(id)),
            MentionOutcome::Unsupported { id } => ("unsupported", Some(id)),
            MentionOutcome::MissingEntry { id } => ("missing_entry", Some(id)),
            MentionOutcome::NotAnEntry => ("not_an_entry", None),
        };
        Self {
            outcome: label.to_string(),
            id,
        }
    }
}

/// Profile as served to readers; the credential never leaves the store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub name: String,
    pub home_url: String,
    pub github: String,
    pub host: String,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        Self {
            name: profile.name,
            home_url: profile.home_url,
            github: profile.github,
            host: profile.host,
        }
    }
}

/// Profile update; an absent password keeps the stored one.
#[derive(Debug, Deserialize, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    #[serde(default)]
    pub home_url: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, String>,
    pub metrics: MetricsSnapshot,
    pub version: String,
}
