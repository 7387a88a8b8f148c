//! Blog entries and the backlinks attached to them
//!
//! An [`Entry`] is a closed set of variants ([`Note`], [`Article`]) sharing
//! the [`HEntry`] fields. Entries are written through the tagged
//! [`envelope`] and addressed by their publish instant (see
//! [`crate::timecodec`]).

pub mod envelope;
pub mod microformat;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timecodec;

pub use envelope::{EnvelopeError, marshal, unmarshal};
pub use microformat::{Microformat, ParsedDocument, PropertyValue, find_entry};

/// Fields common to every entry variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HEntry {
    /// Set once at creation; determines both the storage key and the public identifier.
    pub published: DateTime<Utc>,
    /// Append-only; only grown by the mention indexer.
    #[serde(default)]
    pub mentions: Vec<Mention>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Note {
    #[serde(flatten)]
    pub entry: HEntry,
    pub message: String,
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Article {
    #[serde(flatten)]
    pub entry: HEntry,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub draft: bool,
}

/// A verified reference from an external page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Mention {
    pub source: String,
    pub published: DateTime<Utc>,
    /// Originating `h-entry` found on the source page, if any.
    pub data: Option<Microformat>,
}

/// Display summary of a mention.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MentionDisplay {
    pub content: String,
    pub url: String,
}

impl Mention {
    /// Content is the first of `content`, `summary`, `name` present on the
    /// originating entry; url is its first `url` when that is plain text.
    pub fn display(&self) -> MentionDisplay {
        let Some(data) = &self.data else {
            return MentionDisplay::default();
        };

        let content = match data.first("content") {
            Some(PropertyValue::Text(_)) | None => None,
            Some(value) => value.as_text().map(str::to_owned),
        }
        .or_else(|| text_property(data, "summary"))
        .or_else(|| text_property(data, "name"))
        .unwrap_or_default();

        MentionDisplay {
            content,
            url: text_property(data, "url").unwrap_or_default(),
        }
    }
}

fn text_property(data: &Microformat, property: &str) -> Option<String> {
    match data.first(property) {
        Some(PropertyValue::Text(text)) => Some(text.clone()),
        _ => None,
    }
}

/// Variant discriminator as written into the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Note,
    Article,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Note => envelope::TYPE_NOTE,
            EntryKind::Article => envelope::TYPE_ARTICLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Note(Note),
    Article(Article),
}

impl Entry {
    pub fn note(message: impl Into<String>, draft: bool, published: DateTime<Utc>) -> Self {
        Entry::Note(Note {
            entry: HEntry {
                published,
                mentions: Vec::new(),
            },
            message: message.into(),
            draft,
        })
    }

    pub fn article(
        title: impl Into<String>,
        content: impl Into<String>,
        draft: bool,
        published: DateTime<Utc>,
    ) -> Self {
        Entry::Article(Article {
            entry: HEntry {
                published,
                mentions: Vec::new(),
            },
            title: title.into(),
            content: content.into(),
            draft,
        })
    }

    /// Build an entry from a publishing submission: a non-empty name makes
    /// an article, otherwise the content becomes a note.
    pub fn from_submission(
        name: Option<&str>,
        content: &str,
        draft: bool,
        published: DateTime<Utc>,
    ) -> Self {
        match name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(title) => Entry::article(title, content, draft, published),
            None => Entry::note(content, draft, published),
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Note(_) => EntryKind::Note,
            Entry::Article(_) => EntryKind::Article,
        }
    }

    pub fn common(&self) -> &HEntry {
        match self {
            Entry::Note(note) => &note.entry,
            Entry::Article(article) => &article.entry,
        }
    }

    fn common_mut(&mut self) -> &mut HEntry {
        match self {
            Entry::Note(note) => &mut note.entry,
            Entry::Article(article) => &mut article.entry,
        }
    }

    pub fn published(&self) -> DateTime<Utc> {
        self.common().published
    }

    pub(crate) fn set_published(&mut self, published: DateTime<Utc>) {
        self.common_mut().published = published;
    }

    pub fn mentions(&self) -> &[Mention] {
        &self.common().mentions
    }

    pub fn is_draft(&self) -> bool {
        match self {
            Entry::Note(note) => note.draft,
            Entry::Article(article) => article.draft,
        }
    }

    /// Whether the entry is shown to a reader with the given visibility.
    pub fn visible(&self, include_drafts: bool) -> bool {
        include_drafts || !self.is_draft()
    }

    /// Only notes collect backlinks; articles ignore them.
    pub fn supports_mentions(&self) -> bool {
        matches!(self, Entry::Note(_))
    }

    /// Append a mention. Returns `false` (leaving the entry untouched) when
    /// the variant does not hold mentions.
    pub fn push_mention(&mut self, mention: Mention) -> bool {
        match self {
            Entry::Note(note) => {
                note.entry.mentions.push(mention);
                true
            }
            Entry::Article(_) => false,
        }
    }

    pub fn identifier(&self) -> String {
        timecodec::encode_identifier(&self.published())
    }

    pub fn storage_key(&self) -> Vec<u8> {
        timecodec::encode_key(&self.published())
    }
}
