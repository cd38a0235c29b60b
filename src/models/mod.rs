pub mod enums;

pub use enums::*;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reference to an artifact archived in the document vault.
///
/// The three states are load-bearing for the display layer: a record that
/// was never archived renders differently from one whose archival failed
/// (e.g. missing vault token), which renders differently from a live link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArchiveLink {
    /// Not yet archived.
    #[default]
    Pending,
    /// Durable, dereferenceable URL.
    Url(String),
    /// Archival was attempted and failed.
    Failed,
}

impl ArchiveLink {
    pub const PENDING_SENTINEL: &'static str = "#";
    pub const FAILED_SENTINEL: &'static str = "#error_no_token";

    /// Wrap a vault publish result: a URL on success, the failure sentinel
    /// when the vault reported failure.
    pub fn from_publish(result: Option<String>) -> Self {
        match result {
            Some(url) => ArchiveLink::Url(url),
            None => ArchiveLink::Failed,
        }
    }

    /// Flat string encoding used at rest (tabular cells, serialized JSON).
    pub fn encode(&self) -> &str {
        match self {
            ArchiveLink::Pending => Self::PENDING_SENTINEL,
            ArchiveLink::Url(url) => url,
            ArchiveLink::Failed => Self::FAILED_SENTINEL,
        }
    }

    /// Decode the flat string encoding. Empty cells decode as `Pending`.
    pub fn decode(raw: &str) -> Self {
        match raw.trim() {
            "" | Self::PENDING_SENTINEL => ArchiveLink::Pending,
            Self::FAILED_SENTINEL => ArchiveLink::Failed,
            url => ArchiveLink::Url(url.to_string()),
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, ArchiveLink::Url(_))
    }

    /// Markdown-safe href. Spaces in vault paths break markdown link syntax,
    /// so they are percent-escaped here rather than at every call site.
    pub fn href(&self) -> String {
        self.encode().replace(' ', "%20")
    }
}

impl Serialize for ArchiveLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.encode())
    }
}

impl<'de> Deserialize<'de> for ArchiveLink {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ArchiveLink::decode(&raw))
    }
}

/// Four-part analysis narrative produced by the decomposer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeepAnalysis {
    pub facts: String,
    pub opinions: String,
    pub logic: String,
    pub assumptions: String,
}

impl DeepAnalysis {
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
            && self.opinions.is_empty()
            && self.logic.is_empty()
            && self.assumptions.is_empty()
    }
}

/// Verbatim inbound text plus provenance. Archived exactly once per
/// dispatch, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSubmission {
    pub text: String,
    pub source_url: Option<String>,
    pub received_at: NaiveDateTime,
}

impl RawSubmission {
    pub fn new(text: &str, source_url: &str, received_at: NaiveDateTime) -> Self {
        Self {
            text: text.to_string(),
            source_url: if source_url.is_empty() {
                None
            } else {
                Some(source_url.to_string())
            },
            received_at,
        }
    }
}

/// Pre-link, pre-stamp record shape produced by the decomposer.
/// All normalization (title fallback chain, summary synthesis, enum
/// validation) has already been applied when a draft exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub category: Category,
    pub bias: Bias,
    pub title: String,
    pub summary: String,
    pub logic_chain: String,
    pub tags: Vec<String>,
    pub publication_date: String,
    pub deep_analysis: DeepAnalysis,
}

/// The atomic unit of intelligence at rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelRecord {
    /// Record-creation date stamped by the dispatcher. Distinct from
    /// `publication_date`, the cited document's own date.
    pub date: NaiveDate,
    pub category: Category,
    pub bias: Bias,
    pub title: String,
    pub summary: String,
    pub logic_chain: String,
    pub tags: Vec<String>,
    pub publication_date: String,
    pub deep_analysis: DeepAnalysis,
    /// Provenance of the submission channel, not the cited source.
    pub url: String,
    pub raw_doc_link: ArchiveLink,
    pub card_link: ArchiveLink,
}

impl IntelRecord {
    /// Stamp a draft into a full record. Links start `Pending`; the
    /// dispatcher fills them in as archival proceeds.
    pub fn from_draft(draft: RecordDraft, date: NaiveDate, url: &str) -> Self {
        Self {
            date,
            category: draft.category,
            bias: draft.bias,
            title: draft.title,
            summary: draft.summary,
            logic_chain: draft.logic_chain,
            tags: draft.tags,
            publication_date: draft.publication_date,
            deep_analysis: draft.deep_analysis,
            url: url.to_string(),
            raw_doc_link: ArchiveLink::Pending,
            card_link: ArchiveLink::Pending,
        }
    }
}
