// Shared-link parsing.
//
// Turns whatever the user pasted into a typed reference. No I/O happens
// here; the aggregator decides what to fetch based on the result.

use regex::Regex;
use std::sync::LazyLock;

// Drive ids are ASCII only. `\w` would also accept Unicode letters.

static DOCUMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/document/d/([A-Za-z0-9_-]{25,})").expect("valid document regex")
});

static FOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/folders/([A-Za-z0-9_-]{25,})").expect("valid folder regex"));

/// What a shared link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkReference {
    /// A single Google Doc.
    Document(String),
    /// A Drive folder whose direct children are read.
    Folder(String),
    /// Anything we don't know how to read.
    Invalid,
}

impl LinkReference {
    /// The opaque Drive id, if the link resolved to something.
    pub fn id(&self) -> Option<&str> {
        match self {
            LinkReference::Document(id) | LinkReference::Folder(id) => Some(id),
            LinkReference::Invalid => None,
        }
    }
}

/// Parses a shared Drive URL.
///
/// Document links win over folder links when a URL could match both.
pub fn resolve(link: &str) -> LinkReference {
    if let Some(caps) = DOCUMENT_PATTERN.captures(link) {
        return LinkReference::Document(caps[1].to_string());
    }

    if let Some(caps) = FOLDER_PATTERN.captures(link) {
        return LinkReference::Folder(caps[1].to_string());
    }

    LinkReference::Invalid
}
