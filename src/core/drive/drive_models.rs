use serde::{Deserialize, Serialize};

/// Google Docs files are exported to plain text.
pub const GOOGLE_DOC_MIME: &str = "application/vnd.google-apps.document";

/// Plain text files are downloaded as-is.
pub const PLAIN_TEXT_MIME: &str = "text/plain";

/// Content placed in the prompt for files we can't read.
pub const UNSUPPORTED_FILE_SENTINEL: &str = "[Non-text file or unsupported type]";

/// Identity and metadata of a remote file, without content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

impl FileDescriptor {
    pub fn new(id: &str, name: &str, mime_type: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
        }
    }

    pub fn content_kind(&self) -> ContentKind {
        ContentKind::from_mime(&self.mime_type)
    }
}

/// How a file's text is obtained, decided by its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Word-processor document, read through the plain-text export.
    GoogleDoc,
    /// Raw bytes are the text.
    PlainText,
    /// Binary or unknown; never fetched.
    Unsupported,
}

impl ContentKind {
    pub fn from_mime(mime_type: &str) -> Self {
        match mime_type {
            GOOGLE_DOC_MIME => ContentKind::GoogleDoc,
            PLAIN_TEXT_MIME => ContentKind::PlainText,
            _ => ContentKind::Unsupported,
        }
    }
}

/// A descriptor plus the text we currently hold for it.
///
/// Records are replaced rather than edited: a full re-fetch produces a new
/// record with the same descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub descriptor: FileDescriptor,
    pub content: String,
    /// False when `content` was cut short at aggregation time.
    pub is_full_content: bool,
}

impl FileRecord {
    pub fn full(descriptor: FileDescriptor, content: String) -> Self {
        Self {
            descriptor,
            content,
            is_full_content: true,
        }
    }

    /// Builds a record that keeps at most `max_chars` characters of `content`.
    pub fn retained(descriptor: FileDescriptor, content: String, max_chars: usize) -> Self {
        if content.chars().count() <= max_chars {
            return Self::full(descriptor, content);
        }

        Self {
            descriptor,
            content: truncate_chars(&content, max_chars).to_string(),
            is_full_content: false,
        }
    }

    /// Returns a new record with `content` swapped in and marked complete.
    pub fn with_full_content(&self, content: String) -> Self {
        Self::full(self.descriptor.clone(), content)
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

/// Returns the first `max_chars` characters of `text` (character, not byte, count).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_kind_dispatch() {
        assert_eq!(ContentKind::from_mime(GOOGLE_DOC_MIME), ContentKind::GoogleDoc);
        assert_eq!(ContentKind::from_mime(PLAIN_TEXT_MIME), ContentKind::PlainText);
        assert_eq!(ContentKind::from_mime("application/pdf"), ContentKind::Unsupported);
        assert_eq!(ContentKind::from_mime("text/markdown"), ContentKind::Unsupported);
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_retained_record_flags_truncation() {
        let descriptor = FileDescriptor::new("1", "notes.txt", PLAIN_TEXT_MIME);

        let short = FileRecord::retained(descriptor.clone(), "x".repeat(10), 10);
        assert!(short.is_full_content);

        let long = FileRecord::retained(descriptor, "x".repeat(11), 10);
        assert!(!long.is_full_content);
        assert_eq!(long.content.len(), 10);
    }

    #[test]
    fn test_with_full_content_keeps_descriptor() {
        let descriptor = FileDescriptor::new("1", "notes.txt", PLAIN_TEXT_MIME);
        let partial = FileRecord::retained(descriptor.clone(), "abcdef".to_string(), 3);

        let refreshed = partial.with_full_content("abcdef".to_string());
        assert_eq!(refreshed.descriptor, descriptor);
        assert!(refreshed.is_full_content);
        // Original record is untouched.
        assert_eq!(partial.content, "abc");
    }

    #[test]
    fn test_descriptor_deserializes_drive_fields() {
        let json = r#"{"id":"abc","name":"Report.txt","mimeType":"text/plain"}"#;
        let descriptor: FileDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor, FileDescriptor::new("abc", "Report.txt", "text/plain"));
        assert_eq!(descriptor.content_kind(), ContentKind::PlainText);
    }
}
