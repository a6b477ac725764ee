//! Diagnostic data model.
//!
//! A [`Diagnostic`] is plain data: an optional source file, a byte offset and
//! length into that file, a numeric code, a category, and a message that is
//! either a single string or a chain of nested messages.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

impl DiagnosticCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        }
    }
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a nested message.
///
/// Only the first entry of `next` is ever followed when looking for the
/// most specific message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageChain {
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    pub next: Vec<MessageChain>,
}

impl MessageChain {
    /// A chain node with no successors.
    pub fn new(message_text: impl Into<String>, category: DiagnosticCategory, code: u32) -> Self {
        Self {
            message_text: message_text.into(),
            category,
            code,
            next: Vec::new(),
        }
    }

    /// Append `next` as a successor of this node.
    pub fn with_next(mut self, next: MessageChain) -> Self {
        self.next.push(next);
        self
    }

    /// The most specific message: follow the first successor until a node
    /// has none.
    pub fn leaf(&self) -> &str {
        let mut node = self;
        while let Some(next) = node.next.first() {
            node = next;
        }
        &node.message_text
    }
}

/// Message of a [`Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageText {
    Text(String),
    Chain(MessageChain),
}

impl MessageText {
    /// The plain text shown to users.
    pub fn leaf(&self) -> &str {
        match self {
            MessageText::Text(text) => text,
            MessageText::Chain(chain) => chain.leaf(),
        }
    }
}

impl From<String> for MessageText {
    fn from(text: String) -> Self {
        MessageText::Text(text)
    }
}

impl From<&str> for MessageText {
    fn from(text: &str) -> Self {
        MessageText::Text(text.to_string())
    }
}

impl From<MessageChain> for MessageText {
    fn from(chain: MessageChain) -> Self {
        MessageText::Chain(chain)
    }
}

/// A file of the program, with its text and precomputed line starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    file_name: PathBuf,
    text: String,
    line_starts: Vec<u32>,
}

impl SourceFile {
    pub fn new(file_name: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            file_name: file_name.into(),
            text,
            line_starts,
        }
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 0-based `(line, character)` of a byte offset.
    ///
    /// Offsets past the end clamp to the end of the text. The character is
    /// counted in UTF-16 code units from the start of the line.
    pub fn line_and_character_of_position(&self, position: u32) -> (usize, usize) {
        let position = (position as usize).min(self.text.len());
        let line = self
            .line_starts
            .partition_point(|&start| start as usize <= position)
            .saturating_sub(1);
        let line_start = self.line_starts[line] as usize;

        let mut end = position;
        while !self.text.is_char_boundary(end) {
            end -= 1;
        }
        let character = self.text[line_start..end]
            .chars()
            .map(char::len_utf16)
            .sum();
        (line, character)
    }

    /// Text of a 0-based line without its line terminator.
    pub fn line_text(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line)? as usize;
        let end = self
            .line_starts
            .get(line + 1)
            .map_or(self.text.len(), |&next| next as usize);
        Some(self.text[start..end].trim_end_matches(['\n', '\r']))
    }
}

fn compute_line_starts(text: &str) -> Vec<u32> {
    let mut starts = vec![0];
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                starts.push((i + 2) as u32);
                i += 2;
                continue;
            }
            b'\r' | b'\n' => starts.push((i + 1) as u32),
            _ => {}
        }
        i += 1;
    }
    starts
}

/// A reported issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: Option<Arc<SourceFile>>,
    /// Byte offset into the file's text.
    pub start: Option<u32>,
    pub length: Option<u32>,
    pub message_text: MessageText,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// An error that is not tied to any file.
    pub fn global(code: u32, message: impl Into<MessageText>) -> Self {
        Self {
            file: None,
            start: None,
            length: None,
            message_text: message.into(),
            category: DiagnosticCategory::Error,
            code,
        }
    }

    /// An error located at `start..start + length` in `file`.
    pub fn in_file(
        file: Arc<SourceFile>,
        start: u32,
        length: u32,
        code: u32,
        message: impl Into<MessageText>,
    ) -> Self {
        Self {
            file: Some(file),
            start: Some(start),
            length: Some(length),
            message_text: message.into(),
            category: DiagnosticCategory::Error,
            code,
        }
    }

    /// The leaf of the message chain.
    pub fn message(&self) -> &str {
        self.message_text.leaf()
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file.as_deref().map(SourceFile::file_name)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} TS{}: {}", self.category, self.code, self.message())
    }
}

impl std::error::Error for Diagnostic {}

impl miette::Diagnostic for Diagnostic {
    fn code(&self) -> Option<Box<dyn fmt::Display + '_>> {
        Some(Box::new(format!("TS{}", self.code)))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.category {
            DiagnosticCategory::Error => miette::Severity::Error,
            DiagnosticCategory::Warning => miette::Severity::Warning,
            DiagnosticCategory::Suggestion | DiagnosticCategory::Message => {
                miette::Severity::Advice
            }
        })
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.file
            .as_deref()
            .map(|file| &file.text as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        self.file.as_ref()?;
        let start = self.start? as usize;
        let length = self.length.unwrap_or(0) as usize;
        Some(Box::new(std::iter::once(miette::LabeledSpan::at(
            start..start + length,
            self.message().to_string(),
        ))))
    }
}

/// A diagnostic derived only from one file's content, stored without the
/// file so it can be cached and re-attached later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct FileDiagnostic {
    pub start: u32,
    pub length: u32,
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message_text: MessageText,
}

impl FileDiagnostic {
    pub fn error(start: u32, length: u32, code: u32, message: impl Into<MessageText>) -> Self {
        Self {
            start,
            length,
            code,
            category: DiagnosticCategory::Error,
            message_text: message.into(),
        }
    }

    pub fn attach(&self, file: &Arc<SourceFile>) -> Diagnostic {
        Diagnostic {
            file: Some(Arc::clone(file)),
            start: Some(self.start),
            length: Some(self.length),
            message_text: self.message_text.clone(),
            category: self.category,
            code: self.code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_of_plain_text_is_the_text() {
        assert_eq!(MessageText::from("oops").leaf(), "oops");
    }

    #[test]
    fn leaf_follows_first_successor_only() {
        let chain = MessageChain::new("outer", DiagnosticCategory::Error, 1)
            .with_next(
                MessageChain::new("middle", DiagnosticCategory::Error, 2)
                    .with_next(MessageChain::new("inner", DiagnosticCategory::Error, 3)),
            )
            .with_next(MessageChain::new("ignored", DiagnosticCategory::Error, 4));
        assert_eq!(MessageText::Chain(chain).leaf(), "inner");
    }

    #[test]
    fn chain_without_successors_yields_own_text() {
        let chain = MessageChain::new("only", DiagnosticCategory::Message, 0);
        assert_eq!(chain.leaf(), "only");
    }

    #[test]
    fn line_and_character_handle_line_breaks() {
        let file = SourceFile::new("a.ts", "let a;\r\nlet b;\nlet c;");
        assert_eq!(file.line_count(), 3);
        assert_eq!(file.line_and_character_of_position(0), (0, 0));
        assert_eq!(file.line_and_character_of_position(8), (1, 0));
        assert_eq!(file.line_and_character_of_position(12), (1, 4));
        assert_eq!(file.line_and_character_of_position(15), (2, 0));
        assert_eq!(file.line_text(0), Some("let a;"));
        assert_eq!(file.line_text(1), Some("let b;"));
        assert_eq!(file.line_text(3), None);
    }

    #[test]
    fn character_counts_utf16_units_not_bytes() {
        let file = SourceFile::new("a.ts", "const é = x;");
        // `x` is at byte 11, unit 10
        assert_eq!(file.line_and_character_of_position(11), (0, 10));
    }

    #[test]
    fn astral_characters_take_two_units() {
        let file = SourceFile::new("a.ts", "const s = \"🚀\"; x;");
        // `x` is at byte 18; the rocket is four bytes and two units
        assert_eq!(file.line_and_character_of_position(18), (0, 16));
    }

    #[test]
    fn position_past_end_is_clamped() {
        let file = SourceFile::new("a.ts", "ab\ncd");
        assert_eq!(file.line_and_character_of_position(99), (1, 2));
    }

    #[test]
    fn miette_code_is_prefixed() {
        use miette::Diagnostic as _;
        let diagnostic = Diagnostic::global(6053, "File 'x' not found.");
        assert_eq!(diagnostic.code().unwrap().to_string(), "TS6053");
        assert!(diagnostic.labels().is_none());
    }
}
