//! Append-only dialogue transcript

use chrono::{DateTime, Utc};
use serde::Serialize;
use wizard_question::WidgetSpec;

use crate::types::PendingQuestion;

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatEntry {
    /// Position in the transcript, starting at 1
    pub id: u64,
    pub sender: Sender,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_path: Option<String>,
}

/// Entry content before it receives an id
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    sender: Sender,
    message: String,
    tooltip: Option<String>,
    widget: Option<WidgetSpec>,
    question_path: Option<String>,
}

impl EntryDraft {
    #[must_use]
    pub fn bot(message: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            message: message.into(),
            tooltip: None,
            widget: None,
            question_path: None,
        }
    }

    #[must_use]
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            ..Self::bot(message)
        }
    }

    /// Bot entry presenting `question`
    #[must_use]
    pub fn question(question: &PendingQuestion, widget: Option<WidgetSpec>) -> Self {
        Self {
            tooltip: question.info.clone(),
            widget,
            question_path: Some(question.path.clone()),
            ..Self::bot(question.text.clone())
        }
    }
}

/// Ordered transcript; entries are never edited or removed
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
}

impl Transcript {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its id
    pub fn append(&mut self, draft: EntryDraft) -> u64 {
        let id = self.entries.len() as u64 + 1;
        self.entries.push(ChatEntry {
            id,
            sender: draft.sender,
            message: draft.message,
            tooltip: draft.tooltip,
            timestamp: Utc::now(),
            widget: draft.widget,
            question_path: draft.question_path,
        });
        id
    }

    #[inline]
    pub fn bot(&mut self, message: impl Into<String>) -> u64 {
        self.append(EntryDraft::bot(message))
    }

    #[inline]
    pub fn user(&mut self, message: impl Into<String>) -> u64 {
        self.append(EntryDraft::user(message))
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// Entries appended after entry `id`
    #[must_use]
    pub fn since(&self, id: u64) -> &[ChatEntry] {
        let start = usize::try_from(id).unwrap_or(usize::MAX).min(self.entries.len());
        &self.entries[start..]
    }

    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Error attached to the input control of a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetError {
    /// Path of the question the error belongs to
    pub key: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_are_sequential_from_one() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.bot("hello"), 1);
        assert_eq!(transcript.user("Selected: Yes"), 2);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.entries()[1].sender, Sender::User);
    }

    #[test]
    fn since_returns_new_entries() {
        let mut transcript = Transcript::new();
        transcript.bot("a");
        transcript.bot("b");
        transcript.bot("c");
        let fresh: Vec<_> = transcript.since(1).iter().map(|e| e.message.as_str()).collect();
        assert_eq!(fresh, vec!["b", "c"]);
        assert!(transcript.since(3).is_empty());
        assert!(transcript.since(99).is_empty());
    }

    #[test]
    fn question_entry_carries_tooltip_and_path() {
        let question = PendingQuestion::new("nodes[0].cpu", "How many CPUs?", json!({"type": "Number"}))
            .with_info("Per node");
        let mut transcript = Transcript::new();
        transcript.append(EntryDraft::question(&question, None));
        let entry = transcript.last().unwrap();
        assert_eq!(entry.sender, Sender::Bot);
        assert_eq!(entry.message, "How many CPUs?");
        assert_eq!(entry.tooltip.as_deref(), Some("Per node"));
        assert_eq!(entry.question_path.as_deref(), Some("nodes[0].cpu"));
    }
}
