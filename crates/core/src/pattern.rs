use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// What the pattern store does with a message the pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PatternAction {
    /// The message is a transaction; `amount` and `merchant` must be captured.
    #[default]
    Approve,
    /// The message is noise and is dropped.
    Reject,
}

impl fmt::Display for PatternAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternAction::Approve => write!(f, "approve"),
            PatternAction::Reject => write!(f, "reject"),
        }
    }
}

impl std::str::FromStr for PatternAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approve" => Ok(PatternAction::Approve),
            "reject" => Ok(PatternAction::Reject),
            other => Err(format!("Unknown pattern action: '{other}'")),
        }
    }
}

/// Create/update payload accepted by the pattern store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub sender: String,
    pub pattern: String,
    pub action: PatternAction,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// The message the pattern was built from. When present the pattern must
    /// pass a matcher test against it before it can be saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
}

impl PatternDraft {
    /// Draft a new approve pattern for an unprocessed message.
    ///
    /// Carrier-prefixed sender ids such as `AD-HDFCBK` are reduced to the part
    /// after the first `-`.
    pub fn from_message(raw_sender: &str, content: &str) -> Self {
        let sender = short_sender(raw_sender).to_string();
        let mut metadata = BTreeMap::new();
        metadata.insert("account".to_string(), sender.clone());

        Self {
            id: None,
            name: format!("pattern: {sender}"),
            sender,
            pattern: content.to_string(),
            action: PatternAction::Approve,
            metadata,
            original_content: Some(content.to_string()),
        }
    }

    pub fn trimmed_pattern(&self) -> &str {
        self.pattern.trim()
    }

    pub fn has_original_content(&self) -> bool {
        self.original_content.as_deref().is_some_and(|c| !c.is_empty())
    }
}

fn short_sender(raw: &str) -> &str {
    raw.split('-').nth(1).unwrap_or(raw)
}
