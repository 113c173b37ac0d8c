use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BainianError;

// =============================================================================
// Enums
// =============================================================================

/// Reply tone governing which template set is active.
///
/// Exactly one style is active at any time. Switching styles reloads the
/// reply catalog in full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Courteous set phrases.
    #[default]
    Formal,
    /// Playful replies.
    Humor,
}

impl Style {
    /// Returns the template file name for this style.
    pub fn template_filename(&self) -> &str {
        match self {
            Style::Formal => "formal_replies.txt",
            Style::Humor => "humor_replies.txt",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Formal => write!(f, "formal"),
            Style::Humor => write!(f, "humor"),
        }
    }
}

impl FromStr for Style {
    type Err = BainianError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "formal" => Ok(Style::Formal),
            "humor" => Ok(Style::Humor),
            other => Err(BainianError::Config(format!(
                "Unknown style '{}' (expected formal or humor)",
                other
            ))),
        }
    }
}

// =============================================================================
// Structs
// =============================================================================

/// An inbound chat message observed during one poll cycle.
///
/// Ephemeral: produced by the observer, consumed by the engine in the same
/// cycle, never persisted. The same message may be reported again on a later
/// poll; deduplication is the engine's concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Display name or identifier of the sender.
    pub sender: String,
    /// Message text content.
    pub content: String,
    /// When the observer saw the message.
    pub observed_at: DateTime<Utc>,
}

impl Message {
    /// Create a message observed now.
    pub fn new(sender: String, content: String) -> Self {
        Self {
            sender,
            content,
            observed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_display() {
        assert_eq!(Style::Formal.to_string(), "formal");
        assert_eq!(Style::Humor.to_string(), "humor");
    }

    #[test]
    fn test_style_default_is_formal() {
        assert_eq!(Style::default(), Style::Formal);
    }

    #[test]
    fn test_style_template_filenames() {
        assert_eq!(Style::Formal.template_filename(), "formal_replies.txt");
        assert_eq!(Style::Humor.template_filename(), "humor_replies.txt");
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("formal".parse::<Style>().unwrap(), Style::Formal);
        assert_eq!("humor".parse::<Style>().unwrap(), Style::Humor);
        assert_eq!("Formal".parse::<Style>().unwrap(), Style::Formal);
        assert_eq!("HUMOR".parse::<Style>().unwrap(), Style::Humor);
    }

    #[test]
    fn test_style_from_str_rejects_unknown() {
        let result = "klingon".parse::<Style>();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("klingon"));
    }

    #[test]
    fn test_style_serde_round_trip() {
        let toml_str = toml::to_string(&StyleHolder {
            style: Style::Humor,
        })
        .unwrap();
        assert!(toml_str.contains("humor"));
        let parsed: StyleHolder = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.style, Style::Humor);
    }

    #[test]
    fn test_style_serde_rejects_unknown() {
        let result: Result<StyleHolder, _> = toml::from_str(r#"style = "klingon""#);
        assert!(result.is_err());
    }

    #[derive(Serialize, Deserialize)]
    struct StyleHolder {
        style: Style,
    }

    #[test]
    fn test_message_new_sets_timestamp() {
        let before = Utc::now();
        let msg = Message::new("A".to_string(), "新年快乐".to_string());
        let after = Utc::now();

        assert_eq!(msg.sender, "A");
        assert_eq!(msg.content, "新年快乐");
        assert!(msg.observed_at >= before && msg.observed_at <= after);
    }

    #[test]
    fn test_message_clone_equality() {
        let msg = Message::new("A".to_string(), "hello".to_string());
        let clone = msg.clone();
        assert_eq!(msg, clone);
    }
}
