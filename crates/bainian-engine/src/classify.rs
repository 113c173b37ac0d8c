//! Greeting detection for inbound messages.
//!
//! The engine decides whether to answer a message through a
//! [`GreetingClassifier`]. The default [`KeywordClassifier`] matches
//! case-insensitive substrings against a configured keyword list; with no
//! keywords configured it matches nothing, so an unconfigured engine never
//! sends a reply.

use bainian_core::types::Message;

/// Decides whether a message is a greeting that deserves a reply.
pub trait GreetingClassifier: Send + Sync {
    /// Returns true if the message should be answered.
    fn is_greeting(&self, message: &Message) -> bool;
}

/// Keyword-based classifier.
///
/// A message is a greeting when its content contains any configured keyword.
/// Matching is case-insensitive; keywords are trimmed at construction and
/// blank entries are dropped.
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl KeywordClassifier {
    /// Build a classifier from the configured keyword list.
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Number of active keywords.
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}

impl GreetingClassifier for KeywordClassifier {
    fn is_greeting(&self, message: &Message) -> bool {
        if self.keywords.is_empty() {
            return false;
        }
        let content = message.content.to_lowercase();
        self.keywords.iter().any(|k| content.contains(k.as_str()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(content: &str) -> Message {
        Message::new("好友".to_string(), content.to_string())
    }

    #[test]
    fn test_matches_chinese_keyword() {
        let classifier = KeywordClassifier::new(&["新年快乐".to_string()]);
        assert!(classifier.is_greeting(&msg("新年快乐，恭喜发财！")));
    }

    #[test]
    fn test_matches_any_of_several_keywords() {
        let classifier = KeywordClassifier::new(&[
            "新年快乐".to_string(),
            "拜年".to_string(),
            "happy new year".to_string(),
        ]);
        assert!(classifier.is_greeting(&msg("给您拜年啦")));
        assert!(classifier.is_greeting(&msg("Happy New Year!")));
    }

    #[test]
    fn test_case_insensitive_match() {
        let classifier = KeywordClassifier::new(&["Happy New Year".to_string()]);
        assert!(classifier.is_greeting(&msg("happy new year to you")));
        assert!(classifier.is_greeting(&msg("HAPPY NEW YEAR")));
    }

    #[test]
    fn test_non_greeting_does_not_match() {
        let classifier = KeywordClassifier::new(&["新年快乐".to_string()]);
        assert!(!classifier.is_greeting(&msg("晚上一起吃饭吗")));
    }

    #[test]
    fn test_empty_keyword_list_matches_nothing() {
        let classifier = KeywordClassifier::new(&[]);
        assert!(!classifier.is_greeting(&msg("新年快乐")));
        assert_eq!(classifier.keyword_count(), 0);
    }

    #[test]
    fn test_blank_keywords_are_dropped() {
        let classifier = KeywordClassifier::new(&[
            "  ".to_string(),
            "".to_string(),
            "拜年".to_string(),
        ]);
        assert_eq!(classifier.keyword_count(), 1);
        assert!(classifier.is_greeting(&msg("拜年了")));
    }

    #[test]
    fn test_keywords_are_trimmed() {
        let classifier = KeywordClassifier::new(&[" 新年快乐 ".to_string()]);
        assert!(classifier.is_greeting(&msg("新年快乐")));
    }

    #[test]
    fn test_substring_match_inside_longer_text() {
        let classifier = KeywordClassifier::new(&["新年好".to_string()]);
        assert!(classifier.is_greeting(&msg("叔叔新年好，给您拜年了")));
    }
}
