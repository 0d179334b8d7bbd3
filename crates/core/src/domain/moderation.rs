use thiserror::Error;

/// Fixed message attached to the text field when a forbidden word is found.
pub const WARNING: &str = "Mind your language!";

/// Built-in denylist; deployments extend or replace it via configuration.
pub const DEFAULT_FORBIDDEN_WORDS: &[&str] = &["scoundrel", "swindler"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextRejection {
    #[error("text is required")]
    Empty,
    #[error("text contains a forbidden word: {0}")]
    ForbiddenWord(String),
}

/// Validates submitted comment text against the denylist.
///
/// Matching is a case-insensitive substring scan, so "You Scoundrel!"
/// trips on "scoundrel". Surrounding whitespace is stripped from the
/// accepted text.
pub fn clean_comment_text(text: &str, forbidden: &[String]) -> Result<String, TextRejection> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TextRejection::Empty);
    }
    let lowered = trimmed.to_lowercase();
    for word in forbidden {
        let word = word.trim().to_lowercase();
        if !word.is_empty() && lowered.contains(&word) {
            return Err(TextRejection::ForbiddenWord(word));
        }
    }
    Ok(trimmed.to_string())
}

pub fn default_forbidden_words() -> Vec<String> {
    DEFAULT_FORBIDDEN_WORDS
        .iter()
        .map(|word| word.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{clean_comment_text, default_forbidden_words, TextRejection};

    #[test]
    fn accepts_plain_text() {
        let text = clean_comment_text("  a perfectly fine remark ", &default_forbidden_words());
        assert_eq!(text.unwrap(), "a perfectly fine remark");
    }

    #[test]
    fn rejects_empty_text() {
        let err = clean_comment_text("   ", &default_forbidden_words()).unwrap_err();
        assert_eq!(err, TextRejection::Empty);
    }

    #[test]
    fn rejects_forbidden_word_case_insensitively() {
        let err = clean_comment_text("You SCOUNDREL, you", &default_forbidden_words()).unwrap_err();
        assert_eq!(err, TextRejection::ForbiddenWord("scoundrel".to_string()));
    }

    #[test]
    fn matches_inside_longer_words() {
        let err = clean_comment_text("swindlers everywhere", &default_forbidden_words()).unwrap_err();
        assert_eq!(err, TextRejection::ForbiddenWord("swindler".to_string()));
    }

    #[test]
    fn empty_denylist_entries_are_ignored() {
        let forbidden = vec![String::new(), "  ".to_string()];
        assert!(clean_comment_text("anything", &forbidden).is_ok());
    }
}
