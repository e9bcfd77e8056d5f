//! Passive nomination by replying to someone's message.

use court_types::VoteKind;

/// Reply phrases that nominate the replied-to author for a bailan.
const BAILAN_TRIGGERS: [&str; 2] = ["白爛+1", "這算不算白爛"];

/// Reply phrases that nominate the replied-to author for a warning.
const WARNING_TRIGGERS: [&str; 1] = ["醜一"];

/// Detect a nomination phrase in free text.
///
/// Whitespace is ignored, so `白爛 + 1` matches `白爛+1`. Bailan phrases win
/// over warning phrases when both appear.
pub fn detect_nomination(text: &str) -> Option<VoteKind> {
    let normalized: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    if BAILAN_TRIGGERS.iter().any(|t| normalized.contains(t)) {
        Some(VoteKind::Bailan)
    } else if WARNING_TRIGGERS.iter().any(|t| normalized.contains(t)) {
        Some(VoteKind::Warning)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bailan_phrase_with_spaces() {
        assert_eq!(detect_nomination("白爛 + 1"), Some(VoteKind::Bailan));
        assert_eq!(detect_nomination("  白爛+1  "), Some(VoteKind::Bailan));
    }

    #[test]
    fn question_form_is_bailan() {
        assert_eq!(detect_nomination("這算不算白爛"), Some(VoteKind::Bailan));
    }

    #[test]
    fn warning_phrase() {
        assert_eq!(detect_nomination("醜一"), Some(VoteKind::Warning));
        assert_eq!(detect_nomination("這個 醜一 吧"), Some(VoteKind::Warning));
    }

    #[test]
    fn ordinary_text_is_ignored() {
        assert_eq!(detect_nomination("我同意"), None);
        assert_eq!(detect_nomination("白爛"), None);
        assert_eq!(detect_nomination(""), None);
    }
}
